mod conversation_record;

pub use conversation_record::ConversationRecord;
