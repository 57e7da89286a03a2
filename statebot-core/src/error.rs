use callback_codec::BufferError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatebotError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Callback data error: {0}")]
    Codec(#[from] BufferError),

    #[error("State data error: {0}")]
    StateData(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("No text in message")]
    NoText,

    #[error("Missing button payload")]
    MissingPayload,

    #[error("State error: {0}")]
    State(String),
}

pub type Result<T> = std::result::Result<T, StatebotError>;
