//! End-to-end tests of the life-event tracker: updates go through the real
//! router and routing table; outbound calls land in [`common::RecordingBot`].

mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use common::*;
use handler_router::{Dispatch, Router};
use statebot_cli::build_router;
use statebot_cli::events::{registry, EventButton, Journal, AWAIT_EVENT_NAME, MAX_EVENTS};
use statebot_core::{
    ConversationKey, ConversationState, ConversationStateStore, InMemoryStateStore,
};
use storage::SqliteStateStore;
use tempfile::TempDir;

fn key() -> ConversationKey {
    ConversationKey::new(USER_ID, USER_ID)
}

fn app(private_only: bool) -> (Router<EventButton>, Arc<InMemoryStateStore>, Arc<RecordingBot>) {
    let store = Arc::new(InMemoryStateStore::new());
    let bot = RecordingBot::new();
    let router = build_router(store.clone(), bot.clone(), private_only).unwrap();
    (router, store, bot)
}

async fn saved_journal(store: &dyn ConversationStateStore) -> Journal {
    store
        .load(key())
        .await
        .unwrap()
        .and_then(|s| s.data::<Journal>().unwrap())
        .unwrap_or_default()
}

fn handled(route: &str) -> Dispatch {
    Dispatch::Handled {
        route: route.to_string(),
    }
}

/// **Test: Add, list and delete an event through the buttons the bot renders.**
///
/// **Setup:** Fresh in-memory store.
/// **Action:** /start, press Add, send "Graduation", press List, press the event, press Yes.
/// **Expected:** Each step hits the expected route; the journal gains then loses the event.
#[tokio::test]
async fn test_add_list_delete_flow() {
    let (router, store, bot) = app(true);

    assert_eq!(router.dispatch(text("/start")).await, handled("StartCommand"));
    assert_eq!(bot.last_text(), "Life events: 0 recorded.");

    assert_eq!(router.dispatch(bot.press("Add")).await, handled("StartAdding"));
    assert!(store.load(key()).await.unwrap().unwrap().is(AWAIT_EVENT_NAME));

    assert_eq!(
        router.dispatch(text("Graduation")).await,
        handled("SaveEventName")
    );
    let journal = saved_journal(store.as_ref()).await;
    assert_eq!(journal.events.len(), 1);
    assert_eq!(journal.events[0].name, "Graduation");
    assert!(store
        .load(key())
        .await
        .unwrap()
        .unwrap()
        .is(ConversationState::MAIN));

    assert_eq!(router.dispatch(bot.press("List")).await, handled("ListEvents"));
    assert_eq!(bot.last_text(), "Events, page 1/1. Tap one to delete it.");

    assert_eq!(
        router.dispatch(bot.press("Graduation")).await,
        handled("ConfirmDelete")
    );
    assert!(bot.last_text().starts_with("Delete \"Graduation\""));

    assert_eq!(router.dispatch(bot.press("Yes")).await, handled("DeleteEvent"));
    assert_eq!(bot.last_answer().as_deref(), Some("Deleted"));
    assert_eq!(bot.last_text(), "No events yet.");
    assert!(saved_journal(store.as_ref()).await.events.is_empty());
}

/// **Test: Cancel leaves the input step and keeps the journal.**
///
/// **Setup:** Journal with one event; user presses Add.
/// **Action:** Press Cancel.
/// **Expected:** CancelInput runs, answers "Cancelled", state back to MAIN with the event kept.
#[tokio::test]
async fn test_cancel_keeps_journal() {
    let (router, store, bot) = app(true);
    let mut journal = Journal::default();
    journal.add("Move", NaiveDate::from_ymd_opt(2023, 9, 1).unwrap());
    store
        .save(
            key(),
            &ConversationState::with_data(ConversationState::MAIN, &journal).unwrap(),
        )
        .await
        .unwrap();

    router.dispatch(text("/start")).await;
    router.dispatch(bot.press("Add")).await;

    assert_eq!(router.dispatch(bot.press("Cancel")).await, handled("CancelInput"));
    assert_eq!(bot.last_answer().as_deref(), Some("Cancelled"));
    assert_eq!(bot.last_text(), "Life events: 1 recorded.");
    let state = store.load(key()).await.unwrap().unwrap();
    assert!(state.is(ConversationState::MAIN));
    assert_eq!(state.data::<Journal>().unwrap(), Some(journal));
}

/// **Test: State-scoped routes and per-state catch-alls.**
///
/// **Setup:** User waiting for an event name.
/// **Action:** Press an old Add button, send a document; then in MAIN send plain text.
/// **Expected:** StaleButton answers; ExpectEventName asks for text; MainFallback points to /start.
#[tokio::test]
async fn test_state_scoping_and_fallbacks() {
    let (router, _store, bot) = app(true);
    router.dispatch(text("/start")).await;
    let add = bot.press("Add");
    router.dispatch(add.clone()).await;

    assert_eq!(router.dispatch(add).await, handled("StaleButton"));
    assert_eq!(
        bot.last_answer().as_deref(),
        Some("This button is no longer active.")
    );

    assert_eq!(router.dispatch(document()).await, handled("ExpectEventName"));

    router.dispatch(bot.press("Cancel")).await;
    assert_eq!(router.dispatch(text("hello")).await, handled("MainFallback"));
    assert_eq!(bot.last_text(), "Send /start to open the menu.");
}

/// **Test: A conversation stuck in an unknown state is reset to MAIN.**
///
/// **Setup:** Stored state "LEGACY_STEP".
/// **Action:** Send text.
/// **Expected:** ResetUnknownState runs and the saved state is MAIN.
#[tokio::test]
async fn test_unknown_state_is_reset() {
    let (router, store, _bot) = app(true);
    store
        .save(key(), &ConversationState::new("LEGACY_STEP"))
        .await
        .unwrap();

    assert_eq!(
        router.dispatch(text("anything")).await,
        handled("ResetUnknownState")
    );
    assert!(store
        .load(key())
        .await
        .unwrap()
        .unwrap()
        .is(ConversationState::MAIN));
}

/// **Test: Lists page through the journal.**
///
/// **Setup:** Seven events.
/// **Action:** /start, press List, press Next.
/// **Expected:** Page 1/2 offers Next; page 2/2 shows the last two events and Prev.
#[tokio::test]
async fn test_list_pages() {
    let (router, store, bot) = app(true);
    let mut journal = Journal::default();
    for i in 0..7 {
        journal.add(
            format!("event-{}", i),
            NaiveDate::from_ymd_opt(2024, 1, 1 + i).unwrap(),
        );
    }
    store
        .save(
            key(),
            &ConversationState::with_data(ConversationState::MAIN, &journal).unwrap(),
        )
        .await
        .unwrap();

    router.dispatch(text("/start")).await;
    router.dispatch(bot.press("List")).await;
    assert_eq!(bot.last_text(), "Events, page 1/2. Tap one to delete it.");

    router.dispatch(bot.press("Next")).await;
    assert_eq!(bot.last_text(), "Events, page 2/2. Tap one to delete it.");
    let keyboard = bot
        .outbound()
        .into_iter()
        .rev()
        .find_map(|o| o.keyboard)
        .unwrap();
    let labels: Vec<&str> = keyboard.buttons().map(|b| b.text.as_str()).collect();
    assert_eq!(
        labels,
        vec!["2024-01-06 event-5", "2024-01-07 event-6", "« Prev", "Menu"]
    );
}

async fn seed(store: &InMemoryStateStore, journal: &Journal) {
    store
        .save(
            key(),
            &ConversationState::with_data(ConversationState::MAIN, journal).unwrap(),
        )
        .await
        .unwrap();
}

/// **Test: Pressing the same "Yes, delete" twice removes only that event.**
///
/// **Setup:** Journal [Alpha, Beta].
/// **Action:** List, press Alpha, then dispatch the same confirmation callback twice.
/// **Expected:** First press deletes Alpha; second reports it gone; Beta is kept.
#[tokio::test]
async fn test_repeated_confirmation_deletes_once() {
    let (router, store, bot) = app(true);
    let mut journal = Journal::default();
    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    journal.add("Alpha", day);
    journal.add("Beta", day);
    seed(&store, &journal).await;

    router.dispatch(text("/start")).await;
    router.dispatch(bot.press("List")).await;
    router.dispatch(bot.press("Alpha")).await;
    let confirm = bot.press("Yes");

    assert_eq!(router.dispatch(confirm.clone()).await, handled("DeleteEvent"));
    assert_eq!(bot.last_answer().as_deref(), Some("Deleted"));

    assert_eq!(router.dispatch(confirm).await, handled("DeleteEvent"));
    assert_eq!(
        bot.last_answer().as_deref(),
        Some("That event no longer exists.")
    );

    let names: Vec<String> = saved_journal(store.as_ref())
        .await
        .events
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["Beta".to_string()]);
}

/// **Test: A full journal keeps every page reachable and refuses new events.**
///
/// **Setup:** Journal holding the maximum number of events.
/// **Action:** Open the last page; then try to add one more event.
/// **Expected:** Last page has Prev but no Next; the new event is rejected and the
/// journal size is unchanged.
#[tokio::test]
async fn test_full_journal_boundary() {
    let (router, store, bot) = app(true);
    let mut journal = Journal::default();
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for i in 0..MAX_EVENTS {
        journal.add(format!("e{}", i), day);
    }
    seed(&store, &journal).await;

    let last_page = registry()
        .unwrap()
        .encode(&EventButton::ListEvents { page: u8::MAX })
        .unwrap();
    assert_eq!(router.dispatch(callback(&last_page)).await, handled("ListEvents"));
    assert_eq!(bot.last_text(), "Events, page 256/256. Tap one to delete it.");
    let keyboard = bot
        .outbound()
        .into_iter()
        .rev()
        .find_map(|o| o.keyboard)
        .unwrap();
    let labels: Vec<&str> = keyboard.buttons().map(|b| b.text.as_str()).collect();
    assert!(labels.contains(&"« Prev"));
    assert!(!labels.iter().any(|l| l.contains("Next")));

    router.dispatch(text("/start")).await;
    router.dispatch(bot.press("Add")).await;
    assert_eq!(
        router.dispatch(text("One too many")).await,
        handled("SaveEventName")
    );
    assert!(bot.last_text().starts_with("The journal is full"));
    let state = store.load(key()).await.unwrap().unwrap();
    assert!(state.is(ConversationState::MAIN));
    assert_eq!(state.data::<Journal>().unwrap().unwrap().len(), MAX_EVENTS);
}

/// **Test: Group chats get the private-only rejection.**
///
/// **Setup:** Router built with private chats only.
/// **Action:** /start from a supergroup.
/// **Expected:** Rejected; the rejection text is sent; nothing stored.
#[tokio::test]
async fn test_group_chat_rejected() {
    let (router, store, bot) = app(true);

    assert_eq!(router.dispatch(group_text("/start")).await, Dispatch::Rejected);
    assert_eq!(bot.last_text(), statebot_cli::PRIVATE_ONLY_REJECTION);
    assert!(store.is_empty().await);
}

/// **Test: Callback data from another bot is answered silently and otherwise dropped.**
///
/// **Setup:** Router with the tracker's registry.
/// **Action:** Callback with non-7-bit data.
/// **Expected:** Malformed; one empty answer clears the spinner; no message sent.
#[tokio::test]
async fn test_foreign_callback_data_is_malformed() {
    let (router, _store, bot) = app(true);

    assert_eq!(router.dispatch(callback("привет")).await, Dispatch::Malformed);
    let outbound = bot.outbound();
    assert_eq!(outbound.len(), 1);
    assert!(outbound[0].answer);
    assert_eq!(outbound[0].text, "");
}

/// **Test: The journal survives a restart with the SQLite store.**
///
/// **Setup:** SqliteStateStore on a temp file.
/// **Action:** Add an event, drop the router and store, reopen the file.
/// **Expected:** The reopened store returns MAIN with the event.
#[tokio::test]
async fn test_journal_persists_in_sqlite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("statebot.db");
    let url = path.to_str().unwrap().to_string();
    {
        let store = Arc::new(SqliteStateStore::new(&url).await.unwrap());
        let bot = RecordingBot::new();
        let router = build_router(store, bot.clone(), true).unwrap();
        router.dispatch(text("/start")).await;
        router.dispatch(bot.press("Add")).await;
        assert_eq!(
            router.dispatch(text("First job")).await,
            handled("SaveEventName")
        );
    }

    let store = SqliteStateStore::new(&url).await.unwrap();
    let journal = saved_journal(&store).await;
    assert_eq!(journal.events.len(), 1);
    assert_eq!(journal.events[0].name, "First job");
}
