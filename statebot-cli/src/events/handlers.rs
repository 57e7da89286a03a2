//! Handlers of the life-event tracker and their routing order.
//!
//! The journal lives in the conversation data, so every transition keeps it
//! (`set_state_keep_data`) and edits replace it (`set_data`).

use async_trait::async_trait;
use chrono::Utc;
use handler_router::{Context, Handler, Route};
use statebot_core::{ConversationState, HandlerError, Result};
use tracing::info;

use super::buttons::{EventButton, EventKind};
use super::journal::Journal;

/// Waiting for the name of a new event.
pub const AWAIT_EVENT_NAME: &str = "AWAIT_EVENT_NAME";

/// Events shown per list page.
pub const PAGE_SIZE: usize = 5;

/// Largest journal whose pages all fit the one-byte page field of
/// [`EventButton::ListEvents`].
pub const MAX_EVENTS: usize = 256 * PAGE_SIZE;

const MAX_NAME_CHARS: usize = 100;

type Rows = Vec<Vec<(String, EventButton)>>;

fn journal(ctx: &Context<EventButton>) -> Result<Journal> {
    Ok(ctx.data::<Journal>()?.unwrap_or_default())
}

fn menu(journal: &Journal) -> (String, Rows) {
    let text = format!("Life events: {} recorded.", journal.len());
    let rows = vec![vec![
        ("Add event".to_string(), EventButton::Add),
        ("List events".to_string(), EventButton::ListEvents { page: 0 }),
    ]];
    (text, rows)
}

fn event_list(journal: &Journal, page: usize) -> (String, Rows) {
    let pages = journal.page_count(PAGE_SIZE);
    let page = page.min(pages - 1);
    let mut rows: Rows = journal
        .page(page, PAGE_SIZE)
        .map(|event| {
            vec![(
                format!("{} {}", event.date, event.name),
                EventButton::DeleteEvent {
                    id: event.id,
                    confirm: false,
                },
            )]
        })
        .collect();

    let mut nav = Vec::new();
    if let Some(prev) = page.checked_sub(1).and_then(|p| u8::try_from(p).ok()) {
        nav.push(("« Prev".to_string(), EventButton::ListEvents { page: prev }));
    }
    if page + 1 < pages {
        if let Ok(next) = u8::try_from(page + 1) {
            nav.push(("Next »".to_string(), EventButton::ListEvents { page: next }));
        }
    }
    if !nav.is_empty() {
        rows.push(nav);
    }
    rows.push(vec![("Menu".to_string(), EventButton::Menu)]);

    let text = if journal.is_empty() {
        "No events yet.".to_string()
    } else {
        format!("Events, page {}/{}. Tap one to delete it.", page + 1, pages)
    };
    (text, rows)
}

fn page_of(position: usize) -> usize {
    position / PAGE_SIZE
}

fn back_to_main(ctx: &mut Context<EventButton>) {
    if !ctx.conversation().is(ConversationState::MAIN) {
        ctx.set_state_keep_data(ConversationState::MAIN);
    }
}

/// `/start` from any state: back to MAIN with the menu.
pub struct StartCommand;

#[async_trait]
impl Handler<EventButton> for StartCommand {
    async fn handle(&self, ctx: &mut Context<EventButton>) -> Result<()> {
        back_to_main(ctx);
        let (text, rows) = menu(&journal(ctx)?);
        ctx.reply_with_buttons(&text, rows).await
    }
}

/// Menu and Cancel buttons.
pub struct ShowMenu;

#[async_trait]
impl Handler<EventButton> for ShowMenu {
    async fn handle(&self, ctx: &mut Context<EventButton>) -> Result<()> {
        if matches!(ctx.payload(), Some(EventButton::Cancel)) {
            ctx.answer(Some("Cancelled")).await?;
        }
        back_to_main(ctx);
        let (text, rows) = menu(&journal(ctx)?);
        ctx.edit_with_buttons(&text, rows).await
    }
}

pub struct StartAdding;

#[async_trait]
impl Handler<EventButton> for StartAdding {
    async fn handle(&self, ctx: &mut Context<EventButton>) -> Result<()> {
        ctx.set_state_keep_data(AWAIT_EVENT_NAME);
        ctx.edit_with_buttons(
            "Send me the name of the event.",
            vec![vec![("Cancel", EventButton::Cancel)]],
        )
        .await
    }
}

pub struct SaveEventName;

#[async_trait]
impl Handler<EventButton> for SaveEventName {
    async fn handle(&self, ctx: &mut Context<EventButton>) -> Result<()> {
        let name = ctx.text().ok_or(HandlerError::NoText)?.trim().to_string();
        if name.is_empty() {
            return ctx.reply("The name cannot be empty, try again.").await;
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return ctx
                .reply(&format!(
                    "Names are limited to {} characters, try a shorter one.",
                    MAX_NAME_CHARS
                ))
                .await;
        }

        let mut journal = journal(ctx)?;
        if journal.len() >= MAX_EVENTS
            || journal.add(name.clone(), Utc::now().date_naive()).is_none()
        {
            ctx.set_state_keep_data(ConversationState::MAIN);
            let (text, rows) = menu(&journal);
            return ctx
                .reply_with_buttons(
                    &format!("The journal is full, delete an event first. {}", text),
                    rows,
                )
                .await;
        }
        ctx.set_state_keep_data(ConversationState::MAIN);
        ctx.set_data(&journal)?;
        info!(user_id = ctx.user.id, events = journal.len(), "step: event added");

        let (text, rows) = menu(&journal);
        ctx.reply_with_buttons(&format!("Saved \"{}\". {}", name, text), rows)
            .await
    }
}

/// Non-text input while waiting for a name.
pub struct ExpectEventName;

#[async_trait]
impl Handler<EventButton> for ExpectEventName {
    async fn handle(&self, ctx: &mut Context<EventButton>) -> Result<()> {
        ctx.reply_with_buttons(
            "Please send the event name as text, or press Cancel.",
            vec![vec![("Cancel", EventButton::Cancel)]],
        )
        .await
    }
}

pub struct ListEvents;

#[async_trait]
impl Handler<EventButton> for ListEvents {
    async fn handle(&self, ctx: &mut Context<EventButton>) -> Result<()> {
        let page = match ctx.require_payload()? {
            EventButton::ListEvents { page } => *page as usize,
            _ => return Err(HandlerError::MissingPayload.into()),
        };
        let (text, rows) = event_list(&journal(ctx)?, page);
        ctx.edit_with_buttons(&text, rows).await
    }
}

/// Unconfirmed delete: ask first.
pub struct ConfirmDelete;

#[async_trait]
impl Handler<EventButton> for ConfirmDelete {
    async fn handle(&self, ctx: &mut Context<EventButton>) -> Result<()> {
        let id = match ctx.require_payload()? {
            EventButton::DeleteEvent { id, .. } => *id,
            _ => return Err(HandlerError::MissingPayload.into()),
        };
        let journal = journal(ctx)?;
        let Some((position, event)) = journal.find(id) else {
            ctx.answer(Some("That event no longer exists.")).await?;
            let (text, rows) = event_list(&journal, 0);
            return ctx.edit_with_buttons(&text, rows).await;
        };

        let text = format!("Delete \"{}\" ({})?", event.name, event.date);
        let back = u8::try_from(page_of(position)).unwrap_or(u8::MAX);
        ctx.edit_with_buttons(
            &text,
            vec![vec![
                ("Yes, delete", EventButton::DeleteEvent { id, confirm: true }),
                ("No", EventButton::ListEvents { page: back }),
            ]],
        )
        .await
    }
}

/// Confirmed delete. Addresses the event by id, so a repeated or stale
/// confirmation never removes a different event.
pub struct DeleteEvent;

#[async_trait]
impl Handler<EventButton> for DeleteEvent {
    async fn handle(&self, ctx: &mut Context<EventButton>) -> Result<()> {
        let id = match ctx.require_payload()? {
            EventButton::DeleteEvent { id, .. } => *id,
            _ => return Err(HandlerError::MissingPayload.into()),
        };
        let mut journal = journal(ctx)?;
        let page = match journal.remove(id) {
            Some((position, event)) => {
                ctx.set_data(&journal)?;
                info!(user_id = ctx.user.id, event = %event.name, "step: event deleted");
                ctx.answer(Some("Deleted")).await?;
                page_of(position)
            }
            None => {
                ctx.answer(Some("That event no longer exists.")).await?;
                0
            }
        };
        let (text, rows) = event_list(&journal, page);
        ctx.edit_with_buttons(&text, rows).await
    }
}

/// Buttons that no longer fit the conversation (old keyboards, unknown ids).
pub struct StaleButton;

#[async_trait]
impl Handler<EventButton> for StaleButton {
    async fn handle(&self, ctx: &mut Context<EventButton>) -> Result<()> {
        ctx.answer(Some("This button is no longer active.")).await?;
        Ok(())
    }
}

pub struct MainFallback;

#[async_trait]
impl Handler<EventButton> for MainFallback {
    async fn handle(&self, ctx: &mut Context<EventButton>) -> Result<()> {
        ctx.reply("Send /start to open the menu.").await
    }
}

/// Messages in a state no route knows (e.g. left over from an older version).
pub struct ResetUnknownState;

#[async_trait]
impl Handler<EventButton> for ResetUnknownState {
    async fn handle(&self, ctx: &mut Context<EventButton>) -> Result<()> {
        info!(user_id = ctx.user.id, state = %ctx.state(), "step: resetting unknown state");
        back_to_main(ctx);
        let (text, rows) = menu(&journal(ctx)?);
        ctx.reply_with_buttons(&format!("Let's start over. {}", text), rows)
            .await
    }
}

fn is_unconfirmed_delete(ctx: &Context<EventButton>) -> bool {
    matches!(
        ctx.payload(),
        Some(EventButton::DeleteEvent { confirm: false, .. })
    )
}

/// Routing table, most specific first.
pub fn routes() -> Vec<Route<EventButton>> {
    vec![
        Route::on_command("start", StartCommand),
        Route::on_button(EventKind::Menu, ShowMenu),
        Route::on_button(EventKind::Cancel, ShowMenu).named("CancelInput"),
        Route::on_button(EventKind::Add, StartAdding).in_state(ConversationState::MAIN),
        Route::on_button(EventKind::ListEvents, ListEvents),
        Route::on_button(EventKind::DeleteEvent, ConfirmDelete).when(is_unconfirmed_delete),
        Route::on_button(EventKind::DeleteEvent, DeleteEvent),
        Route::on_callback(StaleButton),
        Route::on_text(SaveEventName).in_state(AWAIT_EVENT_NAME),
        Route::on_message(ExpectEventName).in_state(AWAIT_EVENT_NAME),
        Route::on_message(MainFallback).in_state(ConversationState::MAIN),
        Route::on_message(ResetUnknownState),
    ]
}
