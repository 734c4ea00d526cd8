//! Telegram gateway
//!
//! Long-polls Telegram with teloxide, turns messages and button presses into
//! `(user_id, chat_id, Event)` for the runtime, and delivers prompts back as
//! messages with an inline keyboard, one button per row.

use crate::runtime::{BotRuntime, GatewayError, Outbox};
use crate::state_machine::{ChoiceButton, Event, Prompt};
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::dptree;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message, Update,
};

/// Telegram's per-message text limit
pub const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

pub type TelegramRuntime = BotRuntime<TelegramOutbox>;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Outbox that sends prompts through the Bot API
pub struct TelegramOutbox {
    bot: Bot,
    max_message_length: usize,
}

impl TelegramOutbox {
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            max_message_length: TELEGRAM_MAX_MESSAGE_LENGTH,
        }
    }
}

#[async_trait]
impl Outbox for TelegramOutbox {
    /// Long texts go out in several messages; the keyboard rides on the last
    async fn send(&self, chat_id: i64, prompt: &Prompt) -> Result<(), GatewayError> {
        let chunks = split_message(&prompt.text, self.max_message_length);
        let last = chunks.len().saturating_sub(1);

        for (index, chunk) in chunks.into_iter().enumerate() {
            let mut request = self.bot.send_message(ChatId(chat_id), chunk);
            if index == last {
                if let Some(markup) = keyboard(&prompt.choices) {
                    request = request.reply_markup(markup);
                }
            }
            request.await.map_err(|e| GatewayError::Send {
                chat_id,
                message: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Inline keyboard with one button per row, or `None` for plain text
fn keyboard(choices: &[ChoiceButton]) -> Option<InlineKeyboardMarkup> {
    if choices.is_empty() {
        return None;
    }
    Some(InlineKeyboardMarkup::new(choices.iter().map(|choice| {
        vec![InlineKeyboardButton::callback(choice.label, choice.token)]
    })))
}

/// Split long messages at line boundaries to respect the platform limit.
///
/// Lengths are counted in characters; a single line longer than the limit
/// is cut into limit-sized pieces.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let line_len = line.chars().count();
        if !current.is_empty() && current_len + line_len + 1 > max_len {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > max_len {
            let chars: Vec<char> = line.chars().collect();
            chunks.extend(chars.chunks(max_len).map(|piece| piece.iter().collect::<String>()));
            continue;
        }

        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

async fn on_message(msg: Message, runtime: Arc<TelegramRuntime>) -> HandlerResult {
    let Some(text) = msg.text() else {
        tracing::debug!(chat_id = msg.chat.id.0, "Ignoring non-text message");
        return Ok(());
    };
    let Some(user_id) = msg.from.as_ref().and_then(|u| i64::try_from(u.id.0).ok()) else {
        return Ok(());
    };

    runtime
        .handle(user_id, msg.chat.id.0, Event::from_message(text))
        .await;
    Ok(())
}

async fn on_callback(bot: Bot, q: CallbackQuery, runtime: Arc<TelegramRuntime>) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id.0) else {
        tracing::debug!(data, "Callback without an accessible message");
        return Ok(());
    };
    let Ok(user_id) = i64::try_from(q.from.id.0) else {
        return Ok(());
    };

    runtime
        .handle(user_id, chat_id, Event::from_callback(data))
        .await;
    Ok(())
}

/// Long-poll until Ctrl-C
pub async fn run(bot: Bot, runtime: Arc<TelegramRuntime>) {
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    tracing::info!("Starting Telegram long polling");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![runtime])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Telegram dispatcher stopped");
}
