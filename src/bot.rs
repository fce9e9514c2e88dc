use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::command::{self, Command};
use crate::config::Config;
use crate::obfuscate;
use crate::paste::{self, PasteClient};
use crate::platform::{ChatClient, IncomingMessage};
use crate::reply::{self, Reply};
use crate::stats::RuntimeStats;

/// Everything the command handler reads. Immutable and shared across events.
pub struct BotContext {
    pub config: Arc<Config>,
    pub paste: PasteClient,
}

impl BotContext {
    pub fn new(config: Config) -> Result<Self> {
        let paste = PasteClient::new(&config.paste)?;
        Ok(Self {
            config: Arc::new(config),
            paste,
        })
    }
}

/// Handle one inbound message. Errors are logged here and never returned, so
/// a failing command cannot take down the event loop.
pub async fn handle_message(ctx: &BotContext, chat: &dyn ChatClient, msg: &IncomingMessage) {
    let command = match command::parse(&msg.text) {
        Ok(Some(command)) => command,
        Ok(None) => return,
        Err(e) => {
            debug!("Rejected command from {}: {}", msg.user_name, e);
            send(chat, msg.channel_id, reply::usage_hint()).await;
            return;
        }
    };

    info!(
        "Command {} from {} ({}) in channel {}",
        command_name(&command),
        msg.user_name,
        msg.user_id,
        msg.channel_id
    );

    let reply = match command {
        Command::Spoiler { warning, content } => {
            spoiler_reply(ctx, chat, msg, &warning, &content).await
        }
        Command::Help => reply::help(&ctx.config, chat.bot_avatar()),
        Command::Stats => reply::stats(
            &ctx.config,
            chat.bot_avatar(),
            &RuntimeStats::collect(),
            &chat.guild_summary(),
        ),
        Command::Ping => reply::ping(),
    };

    send(chat, msg.channel_id, reply).await;
}

/// Remove the original message and archive the full text, then build the
/// masked embed. A failed upload only drops the link.
async fn spoiler_reply(
    ctx: &BotContext,
    chat: &dyn ChatClient,
    msg: &IncomingMessage,
    warning: &str,
    content: &str,
) -> Reply {
    let masked = obfuscate::mask_preview(content, &mut rand::thread_rng());
    let markdown = paste::spoiler_markdown(warning, &msg.user_name, content);

    let (deleted, uploaded) = tokio::join!(
        chat.delete_message(msg.channel_id, msg.message_id),
        ctx.paste.publish(warning, &markdown),
    );

    if let Err(e) = deleted {
        warn!(
            "Failed to delete spoiler message {} in channel {}: {:#}",
            msg.message_id, msg.channel_id, e
        );
    }

    let link = match uploaded {
        Ok(link) => Some(link),
        Err(e) => {
            warn!("Paste upload failed, replying without link: {:#}", e);
            None
        }
    };

    reply::spoiler(
        &ctx.config,
        &msg.user_name,
        msg.user_avatar.clone(),
        warning,
        masked,
        link,
    )
}

async fn send(chat: &dyn ChatClient, channel_id: u64, reply: Reply) {
    let result = match &reply {
        Reply::Text(text) => chat.send_text(channel_id, text).await,
        Reply::Embed(embed) => chat.send_embed(channel_id, embed).await,
    };
    if let Err(e) = result {
        warn!("Failed to send reply to channel {}: {:#}", channel_id, e);
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Spoiler { .. } => "spoiler",
        Command::Help => "help",
        Command::Stats => "stats",
        Command::Ping => "ping",
    }
}
