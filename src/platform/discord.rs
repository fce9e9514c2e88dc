use std::sync::Arc;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serenity::all::{
    Cache, ChannelId, Client, Context, CreateEmbed, CreateEmbedAuthor, CreateMessage,
    EventHandler, GatewayIntents, Http, Message, MessageId, Ready,
};
use tracing::{error, info};

use crate::bot::{self, BotContext};
use crate::platform::{ChatClient, IncomingMessage};
use crate::reply::Embed;
use crate::stats::GuildSummary;

/// Convert a platform-neutral `Embed` into a serenity `CreateEmbed`.
fn build_embed(embed: &Embed) -> CreateEmbed {
    let mut author = CreateEmbedAuthor::new(&embed.author.name);
    if let Some(ref icon) = embed.author.icon_url {
        author = author.icon_url(icon);
    }
    if let Some(ref url) = embed.author.url {
        author = author.url(url);
    }

    let mut builder = CreateEmbed::new().author(author).color(embed.color);
    if let Some(ref title) = embed.title {
        builder = builder.title(title);
    }
    if let Some(ref desc) = embed.description {
        builder = builder.description(desc);
    }
    if let Some(ref url) = embed.url {
        builder = builder.url(url);
    }
    for field in &embed.fields {
        builder = builder.field(&field.name, &field.value, field.inline);
    }
    builder
}

/// `ChatClient` backed by one event's serenity HTTP client and cache
struct DiscordChat {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

#[async_trait]
impl ChatClient for DiscordChat {
    async fn send_text(&self, channel_id: u64, text: &str) -> Result<()> {
        ChannelId::new(channel_id)
            .say(&*self.http, text)
            .await
            .with_context(|| format!("Failed to send message to channel {}", channel_id))?;
        Ok(())
    }

    async fn send_embed(&self, channel_id: u64, embed: &Embed) -> Result<()> {
        let builder = CreateMessage::new().embed(build_embed(embed));
        ChannelId::new(channel_id)
            .send_message(&*self.http, builder)
            .await
            .with_context(|| format!("Failed to send embed to channel {}", channel_id))?;
        Ok(())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()> {
        ChannelId::new(channel_id)
            .delete_message(&*self.http, MessageId::new(message_id))
            .await
            .with_context(|| {
                format!(
                    "Failed to delete message {} in channel {}",
                    message_id, channel_id
                )
            })
    }

    fn bot_avatar(&self) -> Option<String> {
        Some(self.cache.current_user().face())
    }

    fn guild_summary(&self) -> GuildSummary {
        let guild_ids = self.cache.guilds();
        let mut summary = GuildSummary {
            servers: guild_ids.len(),
            ..Default::default()
        };
        for id in guild_ids {
            if let Some(guild) = self.cache.guild(id) {
                summary.channels += guild.channels.len();
                summary.users += guild.member_count;
            }
        }
        summary
    }
}

struct Handler {
    bot: Arc<BotContext>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            "Connected as {} ({} guild(s))",
            ready.user.name,
            ready.guilds.len()
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let own_id = ctx.cache.current_user().id;
        if msg.author.id == own_id {
            return;
        }

        let incoming = IncomingMessage {
            user_id: msg.author.id.get(),
            channel_id: msg.channel_id.get(),
            message_id: msg.id.get(),
            user_name: msg.author.name.clone(),
            user_avatar: Some(msg.author.face()),
            text: msg.content,
        };

        let chat = DiscordChat {
            http: ctx.http.clone(),
            cache: ctx.cache.clone(),
        };
        bot::handle_message(&self.bot, &chat, &incoming).await;
    }
}

/// Connect to Discord and dispatch messages until SIGINT/SIGTERM, then close
/// every shard.
pub async fn run(bot: Arc<BotContext>) -> Result<()> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&bot.config.token, intents)
        .event_handler(Handler { bot: bot.clone() })
        .await
        .context("Failed to create Discord client")?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, closing Discord session...");
        shard_manager.shutdown_all().await;
    });

    info!("Bot is now running. Press CTRL-C to exit.");
    client
        .start()
        .await
        .context("Discord session terminated with an error")?;

    info!("Discord session closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
