pub mod discord;

use anyhow::Result;
use async_trait::async_trait;

use crate::reply::Embed;
use crate::stats::GuildSummary;

/// A message received from the chat service
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Platform-specific user ID of the sender
    pub user_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
    /// Display name of the user
    pub user_name: String,
    pub user_avatar: Option<String>,
    /// The message text, original casing
    pub text: String,
}

/// Outbound operations the command handler needs from a chat session
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn send_text(&self, channel_id: u64, text: &str) -> Result<()>;

    async fn send_embed(&self, channel_id: u64, embed: &Embed) -> Result<()>;

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()>;

    /// Avatar of the bot account, if known
    fn bot_avatar(&self) -> Option<String>;

    /// Totals over every guild in the session cache
    fn guild_summary(&self) -> GuildSummary;
}
