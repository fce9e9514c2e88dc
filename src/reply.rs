use crate::config::Config;
use crate::stats::{GuildSummary, RuntimeStats, LIBRARY};

/// Discord permission bits requested by the invite link
pub const INVITE_PERMISSIONS: u64 = 92160;

/// Discord rejects embeds whose title or author name is longer than this
pub const EMBED_TITLE_LIMIT: usize = 256;

/// A message the bot sends back
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Embed(Embed),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn new(name: &str, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            inline,
        }
    }
}

/// Platform-neutral rich message shared by every embed reply
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Embed {
    pub author: EmbedAuthor,
    pub color: u32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub fields: Vec<EmbedField>,
}

pub fn invite_url(client_id: &str) -> String {
    format!(
        "https://discord.com/oauth2/authorize?client_id={}&scope=bot&permissions={}",
        client_id, INVITE_PERMISSIONS
    )
}

/// Cut `text` to at most [`EMBED_TITLE_LIMIT`] chars.
fn clamp_title(text: &str) -> String {
    match text.char_indices().nth(EMBED_TITLE_LIMIT) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

fn bot_author(config: &Config, bot_avatar: Option<String>) -> EmbedAuthor {
    EmbedAuthor {
        name: config.bot_name.clone(),
        icon_url: bot_avatar,
        url: Some(invite_url(&config.client_id)),
    }
}

/// Embed that replaces a spoiler message. `masked` is the already
/// obfuscated preview; `link` points at the full text when the upload worked.
pub fn spoiler(
    config: &Config,
    author_name: &str,
    author_avatar: Option<String>,
    warning: &str,
    masked: String,
    link: Option<String>,
) -> Reply {
    Reply::Embed(Embed {
        author: EmbedAuthor {
            name: clamp_title(author_name),
            icon_url: author_avatar,
            url: None,
        },
        color: config.embed_color,
        title: Some(clamp_title(warning)),
        description: Some(masked),
        url: link,
        fields: Vec::new(),
    })
}

pub fn help(config: &Config, bot_avatar: Option<String>) -> Reply {
    Reply::Embed(Embed {
        author: bot_author(config, bot_avatar),
        color: config.embed_color,
        fields: vec![
            EmbedField::new("Usage", "```!sp your message```", false),
            EmbedField::new(
                "Custom warning message",
                "```!sp spoiler for star warps | your message```",
                false,
            ),
        ],
        ..Default::default()
    })
}

pub fn stats(
    config: &Config,
    bot_avatar: Option<String>,
    runtime: &RuntimeStats,
    guilds: &GuildSummary,
) -> Reply {
    let rust = option_env!("CARGO_PKG_RUST_VERSION")
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown");

    Reply::Embed(Embed {
        author: bot_author(config, bot_avatar),
        color: config.embed_color,
        fields: vec![
            EmbedField::new("Version", env!("CARGO_PKG_VERSION"), true),
            EmbedField::new("Library", LIBRARY, true),
            EmbedField::new("Rust", rust, true),
            EmbedField::new("Memory", runtime.memory_display(), true),
            EmbedField::new("Tasks", runtime.tasks.to_string(), true),
            EmbedField::new("Servers", guilds.servers.to_string(), true),
            EmbedField::new("Channels", guilds.channels.to_string(), true),
            EmbedField::new("Users", guilds.users.to_string(), true),
        ],
        ..Default::default()
    })
}

pub fn ping() -> Reply {
    Reply::Text("Pong!".to_string())
}

pub fn usage_hint() -> Reply {
    Reply::Text("Usage: `!sp your message` or `!sp your warning | your message`".to_string())
}
