use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::config::PasteConfig;

#[derive(Debug, Serialize)]
struct PasteForm<'a> {
    title: &'a str,
    lang: &'a str,
    paste: &'a str,
}

/// JSON envelope returned by the paste service
#[derive(Debug, Clone, Deserialize)]
pub struct PasteResponse {
    #[serde(default)]
    pub status: String,
    pub paste: Paste,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paste {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub raw: String,
    #[serde(default)]
    pub lang_code: String,
    /// Shareable link to the rendered paste
    #[serde(default)]
    pub formatted: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub expiration_date: Option<DateTime<Utc>>,
}

/// RFC 3339 timestamp, or `None` when absent or in an unknown format.
fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|t| t.with_timezone(&Utc)))
}

/// Markdown document archived for a spoiler: heading, attribution, full text.
pub fn spoiler_markdown(warning: &str, author: &str, content: &str) -> String {
    format!(
        "### {} \n\nPosted by `{}` \n\n{}",
        warning, author, content
    )
}

#[derive(Clone)]
pub struct PasteClient {
    client: reqwest::Client,
    endpoint: String,
}

impl PasteClient {
    pub fn new(config: &PasteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build paste HTTP client")?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Upload `text` as markdown and return the paste's formatted link.
    /// One attempt, bounded by the client timeout.
    pub async fn publish(&self, title: &str, text: &str) -> Result<String> {
        let form = PasteForm {
            title,
            lang: "markdown",
            paste: text,
        };

        debug!("Uploading paste to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .context("Failed to send request to paste service")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Paste service error ({}): {}", status, error_body);
        }

        let body = response
            .text()
            .await
            .context("Failed to read paste service response")?;
        let parsed = parse_response(&body)?;

        let paste = &parsed.paste;
        debug!(
            "Paste {} created (status: {}, lang: {}, link: {}, raw: {}, expires: {:?})",
            paste.id, parsed.status, paste.lang_code, paste.link, paste.raw, paste.expiration_date
        );

        Ok(parsed.paste.formatted)
    }
}

fn parse_response(body: &str) -> Result<PasteResponse> {
    let parsed: PasteResponse =
        serde_json::from_str(body).context("Failed to parse paste service response")?;
    if parsed.paste.formatted.is_empty() {
        anyhow::bail!("Paste service returned no formatted link");
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_spoiler_markdown_layout() {
        let md = spoiler_markdown("my secret", "alice", "this is the body");
        assert_eq!(
            md,
            "### my secret \n\nPosted by `alice` \n\nthis is the body"
        );
    }

    #[test]
    fn test_parse_full_response() {
        let body = r#"{
            "status": "success",
            "paste": {
                "id": "abc123",
                "link": "https://mnn.im/abc123",
                "raw": "https://mnn.im/raw/abc123",
                "lang_code": "markdown",
                "formatted": "https://mnn.im/abc123.md",
                "expiration_date": "2030-05-01T12:00:00Z"
            }
        }"#;
        let parsed = parse_response(body).unwrap();
        assert_eq!(parsed.status, "success");
        assert_eq!(parsed.paste.id, "abc123");
        assert_eq!(parsed.paste.link, "https://mnn.im/abc123");
        assert_eq!(parsed.paste.raw, "https://mnn.im/raw/abc123");
        assert_eq!(parsed.paste.lang_code, "markdown");
        assert_eq!(parsed.paste.formatted, "https://mnn.im/abc123.md");
        assert_eq!(parsed.paste.expiration_date.unwrap().year(), 2030);
    }

    #[test]
    fn test_parse_only_needs_formatted() {
        let body = r#"{"paste": {"formatted": "https://mnn.im/x"}}"#;
        let parsed = parse_response(body).unwrap();
        assert_eq!(parsed.paste.formatted, "https://mnn.im/x");
        assert!(parsed.paste.expiration_date.is_none());
    }

    #[test]
    fn test_parse_tolerates_odd_expiration() {
        let body = r#"{"paste": {"formatted": "https://mnn.im/y", "expiration_date": "next tuesday"}}"#;
        let parsed = parse_response(body).unwrap();
        assert_eq!(parsed.paste.formatted, "https://mnn.im/y");
        assert!(parsed.paste.expiration_date.is_none());
    }

    #[test]
    fn test_parse_missing_link_fails() {
        assert!(parse_response(r#"{"status": "error", "paste": {}}"#).is_err());
        assert!(parse_response(r#"{"status": "error"}"#).is_err());
        assert!(parse_response("<html>502</html>").is_err());
    }

    #[tokio::test]
    async fn test_publish_network_failure_is_an_error() {
        let client = PasteClient::new(&PasteConfig {
            endpoint: "http://127.0.0.1:9/c".to_string(),
            timeout_secs: 2,
        })
        .unwrap();
        assert!(client.publish("title", "text").await.is_err());
    }
}
