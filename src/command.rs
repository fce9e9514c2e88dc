use thiserror::Error;

/// Label used when a spoiler command carries no custom warning
pub const DEFAULT_WARNING: &str = "Content Warning";

const SPOILER_PREFIXES: [&str; 2] = ["!sp ", "!cw "];

/// A recognized chat command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Hide `content` behind a masked preview captioned with `warning`
    Spoiler { warning: String, content: String },
    Help,
    Stats,
    Ping,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("spoiler command is missing its content")]
    MissingContent,
}

/// Classify a raw message.
///
/// Returns `Ok(None)` for text that is not a command. Matching is
/// case-insensitive, but the warning and content keep the original casing.
pub fn parse(text: &str) -> Result<Option<Command>, ParseError> {
    match text.trim().to_lowercase().as_str() {
        "!help" => return Ok(Some(Command::Help)),
        "!stats" => return Ok(Some(Command::Stats)),
        "!ping" => return Ok(Some(Command::Ping)),
        _ => {}
    }

    let Some(rest) = strip_spoiler_prefix(text) else {
        return Ok(None);
    };
    if rest.is_empty() {
        return Ok(None);
    }

    // Only a `|` on the first line separates the warning from the content.
    let first_line_end = rest.find('\n').unwrap_or(rest.len());
    let split = rest[..first_line_end]
        .find('|')
        .map(|at| (&rest[..at], &rest[at + 1..]));

    let (warning, content) = match split {
        Some((label, content)) => {
            let label = label.trim();
            let warning = if label.is_empty() {
                DEFAULT_WARNING
            } else {
                label
            };
            (warning, content.trim())
        }
        None => (DEFAULT_WARNING, rest.trim()),
    };

    if content.is_empty() {
        return Err(ParseError::MissingContent);
    }

    Ok(Some(Command::Spoiler {
        warning: warning.to_string(),
        content: content.to_string(),
    }))
}

/// Strip a leading `!sp ` / `!cw ` (any case) and return the remainder.
fn strip_spoiler_prefix(text: &str) -> Option<&str> {
    let head = text.get(..4)?;
    SPOILER_PREFIXES
        .iter()
        .any(|prefix| head.eq_ignore_ascii_case(prefix))
        .then(|| &text[4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spoiler(warning: &str, content: &str) -> Command {
        Command::Spoiler {
            warning: warning.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_custom_warning_is_split_on_first_pipe() {
        let cmd = parse("!sp my secret|this is the body").unwrap();
        assert_eq!(cmd, Some(spoiler("my secret", "this is the body")));
    }

    #[test]
    fn test_later_pipes_stay_in_content() {
        let cmd = parse("!sp  spoiler for star warps | a|b | c ").unwrap();
        assert_eq!(cmd, Some(spoiler("spoiler for star warps", "a|b | c")));
    }

    #[test]
    fn test_no_pipe_uses_default_warning() {
        let cmd = parse("!cw just this").unwrap();
        assert_eq!(cmd, Some(spoiler("Content Warning", "just this")));
    }

    #[test]
    fn test_prefix_is_case_insensitive_and_keeps_original_case() {
        let cmd = parse("!SP Darth Vader|Is Luke's FATHER").unwrap();
        assert_eq!(cmd, Some(spoiler("Darth Vader", "Is Luke's FATHER")));

        let cmd = parse("!Cw Snape Kills Dumbledore").unwrap();
        assert_eq!(cmd, Some(spoiler(DEFAULT_WARNING, "Snape Kills Dumbledore")));
    }

    #[test]
    fn test_multiline_content_is_kept() {
        let cmd = parse("!sp ending|line one\nline two").unwrap();
        assert_eq!(cmd, Some(spoiler("ending", "line one\nline two")));
    }

    #[test]
    fn test_pipe_after_first_line_is_content() {
        let cmd = parse("!sp line one\nwarn|body").unwrap();
        assert_eq!(cmd, Some(spoiler(DEFAULT_WARNING, "line one\nwarn|body")));
    }

    #[test]
    fn test_first_line_pipe_keeps_later_lines() {
        let cmd = parse("!cw ending | line one\nline | two").unwrap();
        assert_eq!(cmd, Some(spoiler("ending", "line one\nline | two")));
    }

    #[test]
    fn test_empty_label_falls_back_to_default() {
        let cmd = parse("!sp |hidden").unwrap();
        assert_eq!(cmd, Some(spoiler(DEFAULT_WARNING, "hidden")));
    }

    #[test]
    fn test_empty_content_after_pipe_is_an_error() {
        assert_eq!(parse("!sp warning|"), Err(ParseError::MissingContent));
        assert_eq!(parse("!sp warning|   "), Err(ParseError::MissingContent));
    }

    #[test]
    fn test_whitespace_only_content_is_an_error() {
        assert_eq!(parse("!cw    "), Err(ParseError::MissingContent));
    }

    #[test]
    fn test_bare_prefix_is_not_a_command() {
        assert_eq!(parse("!sp "), Ok(None));
        assert_eq!(parse("!sp"), Ok(None));
        assert_eq!(parse("!spoiler text"), Ok(None));
    }

    #[test]
    fn test_simple_commands_any_case() {
        for (text, expected) in [
            ("!help", Command::Help),
            ("!HELP", Command::Help),
            ("!Stats", Command::Stats),
            ("!ping", Command::Ping),
            ("!PiNg", Command::Ping),
        ] {
            assert_eq!(parse(text), Ok(Some(expected)));
        }
    }

    #[test]
    fn test_simple_commands_never_match_spoiler() {
        for text in ["!help", "!stats", "!ping"] {
            assert!(!matches!(parse(text), Ok(Some(Command::Spoiler { .. }))));
        }
    }

    #[test]
    fn test_unrecognized_text() {
        assert_eq!(parse("hello there"), Ok(None));
        assert_eq!(parse("!pingpong"), Ok(None));
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("é!sp x"), Ok(None));
    }

    #[test]
    fn test_multibyte_start_does_not_panic() {
        assert_eq!(parse("日本語のテキスト"), Ok(None));
    }
}
