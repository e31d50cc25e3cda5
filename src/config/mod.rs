use std::time::Duration;
use url::Url;

use crate::cli::Args;
use crate::error::ConfigError;

pub const DEFAULT_ANSWER_URL: &str = "https://airbus-chat-bot.vercel.app/chat";

pub const DEFAULT_WELCOME_MESSAGE: &str =
    "Welcome to the A320 Technical Assistant! I specialize in Airbus A320 specifications, systems, and procedures. What would you like to know about this remarkable aircraft?";

/// Text shown in place of an answer whenever a question could not be delivered.
pub const DELIVERY_FAILURE_MESSAGE: &str = "Error: Unable to connect to server";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPolicy {
    /// Reject a new question while another one is awaiting its answer.
    Serialized,
    /// Let questions overlap; each one resolves its own message.
    Overlapping,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub answer_url: Url,
    pub request_timeout: Option<Duration>,
    pub submit_policy: SubmitPolicy,
    pub welcome_message: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            answer_url: Url::parse(DEFAULT_ANSWER_URL).expect("default answer url is valid"),
            request_timeout: Some(Duration::from_secs(60)),
            submit_policy: SubmitPolicy::Serialized,
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
        }
    }
}

impl ChatConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let answer_url = parse_answer_url(&args.answer_url)?;
        let request_timeout = match args.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let submit_policy = if args.allow_overlap {
            SubmitPolicy::Overlapping
        } else {
            SubmitPolicy::Serialized
        };
        if args.welcome_message.trim().is_empty() {
            return Err(ConfigError::EmptyWelcomeMessage);
        }

        Ok(Self {
            answer_url,
            request_timeout,
            submit_policy,
            welcome_message: args.welcome_message.clone(),
        })
    }
}

pub fn parse_answer_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidAnswerUrl {
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn builds_from_default_args() {
        let args = Args::parse_from(["a320-assistant"]);
        let config = ChatConfig::from_args(&args).unwrap();
        assert_eq!(config.answer_url.as_str(), DEFAULT_ANSWER_URL);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.submit_policy, SubmitPolicy::Serialized);
    }

    #[test]
    fn zero_timeout_disables_it_and_overlap_switches_policy() {
        let args = Args::parse_from([
            "a320-assistant",
            "--request-timeout-secs",
            "0",
            "--allow-overlap",
        ]);
        let config = ChatConfig::from_args(&args).unwrap();
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.submit_policy, SubmitPolicy::Overlapping);
    }

    #[test]
    fn rejects_unusable_urls() {
        assert!(matches!(
            parse_answer_url("not a url"),
            Err(ConfigError::InvalidAnswerUrl { .. })
        ));
        assert!(matches!(
            parse_answer_url("ftp://example.com/chat"),
            Err(ConfigError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
        assert!(parse_answer_url("http://127.0.0.1:8000/chat").is_ok());
    }

    #[test]
    fn rejects_blank_welcome_message() {
        let args = Args::parse_from(["a320-assistant", "--welcome-message", "   "]);
        assert!(matches!(
            ChatConfig::from_args(&args),
            Err(ConfigError::EmptyWelcomeMessage)
        ));
    }
}
