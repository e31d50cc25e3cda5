use thiserror::Error;

/// Why a question did not produce an answer.
///
/// The controller does not branch on the variant: every failure marks the
/// question as failed and shows the same fixed text. The variants exist so
/// the cause can be logged.
#[derive(Debug, Error)]
pub enum DeliveryFailure {
    #[error("answer service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("answer service responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed answer payload: {0}")]
    MalformedPayload(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid answer url '{url}': {source}")]
    InvalidAnswerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("answer url must use http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("welcome message must not be empty")]
    EmptyWelcomeMessage,

    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
