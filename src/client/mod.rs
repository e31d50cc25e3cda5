pub mod http;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ChatConfig;
use crate::error::{ ConfigError, DeliveryFailure };
use self::http::HttpAnswerClient;

/// The external answer-generation service: one question in, one answer out.
#[async_trait]
pub trait AnswerClient: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String, DeliveryFailure>;

    fn endpoint(&self) -> String;
}

pub fn new_client(config: &ChatConfig) -> Result<Arc<dyn AnswerClient>, ConfigError> {
    let client = HttpAnswerClient::from_config(config)?;
    Ok(Arc::new(client))
}
