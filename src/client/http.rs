use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::Client as HttpClient;
use url::Url;

use super::AnswerClient;
use crate::config::ChatConfig;
use crate::error::{ ConfigError, DeliveryFailure };
use crate::models::answer::{ AnswerResponse, QuestionRequest };

#[derive(Debug)]
pub struct HttpAnswerClient {
    http: HttpClient,
    answer_url: Url,
}

impl HttpAnswerClient {
    pub fn new(http: HttpClient, answer_url: Url) -> Self {
        Self { http, answer_url }
    }

    pub fn from_config(config: &ChatConfig) -> Result<Self, ConfigError> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ConfigError::HttpClient)?;

        Ok(Self::new(http, config.answer_url.clone()))
    }

    pub async fn generate(&self, question: &str) -> Result<AnswerResponse, DeliveryFailure> {
        let req = QuestionRequest {
            question: question.to_string(),
        };
        debug!("POST {} ({} chars)", self.answer_url, question.len());
        let resp = self.http.post(self.answer_url.clone()).json(&req).send().await?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Answer service at {} returned {}", self.answer_url, status);
            return Err(DeliveryFailure::Status(status));
        }

        let body = resp.text().await?;
        serde_json::from_str::<AnswerResponse>(&body).map_err(|e| {
            warn!("Unparseable answer payload from {}: {}", self.answer_url, e);
            DeliveryFailure::MalformedPayload(e.to_string())
        })
    }
}

#[async_trait]
impl AnswerClient for HttpAnswerClient {
    async fn ask(&self, question: &str) -> Result<String, DeliveryFailure> {
        let resp = self.generate(question).await?;
        Ok(resp.answer)
    }

    fn endpoint(&self) -> String {
        self.answer_url.to_string()
    }
}
