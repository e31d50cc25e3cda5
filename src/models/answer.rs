use serde::{ Deserialize, Serialize };

/// Body of the POST sent to the answer-generation service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

/// Body the answer-generation service replies with.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}
