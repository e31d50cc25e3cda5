pub mod answer;
pub mod chat;
