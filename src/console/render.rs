use uuid::Uuid;

use crate::models::chat::{ ChatMessage, ChatSnapshot, MessageStatus, Role };
use crate::session::SessionId;

pub const ASSISTANT_LABEL: &str = "A320 Technical Assistant";
pub const TYPING_INDICATOR: &str = "A320 Technical Assistant is typing...";
pub const SESSION_SEPARATOR: &str = "---------------- New Session ----------------";
pub const NOT_DELIVERED_MARKER: &str = "  (not delivered)";

pub fn render_message(message: &ChatMessage) -> String {
    match message.role {
        Role::Assistant => format!("{}: {}", ASSISTANT_LABEL, message.content),
        Role::User => match message.status {
            Some(MessageStatus::Failed) => format!("You (not delivered): {}", message.content),
            _ => render_question(message),
        },
    }
}

fn render_question(message: &ChatMessage) -> String {
    format!("You: {}", message.content)
}

/// Remembers how much of the conversation has been printed so each
/// snapshot only yields the lines that are new.
///
/// Questions are printed as soon as they are appended. When a printed
/// question later fails, only the failure marker is printed.
#[derive(Debug, Default)]
pub struct Transcript {
    session_id: Option<SessionId>,
    printed: usize,
    unresolved: Vec<Uuid>,
    typing_shown: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, snapshot: &ChatSnapshot) -> Vec<String> {
        let mut lines = Vec::new();

        if self.session_id != Some(snapshot.session_id) {
            if self.session_id.is_some() {
                lines.push(SESSION_SEPARATOR.to_string());
            }
            self.session_id = Some(snapshot.session_id);
            self.printed = 0;
            self.unresolved.clear();
            self.typing_shown = false;
        }

        self.unresolved.retain(|id| {
            match snapshot.messages.iter().find(|m| m.id == *id) {
                Some(message) if message.is_pending() => true,
                Some(message) => {
                    if message.status == Some(MessageStatus::Failed) {
                        lines.push(NOT_DELIVERED_MARKER.to_string());
                    }
                    false
                }
                None => false,
            }
        });

        for message in snapshot.messages.iter().skip(self.printed) {
            match message.status {
                Some(MessageStatus::Pending) => {
                    lines.push(render_question(message));
                    self.unresolved.push(message.id);
                }
                Some(MessageStatus::Failed) => {
                    lines.push(render_question(message));
                    lines.push(NOT_DELIVERED_MARKER.to_string());
                }
                _ => lines.push(render_message(message)),
            }
        }
        self.printed = self.printed.max(snapshot.messages.len());

        if snapshot.awaiting_response {
            if !self.typing_shown {
                lines.push(TYPING_INDICATOR.to_string());
                self.typing_shown = true;
            }
        } else {
            self.typing_shown = false;
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(session_id: SessionId, messages: Vec<ChatMessage>, awaiting: bool) -> ChatSnapshot {
        ChatSnapshot {
            session_id,
            messages,
            awaiting_response: awaiting,
            input: String::new(),
        }
    }

    #[test]
    fn failed_questions_are_marked() {
        let session = SessionId::new();
        let mut question = ChatMessage::user("test", session);
        assert_eq!(render_message(&question), "You: test");
        question.status = Some(MessageStatus::Failed);
        assert_eq!(render_message(&question), "You (not delivered): test");
        assert_eq!(
            render_message(&ChatMessage::assistant("78 tons", session)),
            "A320 Technical Assistant: 78 tons"
        );
    }

    #[test]
    fn question_prints_before_typing_indicator_and_answer_follows() {
        let session = SessionId::new();
        let welcome = ChatMessage::assistant("Welcome", session);
        let mut question = ChatMessage::user("MTOW?", session);
        let mut transcript = Transcript::new();

        assert_eq!(
            transcript.advance(&snapshot(session, vec![welcome.clone()], false)),
            vec!["A320 Technical Assistant: Welcome".to_string()]
        );

        let lines = transcript.advance(&snapshot(session, vec![welcome.clone(), question.clone()], true));
        assert_eq!(lines, vec!["You: MTOW?".to_string(), TYPING_INDICATOR.to_string()]);

        // Indicator is shown once per wait.
        let lines = transcript.advance(&snapshot(session, vec![welcome.clone(), question.clone()], true));
        assert!(lines.is_empty());

        question.status = Some(MessageStatus::Delivered);
        let answer = ChatMessage::assistant("78 tons", session);
        let lines = transcript.advance(&snapshot(session, vec![welcome, question, answer], false));
        assert_eq!(lines, vec!["A320 Technical Assistant: 78 tons".to_string()]);
    }

    #[test]
    fn failure_prints_marker_then_error_text() {
        let session = SessionId::new();
        let welcome = ChatMessage::assistant("Welcome", session);
        let mut question = ChatMessage::user("test", session);
        let mut transcript = Transcript::new();
        transcript.advance(&snapshot(session, vec![welcome.clone(), question.clone()], true));

        question.status = Some(MessageStatus::Failed);
        let error = ChatMessage::assistant("Error: Unable to connect to server", session);
        let lines = transcript.advance(&snapshot(session, vec![welcome, question, error], false));
        assert_eq!(lines, vec![
            NOT_DELIVERED_MARKER.to_string(),
            "A320 Technical Assistant: Error: Unable to connect to server".to_string()
        ]);
    }

    #[test]
    fn question_seen_only_after_failing_still_gets_marker() {
        let session = SessionId::new();
        let welcome = ChatMessage::assistant("Welcome", session);
        let mut question = ChatMessage::user("test", session);
        question.status = Some(MessageStatus::Failed);
        let error = ChatMessage::assistant("Error: Unable to connect to server", session);
        let mut transcript = Transcript::new();
        transcript.advance(&snapshot(session, vec![welcome.clone()], false));

        let lines = transcript.advance(&snapshot(session, vec![welcome, question, error], false));
        assert_eq!(lines, vec![
            "You: test".to_string(),
            NOT_DELIVERED_MARKER.to_string(),
            "A320 Technical Assistant: Error: Unable to connect to server".to_string()
        ]);
    }

    #[test]
    fn new_session_prints_separator_and_fresh_welcome() {
        let first = SessionId::new();
        let second = SessionId::new();
        let mut transcript = Transcript::new();
        transcript.advance(&snapshot(first, vec![ChatMessage::assistant("Welcome", first)], false));

        let lines = transcript.advance(
            &snapshot(second, vec![ChatMessage::assistant("Welcome", second)], false)
        );
        assert_eq!(lines, vec![
            SESSION_SEPARATOR.to_string(),
            "A320 Technical Assistant: Welcome".to_string()
        ]);
    }
}
