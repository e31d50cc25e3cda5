use log::{ debug, info, warn };
use std::sync::{ Arc, Mutex, MutexGuard };
use tokio::sync::watch;
use uuid::Uuid;

use crate::client::AnswerClient;
use crate::config::{ ChatConfig, SubmitPolicy, DELIVERY_FAILURE_MESSAGE };
use crate::models::chat::{ ChatMessage, ChatSnapshot, MessageStatus };
use crate::session::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// Another question is still awaiting its answer; nothing happened.
    Busy,
    Delivered,
    Failed,
    /// The conversation was reset while the request was in flight.
    Discarded,
}

struct ConversationState {
    session_id: SessionId,
    messages: Vec<ChatMessage>,
    input: String,
    in_flight: usize,
}

impl ConversationState {
    fn fresh(welcome_message: &str) -> Self {
        let session_id = SessionId::new();
        Self {
            session_id,
            messages: vec![ChatMessage::assistant(welcome_message, session_id)],
            input: String::new(),
            in_flight: 0,
        }
    }

    fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            session_id: self.session_id,
            messages: self.messages.clone(),
            awaiting_response: self.in_flight > 0,
            input: self.input.clone(),
        }
    }

    fn resolve(&mut self, message_id: Uuid, status: MessageStatus) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == message_id) {
            if message.status.is_some_and(|current| !current.is_terminal()) {
                message.status = Some(status);
            }
        }
    }
}

/// Owns the conversation log and mediates between user input and the
/// answer service. Cheap to clone; clones share the same conversation.
#[derive(Clone)]
pub struct ChatController {
    client: Arc<dyn AnswerClient>,
    policy: SubmitPolicy,
    welcome_message: Arc<str>,
    state: Arc<Mutex<ConversationState>>,
    updates: Arc<watch::Sender<ChatSnapshot>>,
}

impl ChatController {
    pub fn new(client: Arc<dyn AnswerClient>, config: &ChatConfig) -> Self {
        let state = ConversationState::fresh(&config.welcome_message);
        let (updates, _) = watch::channel(state.snapshot());
        info!("Chat session {} started against {}", state.session_id, client.endpoint());

        Self {
            client,
            policy: config.submit_policy,
            welcome_message: Arc::from(config.welcome_message.as_str()),
            state: Arc::new(Mutex::new(state)),
            updates: Arc::new(updates),
        }
    }

    fn state(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // Called with the state lock held so observers never see snapshots out of order.
    fn publish(&self, state: &ConversationState) {
        self.updates.send_replace(state.snapshot());
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.updates.subscribe()
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        self.state().snapshot()
    }

    pub fn session_id(&self) -> SessionId {
        self.state().session_id
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.state().in_flight > 0
    }

    pub fn input(&self) -> String {
        self.state().input.clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        let mut state = self.state();
        state.input = text.into();
        self.publish(&state);
    }

    /// Submits whatever is currently in the input buffer.
    pub async fn submit_input(&self) -> SubmitOutcome {
        let text = self.input();
        self.submit(&text).await
    }

    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            debug!("Ignoring blank submission");
            return SubmitOutcome::Ignored;
        }

        let (message_id, session_id) = {
            let mut state = self.state();
            if self.policy == SubmitPolicy::Serialized && state.in_flight > 0 {
                info!("Rejecting submission while a previous question is awaiting its answer");
                return SubmitOutcome::Busy;
            }
            let message = ChatMessage::user(text, state.session_id);
            let ids = (message.id, message.session_id);
            state.messages.push(message);
            state.in_flight += 1;
            state.input.clear();
            self.publish(&state);
            ids
        };

        let result = self.client.ask(text).await;

        let mut state = self.state();
        if state.session_id != session_id {
            debug!("Discarding answer for message {} from previous session {}", message_id, session_id);
            return SubmitOutcome::Discarded;
        }
        state.in_flight = state.in_flight.saturating_sub(1);

        let outcome = match result {
            Ok(answer) => {
                state.resolve(message_id, MessageStatus::Delivered);
                state.messages.push(ChatMessage::assistant(answer, session_id));
                SubmitOutcome::Delivered
            }
            Err(e) => {
                warn!("Question {} could not be delivered: {}", message_id, e);
                state.resolve(message_id, MessageStatus::Failed);
                state.messages.push(ChatMessage::assistant(DELIVERY_FAILURE_MESSAGE, session_id));
                SubmitOutcome::Failed
            }
        };
        self.publish(&state);
        outcome
    }

    /// Starts a new session whose log holds only the welcome message.
    pub fn reset(&self) -> SessionId {
        let mut state = self.state();
        let previous = state.session_id;
        *state = ConversationState::fresh(&self.welcome_message);
        info!("Session {} replaced by {}", previous, state.session_id);
        self.publish(&state);
        state.session_id
    }
}
