//! Pure state transition function
//!
//! Given the same state and event this always produces the same result and
//! performs no I/O. Relay calls are requested through [`Effect`].

use super::state::{mood_greeting, ControllerState, Message, Stage, FALLBACK_REPLY};
use super::{Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ControllerState,
    pub effect: Option<Effect>,
}

impl TransitionResult {
    #[must_use]
    pub fn new(state: ControllerState) -> Self {
        Self {
            new_state: state,
            effect: None,
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// Reasons an event is not accepted. None of them change state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Input is empty")]
    EmptyInput,
    #[error("An exchange is already in flight")]
    Busy,
    #[error("{event} is not accepted in stage {stage:?}")]
    WrongStage { stage: Stage, event: &'static str },
    #[error("Relay outcome arrived with no exchange in flight")]
    NoPendingExchange,
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Compute the next state for an event.
///
/// # Errors
///
/// Returns a [`TransitionError`] when the event is not accepted in the
/// current state. The state is left as it was.
pub fn transition(
    state: &ControllerState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state.stage, event) {
        // ============================================================
        // Welcome
        // ============================================================
        (Stage::Welcome, Event::SubmitName { name }) => {
            if is_blank(&name) {
                return Err(TransitionError::EmptyInput);
            }
            let mut next = state.clone();
            next.display_name = Some(name.trim().to_string());
            next.stage = Stage::MoodSelection;
            Ok(TransitionResult::new(next))
        }

        // ============================================================
        // Mood selection (guided flow)
        // ============================================================

        // The acknowledgment is local and the stage advances before the relay
        // answers; the relay reply is folded in later.
        (Stage::MoodSelection, Event::SelectMood { mood, at }) => {
            if is_blank(&mood) {
                return Err(TransitionError::EmptyInput);
            }
            if state.pending {
                return Err(TransitionError::Busy);
            }
            let mut next = state.clone();
            next.messages
                .push(Message::bot(mood_greeting(state.display_name.as_deref(), &mood), at));
            next.mood = Some(mood.clone());
            next.pending = true;
            next.stage = Stage::Chat;
            Ok(TransitionResult::new(next).with_effect(Effect::DeclareMood { mood }))
        }

        // ============================================================
        // Ask mood (minimal flow)
        // ============================================================
        (Stage::AskMood, Event::SubmitText { text, at }) => {
            if is_blank(&text) {
                return Err(TransitionError::EmptyInput);
            }
            if state.pending {
                return Err(TransitionError::Busy);
            }
            let mut next = state.clone();
            next.messages.push(Message::user(text.clone(), at));
            next.mood = Some(text.clone());
            next.pending = true;
            next.stage = Stage::Chat;
            Ok(TransitionResult::new(next).with_effect(Effect::DeclareMood { mood: text }))
        }

        // ============================================================
        // Chat
        // ============================================================
        (Stage::Chat, Event::SubmitText { text, at }) => {
            if is_blank(&text) {
                return Err(TransitionError::EmptyInput);
            }
            if state.pending {
                return Err(TransitionError::Busy);
            }
            let mut next = state.clone();
            next.messages.push(Message::user(text.clone(), at));
            next.pending = true;
            Ok(TransitionResult::new(next).with_effect(Effect::Converse { message: text }))
        }

        // ============================================================
        // Relay outcomes (any stage with an exchange in flight)
        // ============================================================
        (_, Event::RelayReplied { text, at }) => fold_bot_message(state, text, at),
        (_, Event::RelayFailed { at }) => fold_bot_message(state, FALLBACK_REPLY.to_string(), at),

        // ============================================================
        // Input not accepted in this stage
        // ============================================================
        (stage, event) => Err(TransitionError::WrongStage {
            stage,
            event: event_name(&event),
        }),
    }
}

fn fold_bot_message(
    state: &ControllerState,
    text: String,
    at: String,
) -> Result<TransitionResult, TransitionError> {
    if !state.pending {
        return Err(TransitionError::NoPendingExchange);
    }
    let mut next = state.clone();
    next.messages.push(Message::bot(text, at));
    next.pending = false;
    Ok(TransitionResult::new(next))
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::SubmitName { .. } => "SubmitName",
        Event::SelectMood { .. } => "SelectMood",
        Event::SubmitText { .. } => "SubmitText",
        Event::RelayReplied { .. } => "RelayReplied",
        Event::RelayFailed { .. } => "RelayFailed",
    }
}
