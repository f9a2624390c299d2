//! Conversation controller
//!
//! Owns the visible dialogue: stage, message log and the pending flag. Each
//! user action is handled in two explicit steps:
//!
//! 1. [`Controller::submit`] applies the local state change at once and
//!    returns the relay call to make, if any.
//! 2. [`Controller::resolve`] folds the relay outcome into the log.
//!
//! [`Controller::handle`] runs both steps back to back against a
//! [`RelayClient`].

mod client;
mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use client::{HttpRelayClient, RelayClient};
pub use effect::Effect;
pub use event::{Event, UserInput};
pub use state::{
    find_mood, ControllerState, Flow, Message, MoodOption, Sender, Stage, FALLBACK_REPLY,
    MOOD_CATALOG,
};
pub use transition::{transition, TransitionError, TransitionResult};

use crate::relay::RelayError;

/// Display timestamp for a message created now
#[must_use]
pub fn display_time() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

/// Run the relay call an effect asks for
///
/// # Errors
///
/// Propagates the [`RelayError`] of the underlying relay operation.
pub async fn execute<R>(relay: &R, effect: &Effect) -> Result<String, RelayError>
where
    R: RelayClient + ?Sized,
{
    match effect {
        Effect::DeclareMood { mood } => relay.declare_mood(mood).await,
        Effect::Converse { message } => relay.converse(message).await,
    }
}

/// Stateful driver around the pure [`transition`] function
pub struct Controller {
    state: ControllerState,
    clock: fn() -> String,
}

impl Controller {
    #[must_use]
    pub fn new(flow: Flow) -> Self {
        Self::with_clock(flow, display_time)
    }

    /// Controller with a custom timestamp source
    #[must_use]
    pub fn with_clock(flow: Flow, clock: fn() -> String) -> Self {
        Self {
            state: ControllerState::new(flow, clock()),
            clock,
        }
    }

    /// Controller resuming from an existing state
    #[must_use]
    pub fn from_state(state: ControllerState) -> Self {
        Self {
            state,
            clock: display_time,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.pending
    }

    /// Mood this controller last declared, if any
    #[must_use]
    pub fn mood(&self) -> Option<&str> {
        self.state.mood.as_deref()
    }

    fn apply(&mut self, event: Event) -> Result<Option<Effect>, TransitionError> {
        let result = transition(&self.state, event)?;
        debug_assert!(result.new_state.stage.rank() >= self.state.stage.rank());
        self.state = result.new_state;
        Ok(result.effect)
    }

    /// Apply a user action locally.
    ///
    /// Rejected input (blank, wrong stage, or an exchange already in flight)
    /// leaves the state untouched and returns `None`.
    pub fn submit(&mut self, input: UserInput) -> Option<Effect> {
        let event = Event::from_input(input, (self.clock)());
        match self.apply(event) {
            Ok(effect) => effect,
            Err(e) => {
                tracing::debug!(reason = %e, stage = ?self.state.stage, "Input ignored");
                None
            }
        }
    }

    /// Fold the outcome of the in-flight exchange into the log.
    ///
    /// Failures are logged and shown as [`FALLBACK_REPLY`]; the cause never
    /// reaches the log.
    pub fn resolve(&mut self, outcome: Result<String, RelayError>) {
        let at = (self.clock)();
        let event = match outcome {
            Ok(text) => Event::RelayReplied { text, at },
            Err(e) => {
                tracing::warn!(error = %e, "Relay exchange failed, showing fallback");
                Event::RelayFailed { at }
            }
        };

        if let Err(e) = self.apply(event) {
            tracing::debug!(reason = %e, "Relay outcome ignored");
        }
    }

    /// Submit an action and, if it needs the relay, wait for and fold the
    /// answer. Returns whether the input was accepted.
    pub async fn handle<R>(&mut self, relay: &R, input: UserInput) -> bool
    where
        R: RelayClient + ?Sized,
    {
        let before = self.state.messages.len();
        let stage_before = self.state.stage;

        let Some(effect) = self.submit(input) else {
            // Accepted inputs without a relay call (the name) still move state
            return self.state.stage != stage_before || self.state.messages.len() != before;
        };

        tracing::debug!(operation = effect.operation(), "Dispatching relay call");
        let outcome = execute(relay, &effect).await;
        self.resolve(outcome);
        true
    }
}
