//! Events that can occur in a conversation

/// User actions accepted by the display layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    Name(String),
    Mood(String),
    Text(String),
}

/// Events that trigger state transitions.
///
/// Every event that creates a message carries its display timestamp so the
/// transition function stays pure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    SubmitName { name: String },
    SelectMood { mood: String, at: String },
    SubmitText { text: String, at: String },

    // Relay events
    RelayReplied { text: String, at: String },
    RelayFailed { at: String },
}

impl Event {
    #[must_use]
    pub fn from_input(input: UserInput, at: impl Into<String>) -> Self {
        match input {
            UserInput::Name(name) => Event::SubmitName { name },
            UserInput::Mood(mood) => Event::SelectMood { mood, at: at.into() },
            UserInput::Text(text) => Event::SubmitText { text, at: at.into() },
        }
    }
}
