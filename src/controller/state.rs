//! Controller state types

use serde::{Deserialize, Serialize};

/// Shown in place of a reply whenever an exchange fails
pub const FALLBACK_REPLY: &str =
    "I'm having trouble connecting right now. Please try again in a moment.";

/// Opening bot line of the minimal flow
pub const ASK_MOOD_PROMPT: &str =
    "Before we start, how are you feeling today? Please describe your mood.";

// ============================================================================
// Mood catalog
// ============================================================================

/// A selectable mood. Moods on the wire are plain strings; the catalog is a
/// convenience for display layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodOption {
    pub label: &'static str,
    pub emoji: &'static str,
}

pub const MOOD_CATALOG: &[MoodOption] = &[
    MoodOption {
        label: "happy",
        emoji: "😊",
    },
    MoodOption {
        label: "calm",
        emoji: "😌",
    },
    MoodOption {
        label: "sad",
        emoji: "😢",
    },
    MoodOption {
        label: "anxious",
        emoji: "😰",
    },
    MoodOption {
        label: "tired",
        emoji: "😴",
    },
    MoodOption {
        label: "confused",
        emoji: "😕",
    },
    MoodOption {
        label: "overwhelmed",
        emoji: "😵",
    },
    MoodOption {
        label: "neutral",
        emoji: "😐",
    },
];

/// Look up a catalog entry by label, ignoring case and surrounding whitespace
#[must_use]
pub fn find_mood(label: &str) -> Option<&'static MoodOption> {
    let label = label.trim();
    MOOD_CATALOG
        .iter()
        .find(|m| m.label.eq_ignore_ascii_case(label))
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// One entry of the conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    /// Display string, e.g. "14:05"
    pub timestamp: String,
}

impl Message {
    #[must_use]
    pub fn user(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            timestamp: timestamp.into(),
        }
    }

    #[must_use]
    pub fn bot(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            timestamp: timestamp.into(),
        }
    }
}

// ============================================================================
// Stage
// ============================================================================

/// Conversation phase; gates which input is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Waiting for a display name
    Welcome,
    /// Waiting for a pick from the mood catalog
    MoodSelection,
    /// Minimal flow: the first free-text answer is the mood
    AskMood,
    /// Free conversation (terminal)
    Chat,
}

impl Stage {
    /// Position in the forward-only ordering. Transitions never lower it.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Stage::Welcome => 0,
            Stage::MoodSelection | Stage::AskMood => 1,
            Stage::Chat => 2,
        }
    }
}

/// Which opening sequence the conversation uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// welcome -> mood-selection -> chat
    #[default]
    Guided,
    /// ask-mood -> chat
    Minimal,
}

// ============================================================================
// Controller state
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    pub stage: Stage,
    /// Append-only, chronological, render order
    pub messages: Vec<Message>,
    /// True from dispatch of a relay call until its outcome is in `messages`
    pub pending: bool,
    pub display_name: Option<String>,
    /// Mood as last declared by this controller
    pub mood: Option<String>,
}

impl ControllerState {
    #[must_use]
    pub fn new(flow: Flow, timestamp: impl Into<String>) -> Self {
        match flow {
            Flow::Guided => Self::at_stage(Stage::Welcome),
            Flow::Minimal => {
                let mut state = Self::at_stage(Stage::AskMood);
                state.messages.push(Message::bot(ASK_MOOD_PROMPT, timestamp));
                state
            }
        }
    }

    /// State at an arbitrary stage with an empty log
    #[must_use]
    pub fn at_stage(stage: Stage) -> Self {
        Self {
            stage,
            messages: Vec::new(),
            pending: false,
            display_name: None,
            mood: None,
        }
    }

    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Local acknowledgment shown the moment a mood is picked
#[must_use]
pub fn mood_greeting(name: Option<&str>, mood: &str) -> String {
    let mood = mood.trim();
    let feeling = match find_mood(mood) {
        Some(option) => format!("{} {}", option.label, option.emoji),
        None => mood.to_string(),
    };
    match name {
        Some(name) => {
            format!("Hi {name}! Thanks for telling me you're feeling {feeling}. I'm here with you.")
        }
        None => format!("Thanks for telling me you're feeling {feeling}. I'm here with you."),
    }
}
