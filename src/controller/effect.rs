//! Effects produced by state transitions

/// Relay call to make after the state update has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    DeclareMood { mood: String },
    Converse { message: String },
}

impl Effect {
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Effect::DeclareMood { .. } => "declare_mood",
            Effect::Converse { .. } => "converse",
        }
    }
}
