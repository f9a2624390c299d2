//! Prompt composition
//!
//! Every prompt is self-contained: persona instructions, the current mood and
//! the user's words. No prior turns are replayed.

/// Placeholder used when no mood has been declared yet
pub const UNKNOWN_MOOD: &str = "Unknown";

/// Persona and style instructions, reused verbatim in every prompt
pub const PERSONA_INSTRUCTIONS: &str = r#"You are a warm, emotionally intelligent companion who responds like a real friend.
Your goal is to hold a flowing, natural conversation, not to repeat the same kind of
comforting message. Show emotional awareness AND conversational variety.

Your behavior:
- Understand the user's feelings deeply.
- Respond naturally, like a close friend would, not like a therapist or a script.
- Do not repeat phrases you used earlier (no stock "I'm so sorry" in every message).
- Vary your tone: sometimes comforting, sometimes reflective, sometimes curious, sometimes honest.
- Ask meaningful follow-up questions based on what the user just said.
- If the user expresses sadness or insecurity, validate them and gently widen the conversation.
- Use natural human expressions. Avoid generic sympathy lines.
- Keep replies short and in simple, plain language."#;

const MOOD_DIRECTIVE: &str = r"Respond like a caring friend.
Acknowledge their mood warmly and ask a gentle, open-ended follow-up question such as:
- What happened?
- Do you want to talk about it?
- I'm here for you.

Keep the reply short, comforting, and natural.";

const CHAT_DIRECTIVE: &str =
    "Respond in a caring, emotionally aware tone that fits their current mood.";

/// Prompt for a fresh mood declaration
#[must_use]
pub fn mood_prompt(mood: &str) -> String {
    format!(
        "{PERSONA_INSTRUCTIONS}\n\nThe user has shared their current mood.\n\nUser Mood: {mood}\n\n{MOOD_DIRECTIVE}"
    )
}

/// Prompt for a chat message, framed by the stored mood (if any)
#[must_use]
pub fn chat_prompt(mood: Option<&str>, message: &str) -> String {
    let mood = mood.unwrap_or(UNKNOWN_MOOD);
    format!(
        "{PERSONA_INSTRUCTIONS}\n\nUser's Current Mood: {mood}\n\nUser Message: {message}\n\n{CHAT_DIRECTIVE}"
    )
}
