//! Moodchat - a mood-aware chat relay
//!
//! A controller state machine that turns user actions into relay calls, and a
//! relay that frames each message with the user's declared mood before handing
//! it to a text-generation provider.

pub mod api;
pub mod config;
pub mod controller;
pub mod llm;
pub mod relay;
