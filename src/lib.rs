//! nano-irc: event-to-reply pipeline for a small IRC chat bot

pub mod domain;
pub mod application;
pub mod infrastructure;
