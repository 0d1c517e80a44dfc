//! Application services - Bundled collaborators

pub mod command_service;
pub mod language_service;

pub use command_service::{CommandService, EventHook};
pub use language_service::KeywordLanguage;
