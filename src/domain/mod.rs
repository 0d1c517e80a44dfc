//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (Event, RawReply, DeliveryAction, Command)
//! - Traits: Abstractions for collaborators (Commander, Language, Transport, LogSink)

pub mod entities;
pub mod traits;
