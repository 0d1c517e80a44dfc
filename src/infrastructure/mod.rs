//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: Conversation log sinks
//! - Adapters: Transports (console, in-memory)

pub mod adapters;
pub mod config;
pub mod storage;
