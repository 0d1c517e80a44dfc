//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Errors: Domain-specific errors
//! - Logging: Channel and query conversation loggers
//! - Messaging: Trigger matching, reply resolution, delivery, event routing
//! - Services: Bundled command engine and language engine

pub mod errors;
pub mod logging;
pub mod messaging;
pub mod services;
