//! Message handling - Event-to-reply pipeline

pub mod parser;
pub mod postmaster;
pub mod resolver;
pub mod router;
pub mod trigger;

pub use parser::MessageParser;
pub use postmaster::{Postmaster, Route, SendKind};
pub use resolver::ReplyResolver;
pub use router::{Collaborators, Disposition, EventRouter, RouterSettings};
pub use trigger::TriggerMatcher;
