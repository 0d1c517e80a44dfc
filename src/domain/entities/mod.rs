//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod event;
pub mod features;
pub mod reply;

pub use command::{Command, CommandHandler, CommandRegistry, Invocation};
pub use event::{Event, EventKind, ServerSignal, Source};
pub use features::NetworkFeatures;
pub use reply::{DeliveryAction, DestinationKey, RawReply, ReplyItem};
