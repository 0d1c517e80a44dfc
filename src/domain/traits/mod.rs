//! Domain traits - Abstractions for infrastructure implementations

pub mod commander;
pub mod language;
pub mod log_sink;
pub mod transport;

pub use commander::{Commander, LifecycleEvent};
pub use language::Language;
pub use log_sink::{LogScope, LogSink};
pub use transport::Transport;
