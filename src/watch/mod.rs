//! Watch lifecycle: registry, polling scheduler, commands and notifiers

pub mod commands;
pub mod notifier;
pub mod registry;
pub mod scheduler;

pub use commands::{Command, CommandHandler};
pub use notifier::{ChannelNotifier, LogNotifier};
pub use registry::WatchRegistry;
pub use scheduler::{evaluate_url, CycleReport, PollingScheduler};
