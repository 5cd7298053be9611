//! Subcommand implementations

pub mod inspect;
pub mod serve;

pub use inspect::{run_inspect, InspectArgs};
pub use serve::{run_serve, ServeArgs};
