pub mod commands;

pub use commands::{run_action, Action};
