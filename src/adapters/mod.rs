// Adapters layer: concrete remote execution channels.

pub mod local;
mod process;
pub mod ssh;

pub use local::LocalShell;
pub use ssh::{SshSession, SshSettings};
