pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{LocalShell, SshSession, SshSettings};
pub use crate::config::{AppConfig, TomlConfig, Transport};
pub use crate::core::client::{ClientSettings, InvoiceClient};
pub use crate::core::memo::{clip, clip_invoice_memo, MEMO_MAX_BYTES};
pub use crate::core::response::{parse, parse_lines};
pub use crate::domain::amount::MilliSatoshis;
pub use crate::domain::model::{AddInvoiceRequest, Invoice, InvoiceState, ParsedRecord};
pub use crate::domain::ports::RemoteExecutor;
pub use crate::utils::error::{InvoiceError, Result};
