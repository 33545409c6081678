pub mod client;
pub mod command;
pub mod memo;
pub mod response;

pub use crate::domain::model::{AddInvoiceRequest, Invoice, InvoiceState, ParsedRecord};
pub use crate::domain::ports::RemoteExecutor;
pub use crate::utils::error::Result;
