use crate::core::client::InvoiceClient;
use crate::domain::model::AddInvoiceRequest;
use crate::domain::ports::RemoteExecutor;
use crate::utils::error::Result;
use crate::utils::output::{render_invoice, OutputFormat};

/// One user-level invoice operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Add(AddInvoiceRequest),
    Lookup { r_hash: String },
    State { r_hash: String },
}

/// Runs `action` on `session` and returns the text to print.
pub async fn run_action<E: RemoteExecutor + ?Sized>(
    client: &InvoiceClient,
    session: &E,
    action: &Action,
    format: OutputFormat,
) -> Result<String> {
    match action {
        Action::Add(request) => {
            let invoice = client.add_invoice(session, request).await?;
            render_invoice(&invoice, format)
        }
        Action::Lookup { r_hash } => {
            let invoice = client.get_invoice(session, r_hash).await?;
            render_invoice(&invoice, format)
        }
        Action::State { r_hash } => {
            let state = client.get_invoice_state(session, r_hash).await?;
            Ok(state.to_string())
        }
    }
}
