use crate::core::command::{LncliCommand, DEFAULT_LNCLI};
use crate::core::memo::{self, MEMO_MAX_BYTES};
use crate::core::response;
use crate::domain::model::{AddInvoiceRequest, AddedInvoice, Invoice, InvoiceState, ParsedRecord};
use crate::domain::ports::RemoteExecutor;
use crate::utils::error::Result;
use crate::utils::validation::validate_payment_hash;

pub const DEFAULT_EXPIRY_SECONDS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// How lncli is invoked on the node host, e.g. `docker exec lnd lncli`.
    pub lncli: String,
    pub memo_max_bytes: usize,
    pub default_expiry: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            lncli: DEFAULT_LNCLI.to_string(),
            memo_max_bytes: MEMO_MAX_BYTES,
            default_expiry: DEFAULT_EXPIRY_SECONDS,
        }
    }
}

/// Issues lncli invoice commands over a caller-owned session.
///
/// The client keeps no connection state; each call runs its commands on the
/// session it is given and waits for the full response.
#[derive(Debug, Clone, Default)]
pub struct InvoiceClient {
    settings: ClientSettings,
}

impl InvoiceClient {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    async fn run<E: RemoteExecutor + ?Sized>(
        &self,
        session: &E,
        command: &LncliCommand,
    ) -> Result<ParsedRecord> {
        let line = command.render(&self.settings.lncli);
        tracing::debug!(command = command.name(), "executing: {}", line);

        let lines = session.execute(&line).await?;
        tracing::debug!(command = command.name(), lines = lines.len(), "received response");

        response::parse_lines(&lines)
    }

    pub async fn add_invoice<E: RemoteExecutor + ?Sized>(
        &self,
        session: &E,
        request: &AddInvoiceRequest,
    ) -> Result<Invoice> {
        let command = LncliCommand::AddInvoice {
            amount: request.amount,
            memo: memo::clip(&request.memo, self.settings.memo_max_bytes),
            expiry: request.expiry.unwrap_or(self.settings.default_expiry),
        };
        let record = self.run(session, &command).await?;

        // 有些版本直接回傳完整發票，否則只有 r_hash 等欄位，需要再查一次
        if let Ok(invoice) = Invoice::from_record(record.clone()) {
            tracing::info!(r_hash = %invoice.r_hash, "invoice added");
            return Ok(invoice);
        }

        let added = AddedInvoice::from_record(record)?;
        tracing::info!(
            r_hash = %added.r_hash,
            add_index = added.add_index,
            "invoice added"
        );
        self.get_invoice(session, &added.r_hash).await
    }

    pub async fn get_invoice<E: RemoteExecutor + ?Sized>(
        &self,
        session: &E,
        r_hash: &str,
    ) -> Result<Invoice> {
        validate_payment_hash(r_hash)?;

        let command = LncliCommand::LookupInvoice {
            r_hash: r_hash.to_string(),
        };
        let record = self.run(session, &command).await?;
        Invoice::from_record(record)
    }

    pub async fn get_invoice_state<E: RemoteExecutor + ?Sized>(
        &self,
        session: &E,
        r_hash: &str,
    ) -> Result<InvoiceState> {
        Ok(self.get_invoice(session, r_hash).await?.state)
    }
}
