use crate::domain::amount::MilliSatoshis;
use crate::utils::error::{InvoiceError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use std::fmt;
use std::str::FromStr;

/// Field mapping decoded from one lncli response.
pub type ParsedRecord = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceState {
    Open,
    Settled,
    Canceled,
    Accepted,
    Unknown,
}

impl InvoiceState {
    pub const ALL: [InvoiceState; 5] = [
        InvoiceState::Open,
        InvoiceState::Settled,
        InvoiceState::Canceled,
        InvoiceState::Accepted,
        InvoiceState::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceState::Open => "OPEN",
            InvoiceState::Settled => "SETTLED",
            InvoiceState::Canceled => "CANCELED",
            InvoiceState::Accepted => "ACCEPTED",
            InvoiceState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for InvoiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceState {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| InvoiceError::SchemaError {
                message: format!("unknown invoice state '{}'", s),
            })
    }
}

/// Text columns accept any JSON value; `null` becomes an empty string.
mod json_text {
    pub use super::json_structured::deserialize;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value)
    }
}

/// Structured columns are stored as compact JSON text and written back out
/// as the arrays and objects lncli printed.
mod json_structured {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_empty() {
            return serializer.serialize_none();
        }
        match serde_json::from_str::<Value>(value) {
            Ok(structured @ (Value::Array(_) | Value::Object(_))) => structured.serialize(serializer),
            _ => serializer.serialize_str(value),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }
}

/// An invoice as reported by `lncli lookupinvoice`.
///
/// lncli prints 64-bit integers as quoted strings, so every numeric column
/// accepts both `"1000"` and `1000`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Invoice {
    #[serde(with = "json_text")]
    pub memo: String,
    #[serde(with = "json_text")]
    pub r_preimage: String,
    #[serde(with = "json_text")]
    pub r_hash: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub value: i64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub value_msat: i64,
    pub settled: bool,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub creation_date: i64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub settle_date: i64,
    #[serde(with = "json_text")]
    pub payment_request: String,
    #[serde(with = "json_text")]
    pub description_hash: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub expiry: i64,
    #[serde(with = "json_text")]
    pub fallback_addr: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub cltv_expiry: u64,
    #[serde(with = "json_structured")]
    pub route_hints: String,
    pub private: bool,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub add_index: u64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub settle_index: u64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub amt_paid: i64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub amt_paid_sat: i64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub amt_paid_msat: i64,
    pub state: InvoiceState,
    #[serde(with = "json_structured")]
    pub htlcs: String,
    #[serde(with = "json_structured")]
    pub features: String,
    pub is_keysend: bool,
    #[serde(with = "json_text")]
    pub payment_addr: String,
    pub is_amp: bool,
    #[serde(with = "json_structured")]
    pub amp_invoice_state: String,
}

impl Invoice {
    /// Column order used for tabular output.
    pub const FIELDS: [&'static str; 27] = [
        "memo",
        "r_preimage",
        "r_hash",
        "value",
        "value_msat",
        "settled",
        "creation_date",
        "settle_date",
        "payment_request",
        "description_hash",
        "expiry",
        "fallback_addr",
        "cltv_expiry",
        "route_hints",
        "private",
        "add_index",
        "settle_index",
        "amt_paid",
        "amt_paid_sat",
        "amt_paid_msat",
        "state",
        "htlcs",
        "features",
        "is_keysend",
        "payment_addr",
        "is_amp",
        "amp_invoice_state",
    ];

    pub fn from_record(record: ParsedRecord) -> Result<Self> {
        serde_json::from_value(serde_json::Value::Object(record)).map_err(|e| {
            InvoiceError::SchemaError {
                message: e.to_string(),
            }
        })
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let expiry = self.creation_date.checked_add(self.expiry)?;
        DateTime::from_timestamp(expiry, 0)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.state == InvoiceState::Open && self.expires_at().is_some_and(|at| at <= now)
    }

    /// Ordered `(field, value)` pairs, one per schema column.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let values = [
            self.memo.clone(),
            self.r_preimage.clone(),
            self.r_hash.clone(),
            self.value.to_string(),
            self.value_msat.to_string(),
            self.settled.to_string(),
            self.creation_date.to_string(),
            self.settle_date.to_string(),
            self.payment_request.clone(),
            self.description_hash.clone(),
            self.expiry.to_string(),
            self.fallback_addr.clone(),
            self.cltv_expiry.to_string(),
            self.route_hints.clone(),
            self.private.to_string(),
            self.add_index.to_string(),
            self.settle_index.to_string(),
            self.amt_paid.to_string(),
            self.amt_paid_sat.to_string(),
            self.amt_paid_msat.to_string(),
            self.state.to_string(),
            self.htlcs.clone(),
            self.features.clone(),
            self.is_keysend.to_string(),
            self.payment_addr.clone(),
            self.is_amp.to_string(),
            self.amp_invoice_state.clone(),
        ];
        Self::FIELDS.into_iter().zip(values).collect()
    }
}

impl TryFrom<ParsedRecord> for Invoice {
    type Error = InvoiceError;

    fn try_from(record: ParsedRecord) -> Result<Self> {
        Self::from_record(record)
    }
}

/// Acknowledgement printed by `lncli addinvoice`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedInvoice {
    pub r_hash: String,
    pub payment_request: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub add_index: u64,
    #[serde(default)]
    pub payment_addr: String,
}

impl AddedInvoice {
    pub fn from_record(record: ParsedRecord) -> Result<Self> {
        serde_json::from_value(serde_json::Value::Object(record)).map_err(|e| {
            InvoiceError::SchemaError {
                message: format!("addinvoice: {}", e),
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddInvoiceRequest {
    pub amount: MilliSatoshis,
    pub memo: String,
    /// Seconds; `None` uses the client default.
    pub expiry: Option<u64>,
}

impl AddInvoiceRequest {
    pub fn new(amount: MilliSatoshis) -> Self {
        Self {
            amount,
            memo: String::new(),
            expiry: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn with_expiry(mut self, seconds: u64) -> Self {
        self.expiry = Some(seconds);
        self
    }
}
