use crate::utils::error::{InvoiceError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Invoice amount in millisatoshis, the unit `addinvoice --amt_msat` expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilliSatoshis(u64);

impl MilliSatoshis {
    pub const PER_SATOSHI: u64 = 1_000;

    pub fn new(msat: u64) -> Self {
        Self(msat)
    }

    pub fn from_sats(sats: u64) -> Result<Self> {
        sats.checked_mul(Self::PER_SATOSHI)
            .map(Self)
            .ok_or_else(|| overflow(&sats.to_string()))
    }

    /// Parses a decimal satoshi amount such as `"21"` or `"0.5"`.
    ///
    /// Digits below one millisatoshi are rounded half-to-even.
    pub fn from_sats_str(input: &str) -> Result<Self> {
        let s = input.trim();
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));

        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
            return Err(InvoiceError::ValidationError {
                message: format!("'{}' is not a valid non-negative satoshi amount", input),
            });
        }

        let whole_msat = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u64>()
                .ok()
                .and_then(|sats| sats.checked_mul(Self::PER_SATOSHI))
                .ok_or_else(|| overflow(input))?
        };

        let (head, tail) = frac.split_at(frac.len().min(3));
        let head_value = head
            .bytes()
            .fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'));
        let frac_msat = head_value * 10u64.pow(3 - head.len() as u32);

        let msat = whole_msat
            .checked_add(frac_msat)
            .ok_or_else(|| overflow(input))?;

        let round_up = match tail.as_bytes().split_first() {
            None => false,
            Some((&first, rest)) => match first.cmp(&b'5') {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Less => false,
                std::cmp::Ordering::Equal => rest.iter().any(|&b| b != b'0') || msat % 2 == 1,
            },
        };

        if round_up {
            msat.checked_add(1).map(Self).ok_or_else(|| overflow(input))
        } else {
            Ok(Self(msat))
        }
    }

    pub fn as_msat(self) -> u64 {
        self.0
    }
}

fn overflow(input: &str) -> InvoiceError {
    InvoiceError::ValidationError {
        message: format!("Amount {} sat is too large", input),
    }
}

impl FromStr for MilliSatoshis {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_sats_str(s)
    }
}

impl fmt::Display for MilliSatoshis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} msat", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msat(s: &str) -> u64 {
        MilliSatoshis::from_sats_str(s).unwrap().as_msat()
    }

    #[test]
    fn test_whole_satoshis() {
        assert_eq!(msat("0"), 0);
        assert_eq!(msat("21"), 21_000);
        assert_eq!(msat(" 100 "), 100_000);
        assert_eq!(MilliSatoshis::from_sats(7).unwrap().as_msat(), 7_000);
    }

    #[test]
    fn test_fractional_satoshis() {
        assert_eq!(msat("0.5"), 500);
        assert_eq!(msat(".25"), 250);
        assert_eq!(msat("1.001"), 1_001);
        assert_eq!(msat("3."), 3_000);
    }

    #[test]
    fn test_sub_millisatoshi_rounding() {
        assert_eq!(msat("0.0014"), 1);
        assert_eq!(msat("0.0016"), 2);
        assert_eq!(msat("0.0015"), 2);
        assert_eq!(msat("0.0025"), 2);
        assert_eq!(msat("0.00251"), 3);
    }

    #[test]
    fn test_rejects_invalid_amounts() {
        for input in ["", ".", "-1", "+1", "1e3", "abc", "1.2.3", "1,5"] {
            assert!(
                MilliSatoshis::from_sats_str(input).is_err(),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert!(MilliSatoshis::from_sats(u64::MAX).is_err());
        assert!(MilliSatoshis::from_sats_str("99999999999999999999").is_err());
    }
}
