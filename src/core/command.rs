use crate::domain::amount::MilliSatoshis;
use std::fmt;

pub const DEFAULT_LNCLI: &str = "lncli";

/// The lncli subcommands this client issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LncliCommand {
    AddInvoice {
        amount: MilliSatoshis,
        memo: String,
        expiry: u64,
    },
    LookupInvoice {
        r_hash: String,
    },
}

impl LncliCommand {
    pub fn name(&self) -> &'static str {
        match self {
            LncliCommand::AddInvoice { .. } => "addinvoice",
            LncliCommand::LookupInvoice { .. } => "lookupinvoice",
        }
    }

    /// Full shell command line, e.g. `docker exec lnd lncli lookupinvoice <hash>`.
    pub fn render(&self, lncli: &str) -> String {
        format!("{} {}", lncli, self)
    }
}

impl fmt::Display for LncliCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LncliCommand::AddInvoice {
                amount,
                memo,
                expiry,
            } => write!(
                f,
                "addinvoice --amt_msat {} --memo \"{}\" --expiry {}",
                amount.as_msat(),
                escape_double_quoted(memo),
                expiry
            ),
            LncliCommand::LookupInvoice { r_hash } => write!(f, "lookupinvoice {}", r_hash),
        }
    }
}

/// Escapes the characters a POSIX shell still interprets inside double quotes.
pub fn escape_double_quoted(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '"' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_add_invoice() {
        let cmd = LncliCommand::AddInvoice {
            amount: MilliSatoshis::new(1_500_000),
            memo: "coffee".to_string(),
            expiry: 300,
        };
        assert_eq!(
            cmd.render(DEFAULT_LNCLI),
            "lncli addinvoice --amt_msat 1500000 --memo \"coffee\" --expiry 300"
        );
        assert_eq!(cmd.name(), "addinvoice");
    }

    #[test]
    fn test_render_lookup_with_docker_prefix() {
        let cmd = LncliCommand::LookupInvoice {
            r_hash: "ab".repeat(32),
        };
        assert_eq!(
            cmd.render("docker exec lnd lncli"),
            format!("docker exec lnd lncli lookupinvoice {}", "ab".repeat(32))
        );
    }

    #[test]
    fn test_memo_is_shell_escaped() {
        assert_eq!(escape_double_quoted("it's \"fine\""), "it's \\\"fine\\\"");
        assert_eq!(escape_double_quoted("$(reboot) `id` \\"), "\\$(reboot) \\`id\\` \\\\");
        assert_eq!(escape_double_quoted("€ ok"), "€ ok");
    }
}
