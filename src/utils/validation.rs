use crate::utils::error::{InvoiceError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_host(field_name: &str, host: &str) -> Result<()> {
    validate_ssh_word(field_name, host, "Host")
}

/// The user ends up in front of the host as `user@host`, so '@' is rejected too.
pub fn validate_user(field_name: &str, user: &str) -> Result<()> {
    validate_ssh_word(field_name, user, "User")?;
    if user.contains('@') {
        return Err(InvoiceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: user.to_string(),
            reason: "User must not contain '@'".to_string(),
        });
    }
    Ok(())
}

// 會被放進 ssh 的參數，不允許空白或以 '-' 開頭
fn validate_ssh_word(field_name: &str, value: &str, label: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;

    if value.starts_with('-') || value.chars().any(char::is_whitespace) {
        return Err(InvoiceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("{} must not start with '-' or contain whitespace", label),
        });
    }
    Ok(())
}

/// Identity files are handed to `ssh -i`; a directory there is always a mistake.
pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let reason = if path.as_os_str().is_empty() {
        "Path cannot be empty"
    } else if path.is_dir() {
        "Path points to a directory"
    } else {
        return Ok(());
    };
    Err(InvoiceError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: path.display().to_string(),
        reason: reason.to_string(),
    })
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| InvoiceError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(InvoiceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(InvoiceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Payment hashes are 32-byte SHA-256 digests, printed by lncli as 64 hex chars.
pub fn validate_payment_hash(r_hash: &str) -> Result<()> {
    if r_hash.len() != 64 || !r_hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(InvoiceError::ValidationError {
            message: format!("'{}' is not a 64-character hex payment hash", r_hash),
        });
    }
    Ok(())
}
