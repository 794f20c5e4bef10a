//! Brazilian postal code (CEP) input helpers.

use anyhow::Result;

/// Digits in a CEP.
pub const CEP_LENGTH: usize = 8;

pub const INVALID_LENGTH_MESSAGE: &str = "CEP deve conter 8 dígitos";
pub const NOT_FOUND_MESSAGE: &str = "CEP não encontrado ou inválido";
/// Shown when a maintenance form lookup fails.
pub const FORM_NOT_FOUND_MESSAGE: &str = "CEP não encontrado. Verifique o CEP e tente novamente.";

/// Keeps ASCII digits only and truncates to eight.
pub fn sanitize_cep(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(CEP_LENGTH)
        .collect()
}

/// Returns the CEP digits, or an error when the input does not carry exactly
/// eight of them. Extra digits are rejected, not truncated.
///
/// # Errors
/// Fails with [`INVALID_LENGTH_MESSAGE`] on any other digit count.
pub fn validate_cep(raw: &str) -> Result<String> {
    let digits = raw.chars().filter(char::is_ascii_digit).count();
    if digits != CEP_LENGTH {
        anyhow::bail!(INVALID_LENGTH_MESSAGE);
    }
    Ok(sanitize_cep(raw))
}

/// Formats digits as `00000-000`. Shorter input is returned as-is.
pub fn format_cep(raw: &str) -> String {
    let cep = sanitize_cep(raw);
    if cep.len() == CEP_LENGTH {
        format!("{}-{}", &cep[..5], &cep[5..])
    } else {
        cep
    }
}
