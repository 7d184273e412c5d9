//! Promo / referral code format rules
//!
//! Codes are 6-8 alphanumeric characters, case-insensitive on input.
//! Whether a well-formed code actually exists is decided by the remote
//! registry, never locally.

use crate::error::GatewayError;

pub const CODE_MIN_LEN: usize = 6;
pub const CODE_MAX_LEN: usize = 8;

/// Normalize an operator-entered code to its canonical uppercase form,
/// rejecting malformed input before any remote call.
pub fn normalize(code: &str) -> Result<String, GatewayError> {
    let code = code.trim().to_ascii_uppercase();
    if code.len() < CODE_MIN_LEN || code.len() > CODE_MAX_LEN {
        return Err(GatewayError::InvalidInput(format!(
            "promotional codes are {}-{} characters",
            CODE_MIN_LEN, CODE_MAX_LEN
        )));
    }
    if !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(GatewayError::InvalidInput(
            "promotional codes contain only letters and digits".to_string(),
        ));
    }
    Ok(code)
}
