//! Payload codec for the schema sharing/import path.
//!
//! The caller distinguishes "no schema provided" (no payload at all) from a
//! payload that fails to decode: `decode` is only called when a payload is
//! present, and every failure surfaces as a [`DecodeError`].

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub fn encode(ddl: &str) -> String {
    STANDARD.encode(ddl.as_bytes())
}

pub fn decode(payload: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD.decode(payload)?;
    Ok(String::from_utf8(bytes)?)
}
