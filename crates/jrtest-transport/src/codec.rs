//! Codec trait and JSON implementation

use jrtest_core::ServiceError;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors raised while encoding or decoding a payload
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            CodecError::Deserialization(err.to_string())
        } else {
            CodecError::Serialization(err.to_string())
        }
    }
}

impl From<CodecError> for ServiceError {
    fn from(err: CodecError) -> Self {
        ServiceError::Serialization(err.to_string())
    }
}

/// Message encoding and decoding
pub trait Codec: Send + Sync {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError>;

    fn content_type(&self) -> &'static str;
}

/// serde_json codec
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Codec that pretty-prints, for the CLI
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn encode_string<T: Serialize>(&self, value: &T) -> Result<String, CodecError> {
        if self.pretty {
            serde_json::to_string_pretty(value).map_err(Into::into)
        } else {
            serde_json::to_string(value).map_err(Into::into)
        }
    }

    /// Decode a request body, treating an empty or whitespace-only body as `null`.
    ///
    /// GET routes carry no body; their request types accept `null`.
    pub fn decode_body<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_value(serde_json::Value::Null).map_err(Into::into);
        }
        self.decode(data)
    }
}

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        if self.pretty {
            serde_json::to_vec_pretty(value).map_err(Into::into)
        } else {
            serde_json::to_vec(value).map_err(Into::into)
        }
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(data).map_err(Into::into)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}
