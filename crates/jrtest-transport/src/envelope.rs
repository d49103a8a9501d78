//! Request and response framing between the host and the service module

use jrtest_core::{FaultSafeInfo, ServiceError};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// One call routed to the service module
///
/// `route` selects the handler; `payload` is the JSON request body with any
/// path and query parameters already merged in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Route tag, e.g. `"audit.metrics"`
    pub route: String,

    #[serde(default)]
    pub payload: serde_json::Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl RequestEnvelope {
    pub fn new(route: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            route: route.into(),
            payload,
            request_id: None,
            correlation_id: None,
        }
    }

    pub fn with_request_id(mut self, id: u64) -> Self {
        self.request_id = Some(id);
        self
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Deserialize the payload without cloning it
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }

    /// Payload bytes as handed to [`ServiceModule::handle_request`](jrtest_core::ServiceModule::handle_request)
    pub fn payload_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.payload)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

/// Body returned with a non-200 transport status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultBody {
    /// Error kind, e.g. `"NotFound"`
    pub error_type: String,

    /// Stable identifier for faults that hosts match on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_identifier: Option<uuid::Uuid>,

    pub code: u32,

    pub message: String,

    pub status_code: u16,

    /// Present only in diagnostic mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_safe: Option<FaultSafeInfo>,
}

impl FaultBody {
    pub fn from_error(err: &ServiceError, diagnostic_mode: bool) -> Self {
        Self {
            error_type: err.kind().to_string(),
            type_identifier: err.type_identifier(),
            code: err.error_code(),
            message: err.to_string(),
            status_code: err.status_code(),
            fault_safe: if diagnostic_mode {
                err.fault_safe().cloned()
            } else {
                None
            },
        }
    }

    /// Rebuild the typed error (diagnostic payload is carried over when present)
    pub fn to_error(&self) -> ServiceError {
        match ServiceError::from_code(self.code, self.message.clone()) {
            ServiceError::NotFound { message, .. } => ServiceError::NotFound {
                message,
                fault: self.fault_safe.clone(),
            },
            other => other,
        }
    }
}

/// What the host writes back to the transport for one request
///
/// Envelope-returning routes answer `200` even when the envelope reports
/// `succeeded=false`; only typed failures change the transport status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireResponse {
    pub transport_status: u16,

    pub body: serde_json::Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
}

impl WireResponse {
    pub fn success(body: serde_json::Value) -> Self {
        Self {
            transport_status: 200,
            body,
            request_id: None,
        }
    }

    /// Success from bytes already JSON-encoded by the module
    pub fn success_raw(data: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(Self::success(serde_json::from_slice(data)?))
    }

    pub fn fault(err: &ServiceError, diagnostic_mode: bool) -> Self {
        let fault = FaultBody::from_error(err, diagnostic_mode);
        let body = serde_json::to_value(&fault).unwrap_or_else(|_| {
            serde_json::json!({
                "error_type": fault.error_type,
                "code": fault.code,
                "message": fault.message,
                "status_code": fault.status_code,
            })
        });
        Self {
            transport_status: err.status_code(),
            body,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: Option<u64>) -> Self {
        self.request_id = id;
        self
    }

    pub fn is_success(&self) -> bool {
        self.transport_status == 200
    }

    /// Fault body, if this is a typed failure
    pub fn fault_body(&self) -> Option<FaultBody> {
        if self.is_success() {
            return None;
        }
        FaultBody::deserialize(&self.body).ok()
    }

    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.body)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}
