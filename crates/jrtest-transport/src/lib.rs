//! jrtest-transport - Wire envelopes, JSON codec and route table
//!
//! This crate provides:
//! - [`Codec`] trait and the [`JsonCodec`] implementation
//! - [`RequestEnvelope`] / [`WireResponse`] / [`FaultBody`] for message framing
//! - [`Route`] table mapping HTTP method and path to route tags

mod codec;
mod envelope;
mod route;

pub use codec::{Codec, CodecError, JsonCodec};
pub use envelope::{FaultBody, RequestEnvelope, WireResponse};
pub use route::{HttpMethod, ROUTE_PREFIX, ResolvedRoute, Route};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Codec, CodecError, FaultBody, HttpMethod, JsonCodec, RequestEnvelope, ResolvedRoute,
        Route, WireResponse,
    };
}
