//! Upload-notification decoding and PDF filtering.
//!
//! Object storage emits a JSON notification of the shape
//! `{"data": {"resourceName": "<namespace>/<bucket>/<objectName>"}}`.
//! This crate turns the raw invocation bytes into the triggering object's
//! name and decides whether the upload is a PDF worth processing.

mod name;

use docrelay_shared::{DocRelayError, Result};
use tracing::debug;

pub use name::{is_pdf_object, object_name_from_resource, output_object_name};

/// The decoded upload notification, reduced to what the pipeline consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Full slash-delimited resource name from the notification.
    pub resource_name: String,
    /// Final path segment: the uploaded object's name.
    pub object_name: String,
}

/// Decode raw invocation bytes into an [`InboundEvent`].
///
/// An absent or malformed body is an event error; a body that parses but
/// lacks `data.resourceName` is a missing-field error. Both are fatal for
/// the invocation.
pub fn decode(body: Option<&[u8]>) -> Result<InboundEvent> {
    let bytes = body.ok_or_else(|| DocRelayError::event("no event data received"))?;

    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| DocRelayError::event(format!("payload is not valid JSON: {e}")))?;

    let resource_name = value
        .pointer("/data/resourceName")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| DocRelayError::missing_field("data.resourceName"))?;

    let object_name = object_name_from_resource(resource_name).to_string();
    debug!(resource_name, object_name, "decoded upload notification");

    Ok(InboundEvent {
        resource_name: resource_name.to_string(),
        object_name,
    })
}
