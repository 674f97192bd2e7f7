//! Output module
//!
//! Turns command results into output documents.
//!
//! # Overview
//!
//! A response is first rendered as a JSON object with RDS member names
//! (`{"DBInstances": [...], "Marker": "..."}`). An [`OutputSelector`] then
//! projects it, and an [`OutputWriter`] writes each selected value as one
//! JSON document.

mod select;
mod writer;

pub use select::OutputSelector;
pub use writer::{OutputFormat, OutputWriter};

use crate::error::Result;
use crate::types::{JsonObject, JsonValue};
use serde::Serialize;

/// Render one page of a listing as a response object
///
/// `Marker` is present only when the service returned a further page.
pub fn page_document<T: Serialize>(
    items_key: &str,
    items: &[T],
    marker: Option<&str>,
) -> Result<JsonValue> {
    let mut doc = JsonObject::new();
    doc.insert(items_key.to_string(), serde_json::to_value(items)?);
    if let Some(marker) = marker.filter(|m| !m.is_empty()) {
        doc.insert("Marker".to_string(), JsonValue::String(marker.to_string()));
    }
    Ok(JsonValue::Object(doc))
}
