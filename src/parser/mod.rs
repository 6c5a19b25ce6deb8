//! Document ingestion boundary.
//!
//! Pure parsing functions converting raw JSON text into the tagged [`Value`]
//! model. Shape decisions (object vs array vs scalar) are made exactly once
//! here; the rest of the engine works on the tagged variant.

use crate::model::{ParseError, Value};
use std::time::Instant;
use tracing::info;

/// Parse a raw JSON document into a [`Value`].
///
/// The root must be a container; a bare scalar has no members to render and
/// is rejected as [`ParseError::ScalarRoot`].
pub fn parse_document(raw: &str) -> Result<Value, ParseError> {
    let started = Instant::now();
    let parsed: serde_json::Value =
        serde_json::from_str(raw).map_err(|err| ParseError::InvalidJson {
            message: err.to_string(),
        })?;
    let value = Value::from(parsed);
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        bytes = raw.len(),
        "Parsed document"
    );

    if value.is_container() {
        Ok(value)
    } else {
        Err(ParseError::ScalarRoot)
    }
}
