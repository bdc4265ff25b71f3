//! JSON envelopes for `--json` output.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{QuizError, Result, StructuredError};

#[derive(Serialize)]
pub struct JsonResponse<T> {
    pub status: JsonStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonStatus {
    Ok,
    Error(StructuredError),
}

pub fn json_ok<T: Serialize>(data: T) -> JsonResponse<T> {
    JsonResponse {
        status: JsonStatus::Ok,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
    }
}

/// Error envelope carrying code, suggestion and context.
#[must_use]
pub fn json_error(err: &QuizError) -> JsonResponse<serde_json::Value> {
    JsonResponse {
        status: JsonStatus::Error(err.to_structured()),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data: serde_json::Value::Null,
    }
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}

pub fn emit_ok<T: Serialize>(data: T) -> Result<()> {
    emit_json(&json_ok(data))
}
