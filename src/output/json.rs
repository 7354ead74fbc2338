//! JSON output formatting

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Envelope for `--format json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonOutput<'a, T: ?Sized> {
    pub data: &'a T,
    pub meta: Metadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub generated_at: String,
    pub version: &'static str,
}

impl<'a, T: ?Sized> JsonOutput<'a, T> {
    pub fn new(data: &'a T) -> Self {
        Self {
            data,
            meta: Metadata {
                generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}

/// Pretty-printed JSON wrapped in the `{data, meta}` envelope.
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(data))
}
