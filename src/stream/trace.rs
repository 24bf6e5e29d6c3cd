use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{LskiaError, LskiaResult};

/// A recorded command stream as exported by the Skia debugger.
///
/// Commands stay as raw JSON records until compilation, which decodes and
/// checks each one in order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Trace {
    /// Exporter format version, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// Command records in recording order.
    pub commands: Vec<serde_json::Value>,
}

impl Trace {
    /// Wrap already-loaded command records.
    pub fn new(commands: Vec<serde_json::Value>) -> Self {
        Self {
            version: None,
            commands,
        }
    }

    /// Parse a trace from JSON text.
    pub fn from_json_str(s: &str) -> LskiaResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| LskiaError::validation(format!("parse trace JSON: {e}")))
    }

    /// Parse a trace from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LskiaResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| LskiaError::validation(format!("parse trace JSON: {e}")))
    }

    /// Parse a trace from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LskiaResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LskiaError::validation(format!("open trace JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Number of command records.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// `true` when the trace holds no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stream/trace.rs"]
mod tests;
