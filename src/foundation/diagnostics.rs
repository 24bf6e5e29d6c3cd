use serde::Serialize;

/// Severity of an informational compiler observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticLevel {
    /// Routine observation (defaulted paint, ignored hint).
    Info,
    /// Something a reviewer of the output may want to look at.
    Warning,
}

/// One observation made while compiling a single command stream.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Severity.
    pub level: DiagnosticLevel,
    /// Index of the command that triggered it, if any.
    pub command_index: Option<usize>,
    /// Human-readable message.
    pub message: String,
}

/// Per-compilation diagnostics sink.
///
/// Owned by one compile call and handed back with its result, so concurrent
/// compilations never share it. Entries never influence compilation.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an info-level observation about command `index`.
    pub fn info(&mut self, index: usize, message: impl Into<String>) {
        self.push(DiagnosticLevel::Info, Some(index), message.into());
    }

    /// Record a warning about command `index`.
    pub fn warn(&mut self, index: usize, message: impl Into<String>) {
        self.push(DiagnosticLevel::Warning, Some(index), message.into());
    }

    /// Record an observation not tied to a command.
    pub fn note(&mut self, level: DiagnosticLevel, message: impl Into<String>) {
        self.push(level, None, message.into());
    }

    fn push(&mut self, level: DiagnosticLevel, command_index: Option<usize>, message: String) {
        match level {
            DiagnosticLevel::Info => {
                tracing::debug!(command_index = ?command_index, "{message}");
            }
            DiagnosticLevel::Warning => {
                tracing::warn!(command_index = ?command_index, "{message}");
            }
        }
        self.entries.push(Diagnostic {
            level,
            command_index,
            message,
        });
    }

    /// All entries in the order they were recorded.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over warnings only.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
    }

    /// Consume the sink, returning its entries.
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/diagnostics.rs"]
mod tests;
