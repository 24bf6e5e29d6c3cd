/// Convenience result type used across lskia.
pub type LskiaResult<T> = Result<T, LskiaError>;

/// Top-level error taxonomy used by compiler, parser and engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum LskiaError {
    /// A command name outside the supported vocabulary.
    #[error("unsupported command '{name}' at index {index}")]
    UnsupportedCommand {
        /// Position of the command in the stream.
        index: usize,
        /// Command name as recorded.
        name: String,
    },

    /// An attribute key or value outside the supported set.
    #[error("unsupported attribute '{attribute}' at index {index}: {detail}")]
    UnsupportedAttribute {
        /// Position of the command in the stream.
        index: usize,
        /// Attribute key (dotted for nested paint attributes).
        attribute: String,
        /// What was found.
        detail: String,
    },

    /// Save/SaveLayer and Restore do not pair up.
    #[error("unbalanced scope: {0}")]
    UnbalancedScope(String),

    /// A shape that cannot be represented, not even as a path.
    #[error("malformed geometry at index {index}: {message}")]
    MalformedGeometry {
        /// Position of the command in the stream.
        index: usize,
        /// What went wrong.
        message: String,
    },

    /// Textual IR that does not match the grammar.
    #[error("grammar mismatch at byte {offset}: {message}")]
    GrammarMismatch {
        /// Byte offset of the offending token.
        offset: usize,
        /// What was expected and found.
        message: String,
    },

    /// The external rewrite engine failed for this trace.
    #[error("rewrite engine failure: {0}")]
    RewriteEngine(String),

    /// Invalid or incomplete input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LskiaError {
    /// Build a [`LskiaError::UnsupportedCommand`] value.
    pub fn unsupported_command(index: usize, name: impl Into<String>) -> Self {
        Self::UnsupportedCommand {
            index,
            name: name.into(),
        }
    }

    /// Build a [`LskiaError::UnsupportedAttribute`] value.
    pub fn unsupported_attribute(
        index: usize,
        attribute: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::UnsupportedAttribute {
            index,
            attribute: attribute.into(),
            detail: detail.into(),
        }
    }

    /// Build a [`LskiaError::UnbalancedScope`] value.
    pub fn unbalanced(msg: impl Into<String>) -> Self {
        Self::UnbalancedScope(msg.into())
    }

    /// Build a [`LskiaError::MalformedGeometry`] value.
    pub fn malformed_geometry(index: usize, message: impl Into<String>) -> Self {
        Self::MalformedGeometry {
            index,
            message: message.into(),
        }
    }

    /// Build a [`LskiaError::GrammarMismatch`] value.
    pub fn grammar(offset: usize, message: impl Into<String>) -> Self {
        Self::GrammarMismatch {
            offset,
            message: message.into(),
        }
    }

    /// Build a [`LskiaError::RewriteEngine`] value.
    pub fn rewrite_engine(msg: impl Into<String>) -> Self {
        Self::RewriteEngine(msg.into())
    }

    /// Build a [`LskiaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
