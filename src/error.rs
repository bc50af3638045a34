//! Error types for the probe tool
//!
//! Interaction-facing operations never propagate these to the host: they log
//! the error and return an empty result so a single bad record cannot stop a
//! render pass. The `try_*` variants expose them for callers that want them.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// The interaction event did not carry the coordinates the operation needs
    #[error("required event data not supplied to tool {tool}'s {operation}")]
    MissingInputData {
        tool: String,
        operation: &'static str,
    },

    /// A stored measurement cannot be used (non-finite position)
    #[error("invalid parameters supplied to tool {tool}'s {operation}")]
    MalformedMeasurement {
        tool: String,
        operation: &'static str,
    },

    /// The decoded image uses a pixel layout the probe cannot sample
    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// Raw pixel data does not match the declared dimensions
    #[error("pixel buffer holds {got} samples, {columns}x{rows} image needs {need}")]
    BufferSizeMismatch {
        columns: u32,
        rows: u32,
        got: usize,
        need: usize,
    },
}

pub type Result<T> = std::result::Result<T, ProbeError>;
