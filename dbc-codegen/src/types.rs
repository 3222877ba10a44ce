//! Core types for the DBC code generator
//!
//! This module defines the error type shared by every stage of the generator
//! and the value type produced when a compiled signal layout is evaluated
//! against a loaded buffer.

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur while loading a schema or generating code
///
/// Every error aborts the whole generation run. Nothing is written to the
/// output sink once one of these has been raised.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("Failed to parse DBC file: {0}")]
    DbcParse(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Value of a signal after its compiled expression has been evaluated
///
/// A signal without scale or offset stays an exact integer. Any scaling
/// turns it into a floating-point physical value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalValue {
    /// Raw integer value (no scale/offset applied)
    Integer(u64),
    /// Physical value (after scaling/offset)
    Float(f64),
}

impl SignalValue {
    /// Convert signal value to f64
    pub fn as_f64(&self) -> f64 {
        match self {
            SignalValue::Integer(v) => *v as f64,
            SignalValue::Float(v) => *v,
        }
    }
}
