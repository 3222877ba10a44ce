//! Storage type selection
//!
//! Maps a signal's bit width and signedness to the narrowest fixed-width C
//! type that holds every value of that width.

use crate::types::{CodegenError, Result};
use std::fmt;

/// Fixed-width C storage type for a decoded field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CType {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
}

/// Integer tiers as (inclusive upper bit bound, signed type, unsigned type)
const INTEGER_TIERS: [(u16, CType, CType); 4] = [
    (8, CType::I8, CType::U8),
    (16, CType::I16, CType::U16),
    (32, CType::I32, CType::U32),
    (64, CType::I64, CType::U64),
];

/// Pick the storage type for a `length`-bit field
///
/// A single bit is always `bool`, signed or not. Each integer tier is
/// chosen only when the width fits strictly within its bound, so a 9-bit
/// field gets 16 bits. Widths outside `1..=64` are a schema error.
pub fn select_type(length: u16, signed: bool) -> Result<CType> {
    if length == 0 {
        return Err(CodegenError::Schema(
            "signal bit width must be at least 1".to_string(),
        ));
    }
    if length == 1 {
        return Ok(CType::Bool);
    }

    INTEGER_TIERS
        .iter()
        .find(|(bound, _, _)| length <= *bound)
        .map(|&(_, signed_ty, unsigned_ty)| if signed { signed_ty } else { unsigned_ty })
        .ok_or_else(|| {
            CodegenError::Schema(format!(
                "signal bit width {} exceeds the 64-bit maximum",
                length
            ))
        })
}

impl CType {
    /// Type name as spelled in generated code
    pub fn c_name(&self) -> &'static str {
        match self {
            CType::Bool => "bool",
            CType::I8 => "int8_t",
            CType::U8 => "uint8_t",
            CType::I16 => "int16_t",
            CType::U16 => "uint16_t",
            CType::I32 => "int32_t",
            CType::U32 => "uint32_t",
            CType::I64 => "int64_t",
            CType::U64 => "uint64_t",
        }
    }

    /// Storage size in bytes
    pub fn size_bytes(&self) -> usize {
        match self {
            CType::Bool | CType::I8 | CType::U8 => 1,
            CType::I16 | CType::U16 => 2,
            CType::I32 | CType::U32 => 4,
            CType::I64 | CType::U64 => 8,
        }
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_name())
    }
}
