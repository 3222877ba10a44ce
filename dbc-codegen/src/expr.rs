//! Decode expression tree
//!
//! A compiled signal is a small tree: a bit extraction from the loaded
//! 64-bit scalar, optionally wrapped in a multiplication by the scale
//! factor, optionally wrapped in an addition of the offset. The tree renders
//! to C source through `Display` and can be evaluated directly, so the
//! arithmetic is testable without going through generated text.

use crate::types::SignalValue;
use std::fmt;

/// Name of the 64-bit scalar the extraction reads from
pub const DATA_VAR: &str = "data";

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `(data >> shift) & mask(length)`
    Extract { shift: u8, length: u16 },
    /// `inner * factor`
    Scale(Box<Expr>, f64),
    /// `inner + offset`
    Offset(Box<Expr>, f64),
}

impl Expr {
    /// Build the expression for a field, dropping identity scale/offset terms
    pub fn build(shift: u8, length: u16, factor: f64, offset: f64) -> Self {
        let mut expr = Expr::Extract { shift, length };
        if factor != 1.0 {
            expr = Expr::Scale(Box::new(expr), factor);
        }
        if offset != 0.0 {
            expr = Expr::Offset(Box::new(expr), offset);
        }
        expr
    }

    /// Evaluate against a loaded 64-bit scalar
    ///
    /// Extraction yields the unsigned bit pattern; no sign extension is
    /// applied. The result stays an exact integer until a scale or offset
    /// node is reached.
    pub fn evaluate(&self, data: u64) -> SignalValue {
        match self {
            Expr::Extract { shift, length } => {
                SignalValue::Integer((data >> *shift) & bit_mask(*length))
            }
            Expr::Scale(inner, factor) => SignalValue::Float(inner.evaluate(data).as_f64() * factor),
            Expr::Offset(inner, offset) => SignalValue::Float(inner.evaluate(data).as_f64() + offset),
        }
    }
}

/// C floating-point literal for a scale or offset
///
/// Always carries a decimal point or an exponent (`2.0`, `-40.0`, `1e20`),
/// so the generated arithmetic is done in `double` like [`Expr::evaluate`].
fn float_literal(value: f64) -> String {
    format!("{:?}", value)
}

/// Mask with the low `length` bits set
pub fn bit_mask(length: u16) -> u64 {
    if length >= 64 {
        u64::MAX
    } else {
        (1u64 << length) - 1
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Mask is rendered as a 64-bit literal so widths >= 32 stay defined in C
            Expr::Extract { shift, length } => {
                write!(f, "(({} >> {}) & 0x{:X}ULL)", DATA_VAR, shift, bit_mask(*length))
            }
            Expr::Scale(inner, factor) => write!(f, "{} * ({})", inner, float_literal(*factor)),
            Expr::Offset(inner, offset) => write!(f, "{} + ({})", inner, float_literal(*offset)),
        }
    }
}
