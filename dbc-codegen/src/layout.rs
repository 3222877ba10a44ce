//! Layout compiler
//!
//! Turns message and signal definitions into compiled layouts: the storage
//! type of every field, the start bit of every field inside the 64-bit
//! scalar loaded from the 8-byte buffer, and the decode expression.
//!
//! # Bit numbering
//!
//! - Little-endian (Intel) signals count bits from the LSB of byte 0, so the
//!   DBC start bit is already an offset into a little-endian-loaded scalar.
//! - Big-endian (Motorola) signals give the position of their MSB, with bit 0
//!   being the MSB of byte 0. Reflecting the bit inside its byte and
//!   measuring from the top of a big-endian-loaded scalar gives the shift.
//!
//! The buffer is loaded once per message, using the byte order of the first
//! signal. Signals that disagree with it are compiled against the same load.

use crate::expr::Expr;
use crate::signals::database::{ByteOrder, MessageDefinition, SignalDatabase, SignalDefinition};
use crate::type_selector::{select_type, CType};
use crate::types::{CodegenError, Result, SignalValue};
use byteorder::{BigEndian, ByteOrder as _, LittleEndian};
use std::collections::HashMap;

/// Width of the scalar every message is loaded into
pub const LOAD_WIDTH_BITS: u16 = 64;

/// A signal ready to be emitted
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSignal {
    pub name: String,
    pub ty: CType,
    /// Bit offset of the field's LSB inside the loaded scalar
    pub effective_start: u8,
    pub expr: Expr,
    pub unit: Option<String>,
    pub comment: Option<String>,
}

/// A message ready to be emitted
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledMessage {
    pub id: u32,
    pub name: String,
    /// Enumeration entry name (upper-cased message name)
    pub enum_name: String,
    /// Byte order used to load the buffer
    pub load_order: ByteOrder,
    pub comment: Option<String>,
    pub fields: Vec<CompiledSignal>,
}

/// The whole database, compiled
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDatabase {
    pub frame_id_mask: u32,
    pub messages: Vec<CompiledMessage>,
}

/// Load an 8-byte buffer into a 64-bit scalar
///
/// Little-endian puts byte 0 in bits 0..8, big-endian puts it in bits 56..64.
pub fn load_buffer(buf: &[u8; 8], order: ByteOrder) -> u64 {
    match order {
        ByteOrder::LittleEndian => LittleEndian::read_u64(buf),
        ByteOrder::BigEndian => BigEndian::read_u64(buf),
    }
}

/// Compute the shift that brings a signal's LSB to bit 0 of the loaded scalar
pub fn effective_start(signal: &SignalDefinition) -> Result<u8> {
    let start = signal.start_bit as i32;
    let length = signal.length as i32;
    let window = LOAD_WIDTH_BITS as i32;

    let effective = match signal.byte_order {
        ByteOrder::LittleEndian => start,
        ByteOrder::BigEndian => {
            if start >= window {
                return Err(layout_error(signal, start + length));
            }
            let byte_index = start / 8;
            let bit_in_byte = start % 8;
            let reflected = 8 * (byte_index + 1) - 1 - bit_in_byte;
            window - (reflected + length)
        }
    };

    if effective < 0 || effective + length > window {
        return Err(layout_error(signal, effective + length));
    }

    Ok(effective as u8)
}

fn layout_error(signal: &SignalDefinition, end_bit: i32) -> CodegenError {
    CodegenError::Layout(format!(
        "signal '{}' (start {}, length {}, {:?}) ends at bit {} outside the {}-bit load window",
        signal.name, signal.start_bit, signal.length, signal.byte_order, end_bit, LOAD_WIDTH_BITS
    ))
}

/// Compile one signal: storage type, then bit layout, then scale/offset
pub fn compile_signal(signal: &SignalDefinition) -> Result<CompiledSignal> {
    let ty = select_type(signal.length, signal.is_signed()).map_err(|e| match e {
        CodegenError::Schema(msg) => CodegenError::Schema(format!("signal '{}': {}", signal.name, msg)),
        other => other,
    })?;
    let effective_start = effective_start(signal)?;
    log::trace!(
        "Signal '{}': {} ({} bytes), shift {}",
        signal.name,
        ty,
        ty.size_bytes(),
        effective_start
    );

    Ok(CompiledSignal {
        name: signal.name.clone(),
        ty,
        effective_start,
        expr: Expr::build(effective_start, signal.length, signal.factor, signal.offset),
        unit: signal.unit.clone(),
        comment: signal.comment.clone(),
    })
}

/// Compile every signal of a message, in declaration order
pub fn compile_message(message: &MessageDefinition) -> Result<CompiledMessage> {
    log::debug!(
        "Compiling message {} (ID 0x{:X}, {} signals)",
        message.name,
        message.id,
        message.signals.len()
    );

    if message.has_mixed_byte_order() {
        log::warn!(
            "Message '{}' mixes byte orders; the buffer is loaded {:?} for all signals",
            message.name,
            message.buffer_byte_order()
        );
    }

    let fields = message
        .signals
        .iter()
        .map(compile_signal)
        .collect::<Result<Vec<_>>>()?;

    Ok(CompiledMessage {
        id: message.id,
        name: message.name.clone(),
        enum_name: message.name.to_uppercase(),
        load_order: message.buffer_byte_order(),
        comment: message.comment.clone(),
        fields,
    })
}

/// Compile the whole database, stopping at the first error
///
/// Two messages whose names collide once upper-cased would produce the same
/// enumeration entry and are rejected. Colliding IDs are only logged.
pub fn compile_database(db: &SignalDatabase) -> Result<CompiledDatabase> {
    for (id, names) in db.duplicate_ids() {
        log::warn!(
            "CAN ID 0x{:X} is declared by several messages: {}",
            id,
            names.join(", ")
        );
    }

    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut messages = Vec::with_capacity(db.messages().len());

    for message in db.messages() {
        let compiled = compile_message(message)?;
        if let Some(previous) = seen.insert(compiled.enum_name.clone(), &message.name) {
            return Err(CodegenError::Schema(format!(
                "message names '{}' and '{}' collide as '{}'",
                previous, message.name, compiled.enum_name
            )));
        }
        messages.push(compiled);
    }

    Ok(CompiledDatabase {
        frame_id_mask: db.frame_id_mask(),
        messages,
    })
}

impl CompiledMessage {
    /// Decode a buffer the same way the generated constructor does
    pub fn decode(&self, buf: &[u8; 8]) -> Vec<(&str, SignalValue)> {
        let data = load_buffer(buf, self.load_order);
        self.fields
            .iter()
            .map(|field| (field.name.as_str(), field.expr.evaluate(data)))
            .collect()
    }
}
