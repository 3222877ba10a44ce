//! Signal database
//!
//! Holds the message and signal definitions the generator consumes, in the
//! order they were declared in the schema.

use std::collections::HashMap;

/// A CAN message definition
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDefinition {
    /// CAN message ID (without the extended-frame flag)
    pub id: u32,
    /// Message name
    pub name: String,
    /// Message size in bytes
    pub size: usize,
    /// True if the ID is a 29-bit extended identifier
    pub is_extended: bool,
    /// Sender ECU name (optional)
    pub sender: Option<String>,
    /// Free-text comment from the schema
    pub comment: Option<String>,
    /// All signals in this message, in declaration order
    pub signals: Vec<SignalDefinition>,
    /// Source file (DBC filename)
    pub source: String,
}

impl MessageDefinition {
    /// Create a message with no signals and no optional metadata
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            size: 8,
            is_extended: false,
            sender: None,
            comment: None,
            signals: Vec::new(),
            source: String::new(),
        }
    }

    /// Builder method: append a signal
    pub fn with_signal(mut self, signal: SignalDefinition) -> Self {
        self.signals.push(signal);
        self
    }

    /// Byte order used to load the whole 8-byte buffer
    ///
    /// Taken from the first signal. Messages without signals load
    /// little-endian.
    pub fn buffer_byte_order(&self) -> ByteOrder {
        self.signals
            .first()
            .map(|s| s.byte_order)
            .unwrap_or(ByteOrder::LittleEndian)
    }

    /// True if the signals of this message disagree on byte order
    pub fn has_mixed_byte_order(&self) -> bool {
        let order = self.buffer_byte_order();
        self.signals.iter().any(|s| s.byte_order != order)
    }
}

/// A CAN signal definition
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDefinition {
    /// Signal name
    pub name: String,
    /// Start bit in the CAN frame (numbering depends on byte order)
    pub start_bit: u16,
    /// Length in bits
    pub length: u16,
    /// Byte order
    pub byte_order: ByteOrder,
    /// Value type (signed/unsigned)
    pub value_type: ValueType,
    /// Scale factor to convert raw value to physical value
    pub factor: f64,
    /// Offset to add after scaling
    pub offset: f64,
    /// Engineering unit (e.g., "km/h", "°C", "V")
    pub unit: Option<String>,
    /// Free-text comment from the schema
    pub comment: Option<String>,
}

impl SignalDefinition {
    /// Create an unscaled unsigned signal
    pub fn new(name: impl Into<String>, start_bit: u16, length: u16, byte_order: ByteOrder) -> Self {
        Self {
            name: name.into(),
            start_bit,
            length,
            byte_order,
            value_type: ValueType::Unsigned,
            factor: 1.0,
            offset: 0.0,
            unit: None,
            comment: None,
        }
    }

    /// Builder method: mark the signal as signed
    pub fn signed(mut self) -> Self {
        self.value_type = ValueType::Signed;
        self
    }

    /// Builder method: set scale factor and offset
    pub fn with_scaling(mut self, factor: f64, offset: f64) -> Self {
        self.factor = factor;
        self.offset = offset;
        self
    }

    /// Builder method: set the engineering unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Builder method: set the comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn is_signed(&self) -> bool {
        self.value_type == ValueType::Signed
    }
}

/// Byte order for signal extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian (Intel format)
    LittleEndian,
    /// Big-endian (Motorola format)
    BigEndian,
}

/// Value type for signal interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Signed integer
    Signed,
    /// Unsigned integer
    Unsigned,
}

/// The signal database
///
/// Messages are kept in declaration order; generated output follows it.
#[derive(Debug, Clone, Default)]
pub struct SignalDatabase {
    messages: Vec<MessageDefinition>,
}

impl SignalDatabase {
    /// Create a new empty signal database
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Add a message definition to the database
    pub fn add_message(&mut self, message: MessageDefinition) {
        log::trace!("Adding message {} (ID 0x{:X})", message.name, message.id);
        self.messages.push(message);
    }

    /// All messages, in declaration order
    pub fn messages(&self) -> &[MessageDefinition] {
        &self.messages
    }

    /// Bitwise OR of every message ID
    ///
    /// Downstream dispatch code masks incoming identifiers with this value
    /// before looking them up. An empty database yields 0.
    pub fn frame_id_mask(&self) -> u32 {
        self.messages.iter().fold(0, |mask, m| mask | m.id)
    }

    /// CAN IDs declared by more than one message, with the names involved
    ///
    /// Collisions are reported, never resolved.
    pub fn duplicate_ids(&self) -> Vec<(u32, Vec<&str>)> {
        let mut by_id: HashMap<u32, Vec<&str>> = HashMap::new();
        for message in &self.messages {
            by_id.entry(message.id).or_default().push(&message.name);
        }

        let mut duplicates: Vec<(u32, Vec<&str>)> = by_id
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .collect();
        duplicates.sort_unstable_by_key(|(id, _)| *id);
        duplicates
    }

    /// Get database statistics
    pub fn stats(&self) -> DatabaseStats {
        DatabaseStats {
            num_messages: self.messages.len(),
            num_signals: self.messages.iter().map(|m| m.signals.len()).sum(),
        }
    }
}

/// Database statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Total number of message definitions
    pub num_messages: usize,
    /// Total number of signal definitions
    pub num_signals: usize,
}
