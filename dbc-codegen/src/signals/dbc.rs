//! DBC file parser
//!
//! Parses Vector DBC files and converts them into our internal signal database format.

use crate::signals::database::{ByteOrder, MessageDefinition, SignalDefinition, ValueType};
use crate::types::{CodegenError, Result};
use std::path::Path;

/// Flag DBC files set on 29-bit identifiers
const EXTENDED_ID_FLAG: u32 = 0x8000_0000;

/// Parse a DBC file and return message definitions in declaration order
pub fn parse_dbc_file(path: &Path) -> Result<Vec<MessageDefinition>> {
    log::info!("Parsing DBC file: {:?}", path);

    let bytes = std::fs::read(path).map_err(|e| {
        CodegenError::DbcParse(format!("Failed to read file {:?}: {}", path, e))
    })?;

    let source_filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown.dbc")
        .to_string();

    let messages = parse_dbc_bytes(&bytes, &source_filename)?;

    log::info!("Parsed {} messages from {:?}", messages.len(), path);

    Ok(messages)
}

/// Parse DBC content already held in memory
///
/// `source` is recorded on every message as the file it came from.
pub fn parse_dbc_bytes(bytes: &[u8], source: &str) -> Result<Vec<MessageDefinition>> {
    // Try UTF-8 first, then fall back to Latin-1 (compatible with Windows-1252)
    let dbc_content = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            log::warn!("DBC file {} is not UTF-8, trying Latin-1 encoding", source);
            bytes.iter().map(|&b| b as char).collect()
        }
    };

    let dbc = can_dbc::DBC::from_slice(dbc_content.as_bytes()).map_err(|e| {
        CodegenError::DbcParse(format!("Failed to parse DBC file {}: {:?}", source, e))
    })?;

    let messages = dbc
        .messages()
        .iter()
        .map(|dbc_msg| convert_message(&dbc, dbc_msg, source))
        .collect();

    Ok(messages)
}

/// Convert a can-dbc message to our MessageDefinition
fn convert_message(dbc: &can_dbc::DBC, dbc_msg: &can_dbc::Message, source: &str) -> MessageDefinition {
    let message_id = dbc_msg.message_id().clone();
    let raw_id = message_id.0;

    let signals = dbc_msg
        .signals()
        .iter()
        .map(|dbc_sig| {
            if !matches!(
                dbc_sig.multiplexer_indicator(),
                can_dbc::MultiplexIndicator::Plain
            ) {
                log::debug!(
                    "Signal '{}' in '{}' is multiplexed; loading it as a plain signal",
                    dbc_sig.name(),
                    dbc_msg.message_name()
                );
            }

            let mut signal = convert_signal(dbc_sig);
            signal.comment = dbc
                .signal_comment(message_id.clone(), dbc_sig.name())
                .map(|c| c.to_string());
            signal
        })
        .collect();

    MessageDefinition {
        id: raw_id & !EXTENDED_ID_FLAG,
        name: dbc_msg.message_name().to_string(),
        size: *dbc_msg.message_size() as usize,
        is_extended: raw_id & EXTENDED_ID_FLAG != 0,
        sender: match dbc_msg.transmitter() {
            can_dbc::Transmitter::NodeName(name) => Some(name.to_string()),
            _ => None,
        },
        comment: dbc.message_comment(message_id).map(|c| c.to_string()),
        signals,
        source: source.to_string(),
    }
}

/// Convert a can-dbc signal to our SignalDefinition
///
/// Widths are carried over untouched; the type selector rejects
/// out-of-range ones.
fn convert_signal(dbc_sig: &can_dbc::Signal) -> SignalDefinition {
    let byte_order = match *dbc_sig.byte_order() {
        can_dbc::ByteOrder::LittleEndian => ByteOrder::LittleEndian,
        can_dbc::ByteOrder::BigEndian => ByteOrder::BigEndian,
    };

    let value_type = match *dbc_sig.value_type() {
        can_dbc::ValueType::Signed => ValueType::Signed,
        can_dbc::ValueType::Unsigned => ValueType::Unsigned,
    };

    SignalDefinition {
        name: dbc_sig.name().to_string(),
        start_bit: *dbc_sig.start_bit() as u16,
        length: *dbc_sig.signal_size() as u16,
        byte_order,
        value_type,
        factor: *dbc_sig.factor(),
        offset: *dbc_sig.offset(),
        unit: if dbc_sig.unit().is_empty() {
            None
        } else {
            Some(dbc_sig.unit().to_string())
        },
        comment: None,
    }
}
