//! DBC Code Generator Library
//!
//! Turns CAN message definitions (from DBC files or built in memory) into a
//! C++ header that decodes 8-byte frames into typed structs.
//!
//! # Architecture
//!
//! The generator is a chain of pure transformations:
//! - The type selector picks the narrowest C type for each signal width
//! - The layout compiler places each signal inside a 64-bit scalar loaded
//!   from the frame and builds its decode expression (mask, shift,
//!   scale, offset)
//! - The emitter renders guard, frame ID mask, loader macros, ID
//!   enumeration and one struct per message to any `std::io::Write`
//!
//! Generation is all-or-nothing: the first schema or layout error aborts the
//! run before any output is written.
//!
//! The library does NOT:
//! - Encode frames from field values
//! - Validate physical ranges (min/max)
//! - Handle multiplexed signals or frames longer than 8 bytes
//! - Sign-extend signed fields (the raw bit pattern is assigned as-is)
//!
//! # Example Usage
//!
//! ```no_run
//! use dbc_codegen::{Generator, GeneratorConfig};
//! use std::path::Path;
//!
//! let config = GeneratorConfig::new().with_include_guard("POWERTRAIN_H");
//! let mut generator = Generator::with_config(config);
//! generator.add_dbc(Path::new("powertrain.dbc")).unwrap();
//!
//! generator.generate_to_file(Path::new("powertrain.h")).unwrap();
//! ```

// Public modules
pub mod config;
pub mod expr;
pub mod generator;
pub mod layout;
pub mod signals;
pub mod type_selector;
pub mod types;

// Re-export main types for convenience
pub use config::GeneratorConfig;
pub use generator::{DatabaseStats, Generator};
pub use layout::{CompiledDatabase, CompiledMessage, CompiledSignal};
pub use signals::{ByteOrder, MessageDefinition, SignalDatabase, SignalDefinition, ValueType};
pub use type_selector::{select_type, CType};
pub use types::{CodegenError, Result, SignalValue};

mod emitter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: ensure we can create a generator
        let generator = Generator::new();
        let stats = generator.database_stats();
        assert_eq!(stats.num_messages, 0);
    }
}
