//! Main generator API
//!
//! The `Generator` struct is the entry point for loading signal definitions
//! and producing the decode header.

use crate::config::GeneratorConfig;
use crate::emitter::HeaderEmitter;
use crate::layout::{compile_database, CompiledDatabase};
use crate::signals::database::MessageDefinition;
use crate::signals::SignalDatabase;
use crate::types::Result;
use std::io::Write;
use std::path::Path;

/// The main generator struct - entry point for all generation operations
pub struct Generator {
    /// Signal database (loaded from DBC files or added directly)
    signal_db: SignalDatabase,
    config: GeneratorConfig,
}

impl Generator {
    /// Create a new generator with the default configuration
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    /// Create a new generator with a custom configuration
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            signal_db: SignalDatabase::new(),
            config,
        }
    }

    /// Load a DBC file and add its definitions to the signal database
    ///
    /// # Example
    /// ```no_run
    /// use dbc_codegen::Generator;
    /// use std::path::Path;
    ///
    /// let mut generator = Generator::new();
    /// generator.add_dbc(Path::new("powertrain.dbc")).unwrap();
    /// ```
    pub fn add_dbc(&mut self, path: &Path) -> Result<()> {
        log::info!("Loading DBC file: {:?}", path);

        let messages = crate::signals::dbc::parse_dbc_file(path)?;
        for message in messages {
            self.signal_db.add_message(message);
        }

        log::info!("DBC file loaded successfully: {:?}", path);
        Ok(())
    }

    /// Add a message definition built elsewhere
    pub fn add_message(&mut self, message: MessageDefinition) {
        self.signal_db.add_message(message);
    }

    /// Compile every message without emitting anything
    pub fn compile(&self) -> Result<CompiledDatabase> {
        compile_database(&self.signal_db)
    }

    /// Generate the header into `out`
    ///
    /// The whole database is compiled before the first byte is written, so a
    /// schema or layout error leaves `out` untouched.
    ///
    /// # Example
    /// ```no_run
    /// use dbc_codegen::Generator;
    /// use std::path::Path;
    ///
    /// let mut generator = Generator::new();
    /// generator.add_dbc(Path::new("powertrain.dbc")).unwrap();
    /// generator.generate(&mut std::io::stdout().lock()).unwrap();
    /// ```
    pub fn generate<W: Write>(&self, out: &mut W) -> Result<()> {
        let compiled = self.compile()?;
        log::info!(
            "Emitting {} messages (frame ID mask 0x{:X})",
            compiled.messages.len(),
            compiled.frame_id_mask
        );
        HeaderEmitter::new(&self.config).emit(&compiled, out)?;
        out.flush()?;
        Ok(())
    }

    /// Generate the header into a file
    ///
    /// The header is rendered in memory, written to a temporary file next to
    /// `path`, then renamed over it. On failure `path` keeps whatever it held
    /// before and the temporary file is removed.
    pub fn generate_to_file(&self, path: &Path) -> Result<()> {
        let mut rendered = Vec::new();
        self.generate(&mut rendered)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        log::info!("Writing {} bytes to {:?}", rendered.len(), path);
        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        staged.write_all(&rendered)?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|e| {
            log::error!("Failed to replace {:?}: {}", path, e.error);
            e.error
        })?;
        Ok(())
    }

    /// Get statistics about the loaded signal database
    pub fn database_stats(&self) -> DatabaseStats {
        self.signal_db.stats()
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

// Re-export DatabaseStats for public API
pub use crate::signals::DatabaseStats;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::database::{ByteOrder, SignalDefinition};
    use crate::types::CodegenError;

    #[test]
    fn test_generator_creation() {
        let generator = Generator::new();
        let stats = generator.database_stats();
        assert_eq!(stats.num_messages, 0);
        assert_eq!(stats.num_signals, 0);
    }

    #[test]
    fn test_invalid_layout_writes_nothing() {
        let mut generator = Generator::new();
        generator.add_message(MessageDefinition::new(0x10, "Good").with_signal(
            SignalDefinition::new("A", 0, 8, ByteOrder::LittleEndian),
        ));
        generator.add_message(MessageDefinition::new(0x20, "Bad").with_signal(
            SignalDefinition::new("B", 60, 8, ByteOrder::LittleEndian),
        ));

        let mut out = Vec::new();
        let err = generator.generate(&mut out).unwrap_err();
        assert!(matches!(err, CodegenError::Layout(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_layout_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.h");

        let mut generator = Generator::new();
        generator.add_message(MessageDefinition::new(0x20, "Bad").with_signal(
            SignalDefinition::new("B", 60, 8, ByteOrder::LittleEndian),
        ));

        assert!(generator.generate_to_file(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_destination() {
        let generator = Generator::new();
        let err = generator
            .generate_to_file(Path::new("/nonexistent-dir/out.h"))
            .unwrap_err();
        assert!(matches!(err, CodegenError::Io(_)));
    }

    #[test]
    fn test_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.h");
        std::fs::write(&path, "stale\n").unwrap();

        Generator::new().generate_to_file(&path).unwrap();

        let header = std::fs::read_to_string(&path).unwrap();
        assert!(header.starts_with("#ifndef DBC_GENERATED_CODE\n"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_write_keeps_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file
        let path = dir.path().join("out.h");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep.txt"), "keep me\n").unwrap();

        let err = Generator::new().generate_to_file(&path).unwrap_err();
        assert!(matches!(err, CodegenError::Io(_)));

        assert_eq!(std::fs::read_to_string(path.join("keep.txt")).unwrap(), "keep me\n");
        // No staging file left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_dbc() {
        let mut generator = Generator::new();
        assert!(generator.add_dbc(Path::new("missing.dbc")).is_err());
    }
}
