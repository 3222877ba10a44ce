//! C++ header emitter
//!
//! Renders a [`CompiledDatabase`] into a single header: include guard,
//! frame ID mask, the two buffer loader macros, the message ID enumeration,
//! and one struct per message whose constructor decodes an 8-byte buffer.

use crate::config::GeneratorConfig;
use crate::expr::DATA_VAR;
use crate::layout::{CompiledDatabase, CompiledMessage, CompiledSignal};
use crate::signals::database::ByteOrder;
use crate::types::Result;
use std::io::Write;

/// Little-endian loader: byte i lands in bits 8*i..8*i+8
pub const LOAD_LE_MACRO: &str = "BUF_TO_INT";
/// Big-endian loader: byte i lands in bits 8*(7-i)..8*(7-i)+8
pub const LOAD_BE_MACRO: &str = "BUF_TO_INT_REV";

/// Writes compiled messages as a C++ header
pub struct HeaderEmitter<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> HeaderEmitter<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Emit the whole header to `out`
    pub fn emit<W: Write>(&self, db: &CompiledDatabase, out: &mut W) -> Result<()> {
        let guard = &self.config.include_guard;

        writeln!(out, "#ifndef {}", guard)?;
        writeln!(out, "#define {}", guard)?;
        writeln!(out)?;

        if self.config.include_cstdint {
            writeln!(out, "#include <cstdint>")?;
            writeln!(out)?;
        }

        writeln!(out, "#define {} 0x{:X}", self.config.frame_id_mask_name, db.frame_id_mask)?;
        writeln!(out)?;

        self.emit_loaders(out)?;
        self.emit_enum(db, out)?;

        for message in &db.messages {
            self.emit_struct(message, out)?;
        }

        writeln!(out, "#endif // {}", guard)?;
        Ok(())
    }

    fn emit_loaders<W: Write>(&self, out: &mut W) -> Result<()> {
        let le: Vec<String> = (0..8).map(|i| load_term(i, i)).collect();
        let be: Vec<String> = (0..8).map(|i| load_term(7 - i, i)).collect();

        writeln!(out, "#define {}(x) ({})", LOAD_LE_MACRO, le.join(" | "))?;
        writeln!(out, "#define {}(x) ({})", LOAD_BE_MACRO, be.join(" | "))?;
        writeln!(out)?;
        Ok(())
    }

    fn emit_enum<W: Write>(&self, db: &CompiledDatabase, out: &mut W) -> Result<()> {
        writeln!(out, "enum class {} : uint64_t", self.config.enum_name)?;
        writeln!(out, "{{")?;
        for message in &db.messages {
            writeln!(out, "\t{} = 0x{:X},", message.enum_name, message.id)?;
        }
        writeln!(out, "}};")?;
        writeln!(out)?;
        Ok(())
    }

    fn emit_struct<W: Write>(&self, message: &CompiledMessage, out: &mut W) -> Result<()> {
        if self.config.annotate_fields {
            if let Some(comment) = &message.comment {
                writeln!(out, "// {}", flatten(comment))?;
            }
        }
        writeln!(out, "struct {}", message.name)?;
        writeln!(out, "{{")?;

        for field in &message.fields {
            write!(out, "\t{} {};", field.ty, field.name)?;
            if self.config.annotate_fields {
                if let Some(annotation) = field_annotation(field) {
                    write!(out, " // {}", annotation)?;
                }
            }
            writeln!(out)?;
        }

        let loader = match message.load_order {
            ByteOrder::LittleEndian => LOAD_LE_MACRO,
            ByteOrder::BigEndian => LOAD_BE_MACRO,
        };

        writeln!(out)?;
        writeln!(out, "\t{}(uint8_t buf[8])", message.name)?;
        writeln!(out, "\t{{")?;
        writeln!(out, "\t\tuint64_t {} = {}(buf);", DATA_VAR, loader)?;
        writeln!(out)?;
        for field in &message.fields {
            writeln!(out, "\t\t{} = {};", field.name, field.expr)?;
        }
        writeln!(out, "\t}};")?;
        writeln!(out, "}};")?;
        writeln!(out)?;
        Ok(())
    }
}

/// `((uint64_t)x[byte] << shift)` for the byte landing at position `slot`
fn load_term(byte: usize, slot: usize) -> String {
    if slot == 0 {
        format!("((uint64_t)x[{}])", byte)
    } else {
        format!("((uint64_t)x[{}] << {})", byte, slot * 8)
    }
}

/// Unit and comment of a field, as a single comment line
fn field_annotation(field: &CompiledSignal) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(unit) = &field.unit {
        parts.push(format!("Unit: \"{}\"", flatten(unit)));
    }
    if let Some(comment) = &field.comment {
        parts.push(format!("Comment: \"{}\"", flatten(comment)));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Free text squeezed onto one `//` line, with quotes escaped
fn flatten(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compile_database;
    use crate::signals::database::{MessageDefinition, SignalDatabase, SignalDefinition};

    fn render(db: &SignalDatabase, config: &GeneratorConfig) -> String {
        let compiled = compile_database(db).unwrap();
        let mut out = Vec::new();
        HeaderEmitter::new(config).emit(&compiled, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample_db() -> SignalDatabase {
        let mut db = SignalDatabase::new();
        let mut engine = MessageDefinition::new(0x123, "EngineData");
        engine.comment = Some("Engine\n  state".to_string());
        db.add_message(
            engine
                .with_signal(
                    SignalDefinition::new("EngineSpeed", 0, 16, ByteOrder::LittleEndian)
                        .with_unit("rpm")
                        .with_comment("  Crankshaft\n speed "),
                )
                .with_signal(
                    SignalDefinition::new("EngineTemp", 16, 8, ByteOrder::LittleEndian)
                        .with_scaling(1.0, -40.0),
                ),
        );
        db.add_message(
            MessageDefinition::new(0x200, "Battery").with_signal(
                SignalDefinition::new("Voltage", 7, 16, ByteOrder::BigEndian).with_scaling(0.01, 0.0),
            ),
        );
        db
    }

    #[test]
    fn test_header_framing() {
        let text = render(&sample_db(), &GeneratorConfig::new());
        assert!(text.starts_with("#ifndef DBC_GENERATED_CODE\n#define DBC_GENERATED_CODE\n"));
        assert!(text.ends_with("#endif // DBC_GENERATED_CODE\n"));
        assert!(text.contains("#include <cstdint>\n"));
        assert!(text.contains("#define DBC_FRAMEID_MASK 0x323\n"));
    }

    #[test]
    fn test_loader_macros() {
        let text = render(&SignalDatabase::new(), &GeneratorConfig::new());
        assert!(text.contains(
            "#define BUF_TO_INT(x) (((uint64_t)x[0]) | ((uint64_t)x[1] << 8) | ((uint64_t)x[2] << 16) | ((uint64_t)x[3] << 24) | ((uint64_t)x[4] << 32) | ((uint64_t)x[5] << 40) | ((uint64_t)x[6] << 48) | ((uint64_t)x[7] << 56))\n"
        ));
        assert!(text.contains(
            "#define BUF_TO_INT_REV(x) (((uint64_t)x[7]) | ((uint64_t)x[6] << 8) | ((uint64_t)x[5] << 16) | ((uint64_t)x[4] << 24) | ((uint64_t)x[3] << 32) | ((uint64_t)x[2] << 40) | ((uint64_t)x[1] << 48) | ((uint64_t)x[0] << 56))\n"
        ));
        assert!(text.contains("#define DBC_FRAMEID_MASK 0x0\n"));
    }

    #[test]
    fn test_enum_in_schema_order() {
        let text = render(&sample_db(), &GeneratorConfig::new());
        assert!(text.contains("enum class Message : uint64_t\n{\n\tENGINEDATA = 0x123,\n\tBATTERY = 0x200,\n};\n"));
    }

    #[test]
    fn test_struct_body() {
        let text = render(&sample_db(), &GeneratorConfig::new());
        let expected = "// Engine state\n\
            struct EngineData\n{\n\
            \tuint16_t EngineSpeed; // Unit: \"rpm\", Comment: \"Crankshaft speed\"\n\
            \tuint8_t EngineTemp;\n\
            \n\
            \tEngineData(uint8_t buf[8])\n\
            \t{\n\
            \t\tuint64_t data = BUF_TO_INT(buf);\n\
            \n\
            \t\tEngineSpeed = ((data >> 0) & 0xFFFFULL);\n\
            \t\tEngineTemp = ((data >> 16) & 0xFFULL) + (-40.0);\n\
            \t};\n\
            };\n";
        assert!(text.contains(expected), "{}", text);

        assert!(text.contains("\t\tuint64_t data = BUF_TO_INT_REV(buf);\n"));
        assert!(text.contains("\t\tVoltage = ((data >> 48) & 0xFFFFULL) * (0.01);\n"));
    }

    #[test]
    fn test_custom_names_and_no_annotations() {
        let config = GeneratorConfig::new()
            .with_include_guard("VEHICLE_H")
            .with_frame_id_mask_name("VEHICLE_MASK")
            .with_enum_name("VehicleMessage")
            .with_cstdint(false)
            .with_field_annotations(false);
        let text = render(&sample_db(), &config);

        assert!(text.starts_with("#ifndef VEHICLE_H\n"));
        assert!(text.contains("#define VEHICLE_MASK 0x323\n"));
        assert!(text.contains("enum class VehicleMessage : uint64_t\n"));
        assert!(!text.contains("#include"));
        assert!(text.contains("\tuint16_t EngineSpeed;\n"));
        assert!(!text.contains("// Engine state"));
    }

    #[test]
    fn test_annotations_stay_on_one_line() {
        let mut db = SignalDatabase::new();
        db.add_message(
            MessageDefinition::new(0x1, "Odd").with_signal(
                SignalDefinition::new("Level", 0, 8, ByteOrder::LittleEndian)
                    .with_unit("m\n\"s\"")
                    .with_comment("say \"hi\"\r\nthere"),
            ),
        );
        let text = render(&db, &GeneratorConfig::new());
        assert!(
            text.contains("\tuint8_t Level; // Unit: \"m \\\"s\\\"\", Comment: \"say \\\"hi\\\" there\"\n"),
            "{}",
            text
        );
    }
}
