//! Generator configuration types
//!
//! Only cosmetic choices live here: names used in the emitted header and
//! whether pass-through annotations are written. Layout semantics are not
//! configurable.

use serde::{Deserialize, Serialize};

/// Configuration for the header emitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Macro used as the include guard
    #[serde(default = "default_include_guard")]
    pub include_guard: String,

    /// Macro holding the OR of all frame IDs
    #[serde(default = "default_frame_id_mask_name")]
    pub frame_id_mask_name: String,

    /// Name of the message identifier enumeration
    #[serde(default = "default_enum_name")]
    pub enum_name: String,

    /// Whether to emit `#include <cstdint>` inside the guard
    #[serde(default = "default_true")]
    pub include_cstdint: bool,

    /// Whether to emit unit/comment annotations after each field
    #[serde(default = "default_true")]
    pub annotate_fields: bool,
}

fn default_include_guard() -> String {
    "DBC_GENERATED_CODE".to_string()
}

fn default_frame_id_mask_name() -> String {
    "DBC_FRAMEID_MASK".to_string()
}

fn default_enum_name() -> String {
    "Message".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            include_guard: default_include_guard(),
            frame_id_mask_name: default_frame_id_mask_name(),
            enum_name: default_enum_name(),
            include_cstdint: true,
            annotate_fields: true,
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the include guard macro
    pub fn with_include_guard(mut self, guard: impl Into<String>) -> Self {
        self.include_guard = guard.into();
        self
    }

    /// Builder method: set the frame ID mask macro
    pub fn with_frame_id_mask_name(mut self, name: impl Into<String>) -> Self {
        self.frame_id_mask_name = name.into();
        self
    }

    /// Builder method: set the enumeration name
    pub fn with_enum_name(mut self, name: impl Into<String>) -> Self {
        self.enum_name = name.into();
        self
    }

    /// Builder method: enable or disable `#include <cstdint>`
    pub fn with_cstdint(mut self, enabled: bool) -> Self {
        self.include_cstdint = enabled;
        self
    }

    /// Builder method: enable or disable unit/comment annotations
    pub fn with_field_annotations(mut self, enabled: bool) -> Self {
        self.annotate_fields = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_config_builder() {
        let config = GeneratorConfig::new()
            .with_include_guard("VEHICLE_H")
            .with_frame_id_mask_name("VEHICLE_MASK")
            .with_enum_name("VehicleMessage")
            .with_cstdint(false)
            .with_field_annotations(false);

        assert_eq!(config.include_guard, "VEHICLE_H");
        assert_eq!(config.frame_id_mask_name, "VEHICLE_MASK");
        assert_eq!(config.enum_name, "VehicleMessage");
        assert!(!config.include_cstdint);
        assert!(!config.annotate_fields);
    }

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::new();
        assert_eq!(config.include_guard, "DBC_GENERATED_CODE");
        assert_eq!(config.frame_id_mask_name, "DBC_FRAMEID_MASK");
        assert_eq!(config.enum_name, "Message");
        assert!(config.include_cstdint);
        assert!(config.annotate_fields);
    }
}
