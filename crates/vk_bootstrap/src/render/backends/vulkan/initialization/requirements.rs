//! Requirement resolution
//!
//! Works out which features to ask the driver for. Window system extensions
//! are always requested; the diagnostic layer and extension only when
//! diagnostics are enabled for this build.

/// Validation layer requested when diagnostics are enabled
pub const DIAGNOSTIC_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Extension carrying the debug messenger entry points
pub const DIAGNOSTIC_EXTENSION: &str = "VK_EXT_debug_utils";

/// Features to request from the driver
///
/// `required_extensions` come from the window system and are never
/// verified. The optional lists are verified against the capability
/// catalog before the context is created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureRequest {
    /// Extensions the window system cannot work without
    pub required_extensions: Vec<String>,
    /// Diagnostic layers
    pub optional_layers: Vec<String>,
    /// Diagnostic extensions
    pub optional_extensions: Vec<String>,
}

impl FeatureRequest {
    /// Whether anything beyond the window system's needs was requested
    pub fn has_optional(&self) -> bool {
        !self.optional_layers.is_empty() || !self.optional_extensions.is_empty()
    }

    /// Layers to enable
    pub fn enabled_layers(&self, diagnostics_approved: bool) -> Vec<&str> {
        if diagnostics_approved {
            self.optional_layers.iter().map(String::as_str).collect()
        } else {
            Vec::new()
        }
    }

    /// Extensions to enable: required first, then approved optional ones
    pub fn enabled_extensions(&self, diagnostics_approved: bool) -> Vec<&str> {
        let optional: &[String] = if diagnostics_approved {
            &self.optional_extensions
        } else {
            &[]
        };
        self.required_extensions
            .iter()
            .chain(optional)
            .map(String::as_str)
            .collect()
    }
}

/// Build the feature request for this run
pub fn build_request<S: AsRef<str>>(window_required_extensions: &[S], debug_enabled: bool) -> FeatureRequest {
    let required_extensions: Vec<String> = window_required_extensions
        .iter()
        .map(|name| name.as_ref().to_string())
        .collect();

    let (optional_layers, optional_extensions) = if debug_enabled {
        // Keep the partitions disjoint if the window system already asked for it
        let extension = if required_extensions.iter().any(|name| name == DIAGNOSTIC_EXTENSION) {
            Vec::new()
        } else {
            vec![DIAGNOSTIC_EXTENSION.to_string()]
        };
        (vec![DIAGNOSTIC_LAYER.to_string()], extension)
    } else {
        (Vec::new(), Vec::new())
    };

    FeatureRequest {
        required_extensions,
        optional_layers,
        optional_extensions,
    }
}
