//! Vulkan initialization components
//!
//! Leaf-first: catalog → requirements → verifier → context → diagnostics.

pub mod catalog;
pub mod context;
pub mod diagnostics;
pub mod requirements;
pub mod verifier;

pub use catalog::{CapabilityCatalog, CapabilitySet};
pub use context::{ApplicationIdentity, GraphicsContext, VersionTriple};
pub use diagnostics::{
    Category, DiagnosticChannel, DiagnosticError, DiagnosticMessage, LogObserver, MessageObserver,
    Severity,
};
pub use requirements::{build_request, FeatureRequest, DIAGNOSTIC_EXTENSION, DIAGNOSTIC_LAYER};
pub use verifier::{verify, UnsupportedFeature, MAX_FEATURE_NAME_LEN};
