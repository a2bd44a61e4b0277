//! Capability catalog
//!
//! Snapshots the optional features the driver exposes. A fresh snapshot is
//! taken on every call; nothing is cached between runs.

use std::collections::BTreeSet;

use crate::render::backends::vulkan::backend::GraphicsBackend;
use crate::render::backends::vulkan::initialization::verifier::bounded_name;

/// Immutable set of feature names discovered from the driver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    names: BTreeSet<String>,
}

impl CapabilitySet {
    /// Whether `name` is present, compared the way the verifier compares
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(bounded_name(name).as_ref())
    }

    /// Number of distinct features
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the driver exposed nothing
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Feature names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl FromIterator<String> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|name| bounded_name(&name).into_owned())
                .collect(),
        }
    }
}

/// Queries a backend for the layers and extensions it exposes
pub struct CapabilityCatalog<'b, B: GraphicsBackend> {
    backend: &'b B,
}

impl<'b, B: GraphicsBackend> CapabilityCatalog<'b, B> {
    /// Create a catalog over `backend`
    pub fn new(backend: &'b B) -> Self {
        Self { backend }
    }

    /// Instance layers available right now
    pub fn discover_layers(&self) -> CapabilitySet {
        let layers: CapabilitySet = self
            .backend
            .enumerate_layer_properties()
            .into_iter()
            .map(|layer| {
                log::trace!("Layer {} (spec {}): {}", layer.name, layer.spec_version, layer.description);
                layer.name
            })
            .collect();
        log::debug!("Enumerated available layers. Found {}", layers.len());
        layers
    }

    /// Instance extensions available right now
    pub fn discover_extensions(&self) -> CapabilitySet {
        let extensions: CapabilitySet = self
            .backend
            .enumerate_extension_properties()
            .into_iter()
            .map(|extension| extension.name)
            .collect();

        log::info!("Enumerated available extensions. Found {}", extensions.len());
        for name in extensions.iter() {
            log::debug!("\t{}", name);
        }
        extensions
    }
}
