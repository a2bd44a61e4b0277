//! Vulkan loader backend
//!
//! Wraps `ash::Entry`. The count-then-fill enumeration calls are handled by
//! ash, so callers only ever see complete lists.

use ash::{vk, Entry};
use std::ffi::{c_char, CStr};

use crate::render::backends::vulkan::backend::{
    BackendError, BackendResult, CreationParams, ExtensionDescriptor, GraphicsBackend,
    LayerDescriptor,
};

/// Graphics backend over the system Vulkan loader
pub struct AshBackend {
    entry: Entry,
}

impl AshBackend {
    /// Open the Vulkan loader
    pub fn load() -> BackendResult<Self> {
        let entry = unsafe { Entry::load() }
            .map_err(|e| BackendError::LoaderUnavailable(format!("{:?}", e)))?;
        Ok(Self { entry })
    }

    /// Get a reference to the Vulkan entry
    pub fn entry(&self) -> &Entry {
        &self.entry
    }
}

impl GraphicsBackend for AshBackend {
    type Context = ash::Instance;

    fn enumerate_layer_properties(&self) -> Vec<LayerDescriptor> {
        match self.entry.enumerate_instance_layer_properties() {
            Ok(layers) => layers.iter().map(LayerDescriptor::from).collect(),
            Err(status) => {
                log::warn!("Layer enumeration failed ({:?}), assuming none", status);
                Vec::new()
            }
        }
    }

    fn enumerate_extension_properties(&self) -> Vec<ExtensionDescriptor> {
        match self.entry.enumerate_instance_extension_properties(None) {
            Ok(extensions) => extensions.iter().map(ExtensionDescriptor::from).collect(),
            Err(status) => {
                log::warn!("Extension enumeration failed ({:?}), assuming none", status);
                Vec::new()
            }
        }
    }

    fn create_context(&self, params: &CreationParams) -> Result<Self::Context, vk::Result> {
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&params.application_name)
            .application_version(params.application_version)
            .engine_name(&params.engine_name)
            .engine_version(params.engine_version)
            .api_version(params.api_version);

        let layer_names: Vec<*const c_char> = params
            .enabled_layers
            .iter()
            .map(|name| name.as_ptr())
            .collect();
        let extension_names: Vec<*const c_char> = params
            .enabled_extensions
            .iter()
            .map(|name| name.as_ptr())
            .collect();

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_layer_names(&layer_names)
            .enabled_extension_names(&extension_names);

        unsafe { self.entry.create_instance(&create_info, None) }
    }

    fn destroy_context(&self, context: &Self::Context) {
        unsafe {
            context.destroy_instance(None);
        }
    }

    fn resolve_entry_point(&self, context: &Self::Context, name: &CStr) -> vk::PFN_vkVoidFunction {
        unsafe { self.entry.get_instance_proc_addr(context.handle(), name.as_ptr()) }
    }
}
