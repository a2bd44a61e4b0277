//! Recording doubles for the window provider and the graphics backend
//!
//! Both mocks append to a shared [`CallLog`] so tests can assert the exact
//! order of acquisitions and releases across the two.

use ash::vk::{self, Handle};
use std::cell::{Cell, RefCell};
use std::ffi::CStr;
use std::rc::Rc;

use crate::render::backends::vulkan::backend::{
    ContextHandle, CreationParams, ExtensionDescriptor, GraphicsBackend, LayerDescriptor,
};
use crate::core::WindowConfig;
use crate::render::window::backend::{WindowError, WindowProvider, WindowResult};

/// One observed call into a mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    WindowInit,
    CreateWindow {
        width: u32,
        height: u32,
        title: String,
        resizable: bool,
    },
    RequiredExtensions,
    PollEvents,
    DestroyWindow,
    Terminate,
    EnumerateLayers,
    EnumerateExtensions,
    CreateContext {
        application_name: String,
        layers: Vec<String>,
        extensions: Vec<String>,
    },
    DestroyContext,
    ResolveEntryPoint(String),
    CreateMessenger,
    CallbackReturned(vk::Bool32),
    DestroyMessenger,
}

/// Something a successful call holds until it is released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    WindowSystem,
    Window,
    Context,
    Messenger,
}

impl Call {
    /// Resource this call acquires
    pub fn acquires(&self) -> Option<Resource> {
        match self {
            Self::WindowInit => Some(Resource::WindowSystem),
            Self::CreateWindow { .. } => Some(Resource::Window),
            Self::CreateContext { .. } => Some(Resource::Context),
            Self::CreateMessenger => Some(Resource::Messenger),
            _ => None,
        }
    }

    /// Resource this call releases
    pub fn releases(&self) -> Option<Resource> {
        match self {
            Self::Terminate => Some(Resource::WindowSystem),
            Self::DestroyWindow => Some(Resource::Window),
            Self::DestroyContext => Some(Resource::Context),
            Self::DestroyMessenger => Some(Resource::Messenger),
            _ => None,
        }
    }
}

/// Shared, ordered record of mock calls
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl CallLog {
    pub fn push(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

/// Window returned by [`MockWindowProvider`]
#[derive(Debug)]
pub struct MockWindow;

pub struct MockWindowProvider {
    log: CallLog,
    fail_init: bool,
    fail_window: bool,
    required_extensions: Vec<String>,
    close_after: Option<u64>,
    polls: u64,
}

impl MockWindowProvider {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail_init: false,
            fail_window: false,
            required_extensions: Vec::new(),
            close_after: None,
            polls: 0,
        }
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn failing_window(mut self) -> Self {
        self.fail_window = true;
        self
    }

    pub fn with_required_extensions(mut self, names: &[&str]) -> Self {
        self.required_extensions = names.iter().map(|name| name.to_string()).collect();
        self
    }

    /// Report a close request once `polls` event polls have happened
    pub fn closing_after(mut self, polls: u64) -> Self {
        self.close_after = Some(polls);
        self
    }
}

impl WindowProvider for MockWindowProvider {
    type Window = MockWindow;

    fn init(&mut self) -> WindowResult<()> {
        self.log.push(Call::WindowInit);
        if self.fail_init {
            return Err(WindowError::InitializationFailed("mock init failure".to_string()));
        }
        Ok(())
    }

    fn create_window(&mut self, config: &WindowConfig) -> WindowResult<MockWindow> {
        if self.fail_window {
            return Err(WindowError::CreationFailed {
                title: config.title.clone(),
            });
        }
        self.log.push(Call::CreateWindow {
            width: config.width,
            height: config.height,
            title: config.title.clone(),
            resizable: config.resizable,
        });
        Ok(MockWindow)
    }

    fn required_extensions(&self) -> WindowResult<Vec<String>> {
        self.log.push(Call::RequiredExtensions);
        Ok(self.required_extensions.clone())
    }

    fn should_close(&self, _window: &MockWindow) -> bool {
        self.close_after.map_or(false, |limit| self.polls >= limit)
    }

    fn poll_events(&mut self) {
        self.log.push(Call::PollEvents);
        self.polls += 1;
    }

    fn destroy_window(&mut self, _window: MockWindow) {
        self.log.push(Call::DestroyWindow);
    }

    fn terminate(&mut self) {
        self.log.push(Call::Terminate);
    }
}

/// Which messenger entry points the mock driver resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPoints {
    pub create: bool,
    pub destroy: bool,
}

impl EntryPoints {
    pub const ALL: Self = Self {
        create: true,
        destroy: true,
    };
    pub const NONE: Self = Self {
        create: false,
        destroy: false,
    };
    pub const CREATE_ONLY: Self = Self {
        create: true,
        destroy: false,
    };
}

/// Context handed out by [`MockBackend`]
#[derive(Debug)]
pub struct MockContext;

impl ContextHandle for MockContext {
    fn raw_handle(&self) -> vk::Instance {
        vk::Instance::from_raw(0x1)
    }
}

const MOCK_MESSENGER: u64 = 0x2;
const MOCK_MESSAGE: &CStr = c"mock validation message";

// The messenger stubs are plain function pointers, so they reach the test's
// log through the thread that resolved them.
thread_local! {
    static MESSENGER_LOG: RefCell<Option<CallLog>> = const { RefCell::new(None) };
    static MESSENGER_STATUS: Cell<vk::Result> = const { Cell::new(vk::Result::SUCCESS) };
}

fn record_messenger_call(call: Call) {
    MESSENGER_LOG.with(|log| {
        if let Some(log) = log.borrow().as_ref() {
            log.push(call);
        }
    });
}

unsafe extern "system" fn mock_create_messenger(
    _instance: vk::Instance,
    create_info: *const vk::DebugUtilsMessengerCreateInfoEXT,
    _allocator: *const vk::AllocationCallbacks,
    messenger: *mut vk::DebugUtilsMessengerEXT,
) -> vk::Result {
    record_messenger_call(Call::CreateMessenger);
    let status = MESSENGER_STATUS.with(Cell::get);
    if status != vk::Result::SUCCESS {
        return status;
    }
    *messenger = vk::DebugUtilsMessengerEXT::from_raw(MOCK_MESSENGER);

    let create_info = &*create_info;
    if let Some(callback) = create_info.pfn_user_callback {
        let data = vk::DebugUtilsMessengerCallbackDataEXT {
            p_message: MOCK_MESSAGE.as_ptr(),
            ..Default::default()
        };
        let returned = callback(
            vk::DebugUtilsMessageSeverityFlagsEXT::WARNING,
            vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
            &data,
            create_info.p_user_data,
        );
        record_messenger_call(Call::CallbackReturned(returned));
    }
    vk::Result::SUCCESS
}

unsafe extern "system" fn mock_destroy_messenger(
    _instance: vk::Instance,
    messenger: vk::DebugUtilsMessengerEXT,
    _allocator: *const vk::AllocationCallbacks,
) {
    if messenger.as_raw() == MOCK_MESSENGER {
        record_messenger_call(Call::DestroyMessenger);
    }
}

/// Recording stand-in for the Vulkan driver
pub struct MockBackend {
    log: CallLog,
    layers: Vec<String>,
    extensions: Vec<String>,
    context_status: Option<vk::Result>,
    messenger_status: vk::Result,
    entry_points: EntryPoints,
}

impl MockBackend {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            layers: Vec::new(),
            extensions: Vec::new(),
            context_status: None,
            messenger_status: vk::Result::SUCCESS,
            entry_points: EntryPoints::ALL,
        }
    }

    pub fn with_layers(mut self, names: &[&str]) -> Self {
        self.layers = names.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn with_extensions(mut self, names: &[&str]) -> Self {
        self.extensions = names.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn rejecting_context(mut self, status: vk::Result) -> Self {
        self.context_status = Some(status);
        self
    }

    pub fn rejecting_messenger(mut self, status: vk::Result) -> Self {
        self.messenger_status = status;
        self
    }

    pub fn with_entry_points(mut self, entry_points: EntryPoints) -> Self {
        self.entry_points = entry_points;
        self
    }
}

impl GraphicsBackend for MockBackend {
    type Context = MockContext;

    fn enumerate_layer_properties(&self) -> Vec<LayerDescriptor> {
        self.log.push(Call::EnumerateLayers);
        self.layers.iter().map(LayerDescriptor::named).collect()
    }

    fn enumerate_extension_properties(&self) -> Vec<ExtensionDescriptor> {
        self.log.push(Call::EnumerateExtensions);
        self.extensions.iter().map(ExtensionDescriptor::named).collect()
    }

    fn create_context(&self, params: &CreationParams) -> Result<MockContext, vk::Result> {
        if let Some(status) = self.context_status {
            return Err(status);
        }
        self.log.push(Call::CreateContext {
            application_name: params.application_name.to_string_lossy().into_owned(),
            layers: params.layer_names(),
            extensions: params.extension_names(),
        });
        Ok(MockContext)
    }

    fn destroy_context(&self, _context: &MockContext) {
        self.log.push(Call::DestroyContext);
    }

    fn resolve_entry_point(&self, _context: &MockContext, name: &CStr) -> vk::PFN_vkVoidFunction {
        self.log
            .push(Call::ResolveEntryPoint(name.to_string_lossy().into_owned()));
        MESSENGER_LOG.with(|log| *log.borrow_mut() = Some(self.log.clone()));
        MESSENGER_STATUS.with(|status| status.set(self.messenger_status));

        let create: vk::PFN_vkCreateDebugUtilsMessengerEXT = mock_create_messenger;
        let destroy: vk::PFN_vkDestroyDebugUtilsMessengerEXT = mock_destroy_messenger;
        match name.to_bytes() {
            b"vkCreateDebugUtilsMessengerEXT" if self.entry_points.create => Some(unsafe {
                std::mem::transmute::<vk::PFN_vkCreateDebugUtilsMessengerEXT, unsafe extern "system" fn()>(create)
            }),
            b"vkDestroyDebugUtilsMessengerEXT" if self.entry_points.destroy => Some(unsafe {
                std::mem::transmute::<vk::PFN_vkDestroyDebugUtilsMessengerEXT, unsafe extern "system" fn()>(destroy)
            }),
            _ => None,
        }
    }
}
