//! Diagnostic channel (debug utils messenger)
//!
//! The messenger entry points are not part of the core API. They are looked
//! up by name through the context each time a channel is attached, and a
//! missing create or destroy entry point is reported as
//! [`DiagnosticError::ExtensionNotPresent`] instead of failing the bring-up.
//!
//! Driver messages are forwarded to a [`MessageObserver`]. The forwarding
//! callback always tells the driver not to abort the triggering call.

use ash::vk;
use std::borrow::Cow;
use std::ffi::{c_void, CStr};
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

use crate::core::DiagnosticsConfig;
use crate::render::backends::vulkan::backend::{BackendError, GraphicsBackend};
use crate::render::backends::vulkan::initialization::context::GraphicsContext;

/// Name of the messenger create entry point
pub const CREATE_MESSENGER_ENTRY_POINT: &CStr = c"vkCreateDebugUtilsMessengerEXT";

/// Name of the messenger destroy entry point
pub const DESTROY_MESSENGER_ENTRY_POINT: &CStr = c"vkDestroyDebugUtilsMessengerEXT";

/// Diagnostic channel errors
#[derive(Error, Debug)]
pub enum DiagnosticError {
    /// The driver does not provide the messenger entry points for this context
    #[error("Diagnostic entry point {entry_point} is not present")]
    ExtensionNotPresent {
        /// Entry point that failed to resolve
        entry_point: &'static str,
    },

    /// The driver rejected the messenger
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// How serious a driver message is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational or verbose output
    Info,
    /// Likely misuse
    Warning,
    /// Invalid usage
    Error,
}

impl Severity {
    /// Most serious severity present in `flags`
    pub fn from_flags(flags: vk::DebugUtilsMessageSeverityFlagsEXT) -> Self {
        if flags.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
            Self::Error
        } else if flags.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
            Self::Warning
        } else {
            Self::Info
        }
    }
}

/// What kind of event produced a driver message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Neither validation nor performance
    General,
    /// Violation of valid usage
    Validation,
    /// Potentially non-optimal use
    Performance,
}

impl Category {
    /// Category for the type flags of a message
    pub fn from_flags(flags: vk::DebugUtilsMessageTypeFlagsEXT) -> Self {
        if flags.contains(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION) {
            Self::Validation
        } else if flags.contains(vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE) {
            Self::Performance
        } else {
            Self::General
        }
    }
}

/// One message from the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage<'a> {
    /// Severity tag
    pub severity: Severity,
    /// Category tag
    pub category: Category,
    /// Message text
    pub text: &'a str,
}

/// Receives driver messages
pub trait MessageObserver {
    /// Called once per driver message
    fn on_message(&self, message: &DiagnosticMessage<'_>);
}

impl<F> MessageObserver for F
where
    F: Fn(&DiagnosticMessage<'_>),
{
    fn on_message(&self, message: &DiagnosticMessage<'_>) {
        self(message);
    }
}

/// Observer that writes driver messages to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl MessageObserver for LogObserver {
    fn on_message(&self, message: &DiagnosticMessage<'_>) {
        match message.severity {
            Severity::Error => log::error!("[Vulkan] {:?} - {}", message.category, message.text),
            Severity::Warning => log::warn!("[Vulkan] {:?} - {}", message.category, message.text),
            Severity::Info => log::debug!("[Vulkan] {:?} - {}", message.category, message.text),
        }
    }
}

type ObserverSlot = Box<dyn MessageObserver>;

/// Severities to subscribe to
fn severity_flags(config: &DiagnosticsConfig) -> vk::DebugUtilsMessageSeverityFlagsEXT {
    let mut flags =
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR;
    if config.verbose {
        flags |= vk::DebugUtilsMessageSeverityFlagsEXT::INFO
            | vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE;
    }
    flags
}

/// Messenger entry points resolved for one context
struct MessengerEntryPoints {
    create: Option<vk::PFN_vkCreateDebugUtilsMessengerEXT>,
    destroy: Option<vk::PFN_vkDestroyDebugUtilsMessengerEXT>,
}

impl MessengerEntryPoints {
    fn resolve<B: GraphicsBackend>(context: &GraphicsContext<'_, B>) -> Self {
        let backend = context.backend();
        let create = backend
            .resolve_entry_point(context.context(), CREATE_MESSENGER_ENTRY_POINT)
            .map(|f| unsafe {
                std::mem::transmute::<unsafe extern "system" fn(), vk::PFN_vkCreateDebugUtilsMessengerEXT>(f)
            });
        let destroy = backend
            .resolve_entry_point(context.context(), DESTROY_MESSENGER_ENTRY_POINT)
            .map(|f| unsafe {
                std::mem::transmute::<unsafe extern "system" fn(), vk::PFN_vkDestroyDebugUtilsMessengerEXT>(f)
            });
        Self { create, destroy }
    }
}

/// A live debug messenger attached to a context
///
/// Borrows the context, so it can neither be created before it nor outlive
/// it. Detaches itself when dropped.
pub struct DiagnosticChannel<'c, 'b, B: GraphicsBackend> {
    context: &'c GraphicsContext<'b, B>,
    messenger: Option<vk::DebugUtilsMessengerEXT>,
    destroy: vk::PFN_vkDestroyDebugUtilsMessengerEXT,
    // Boxed twice so the driver holds a thin pointer with a stable address
    _observer: Box<ObserverSlot>,
}

impl<'c, 'b, B: GraphicsBackend> DiagnosticChannel<'c, 'b, B> {
    /// Attach a messenger that forwards driver messages to `observer`
    pub fn attach(
        context: &'c GraphicsContext<'b, B>,
        observer: Box<dyn MessageObserver>,
        config: &DiagnosticsConfig,
    ) -> Result<Self, DiagnosticError> {
        let entry_points = MessengerEntryPoints::resolve(context);
        // A messenger that cannot be destroyed would outlive its context
        let create = entry_points
            .create
            .ok_or(DiagnosticError::ExtensionNotPresent {
                entry_point: "vkCreateDebugUtilsMessengerEXT",
            })?;
        let destroy = entry_points
            .destroy
            .ok_or(DiagnosticError::ExtensionNotPresent {
                entry_point: "vkDestroyDebugUtilsMessengerEXT",
            })?;

        let observer: Box<ObserverSlot> = Box::new(observer);
        let user_data = (&*observer as *const ObserverSlot).cast_mut().cast::<c_void>();

        let create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(severity_flags(config))
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(forward_message))
            .user_data(user_data);

        let mut messenger = vk::DebugUtilsMessengerEXT::null();
        let status = unsafe {
            create(
                context.raw_handle(),
                &*create_info,
                std::ptr::null(),
                &mut messenger,
            )
        };
        if status != vk::Result::SUCCESS {
            return Err(BackendError::Rejected {
                operation: "vkCreateDebugUtilsMessengerEXT",
                status,
            }
            .into());
        }

        log::debug!("Debug messenger attached");
        Ok(Self {
            context,
            messenger: Some(messenger),
            destroy,
            _observer: observer,
        })
    }

    /// Whether the messenger is still live
    pub fn is_attached(&self) -> bool {
        self.messenger.is_some()
    }

    /// Destroy the messenger
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn detach(&mut self) {
        let Some(messenger) = self.messenger.take() else {
            return;
        };
        unsafe { (self.destroy)(self.context.raw_handle(), messenger, std::ptr::null()) };
        log::debug!("Debug messenger detached");
    }
}

impl<B: GraphicsBackend> Drop for DiagnosticChannel<'_, '_, B> {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Debug callback registered with the driver
unsafe extern "system" fn forward_message(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    user_data: *mut c_void,
) -> vk::Bool32 {
    if user_data.is_null() {
        return vk::FALSE;
    }
    let observer = &*(user_data as *const ObserverSlot);

    let text: Cow<'_, str> = if callback_data.is_null() || (*callback_data).p_message.is_null() {
        "<no message>".into()
    } else {
        CStr::from_ptr((*callback_data).p_message).to_string_lossy()
    };
    let message = DiagnosticMessage {
        severity: Severity::from_flags(message_severity),
        category: Category::from_flags(message_type),
        text: &text,
    };

    // Unwinding into the driver is undefined behaviour
    if panic::catch_unwind(AssertUnwindSafe(|| observer.on_message(&message))).is_err() {
        log::error!("Diagnostic observer panicked; message dropped");
    }

    vk::FALSE
}
