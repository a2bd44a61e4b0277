//! Support verification
//!
//! Checks requested optional features against a capability snapshot.
//! Names are compared exactly and case-sensitively, over at most
//! [`MAX_FEATURE_NAME_LEN`] bytes and never past an embedded NUL.

use std::borrow::Cow;
use thiserror::Error;

use crate::render::backends::vulkan::initialization::catalog::CapabilitySet;

/// Longest prefix of a feature name that takes part in a comparison
pub const MAX_FEATURE_NAME_LEN: usize = 128;

/// A requested optional feature the driver does not expose
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Requested feature is not available: {feature}")]
pub struct UnsupportedFeature {
    /// Name of the first missing feature, in request order
    pub feature: String,
}

/// Comparable form of a feature name
pub(crate) fn bounded_name(name: &str) -> Cow<'_, str> {
    let bytes = name.as_bytes();
    let end = bytes
        .iter()
        .take(MAX_FEATURE_NAME_LEN)
        .position(|&b| b == 0)
        .unwrap_or_else(|| bytes.len().min(MAX_FEATURE_NAME_LEN));
    String::from_utf8_lossy(&bytes[..end])
}

/// Check every requested feature against `available`
///
/// Stops at the first feature that is missing and reports it.
pub fn verify<S: AsRef<str>>(requested: &[S], available: &CapabilitySet) -> Result<(), UnsupportedFeature> {
    match requested
        .iter()
        .map(AsRef::as_ref)
        .find(|feature| !available.contains(feature))
    {
        Some(missing) => {
            log::error!("Missing support for requested feature: {}", missing);
            Err(UnsupportedFeature {
                feature: missing.to_string(),
            })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> CapabilitySet {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_empty_request_always_passes() {
        let empty: [&str; 0] = [];
        assert!(verify(&empty, &set(&[])).is_ok());
        assert!(verify(&empty, &set(&["VK_LAYER_KHRONOS_validation"])).is_ok());
    }

    #[test]
    fn test_all_present_passes() {
        let available = set(&["A", "B", "C"]);
        assert!(verify(&["C", "A"], &available).is_ok());
    }

    #[test]
    fn test_reports_first_missing_in_request_order() {
        let available = set(&["A", "C"]);
        let error = verify(&["A", "B", "C", "D"], &available).unwrap_err();
        assert_eq!(error.feature, "B");

        let error = verify(&["D", "B"], &available).unwrap_err();
        assert_eq!(error.feature, "D");
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let available = set(&["VK_LAYER_KHRONOS_validation"]);
        assert!(verify(&["vk_layer_khronos_validation"], &available).is_err());
        assert!(verify(&["VK_LAYER_KHRONOS_validatio"], &available).is_err());
    }

    #[test]
    fn test_names_compare_over_bounded_prefix() {
        let prefix = "L".repeat(MAX_FEATURE_NAME_LEN);
        let available = set(&[&format!("{}driver-tail", prefix)]);
        assert!(verify(&[format!("{}other-tail", prefix)], &available).is_ok());
    }

    #[test]
    fn test_embedded_nul_ends_the_name() {
        assert_eq!(bounded_name("VK_LAYER\0garbage"), "VK_LAYER");
        assert_eq!(bounded_name(""), "");
        let available = set(&["VK_LAYER"]);
        assert!(verify(&["VK_LAYER\0junk"], &available).is_ok());
    }
}
