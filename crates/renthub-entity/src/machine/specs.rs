//! Structured machine specs.
//!
//! The specs payload is stored as JSONB but deserialized into a closed
//! record: absent fields default, unknown fields are rejected at the API
//! boundary instead of being carried along as an untyped bag.

use serde::{Deserialize, Serialize};

/// Presentation metadata attached to a machine template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineSpecs {
    /// Primary image URLs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Additional gallery image URLs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<String>,
    /// Short selling points shown on the detail page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    /// Free-text location of the equipment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl MachineSpecs {
    /// Whether no spec field carries a value.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
            && self.gallery.is_empty()
            && self.highlights.is_empty()
            && self.location.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_default() {
        let specs: MachineSpecs = serde_json::from_str(r#"{"location": "Yard 4"}"#).unwrap();
        assert!(specs.images.is_empty());
        assert!(specs.highlights.is_empty());
        assert_eq!(specs.location.as_deref(), Some("Yard 4"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<MachineSpecs, _> =
            serde_json::from_str(r#"{"dimensions": "2x3m", "images": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty() {
        assert!(MachineSpecs::default().is_empty());
    }
}
