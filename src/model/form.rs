//! Form field types.

use serde::{Deserialize, Serialize};

/// An interactive form field found on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    /// Owning page number (1-indexed)
    pub page: u32,

    /// Fully qualified field name, empty when unnamed
    pub field_name: String,

    /// Field type label (`Text`, `CheckBox`, `RadioButton`, ...)
    pub field_type: String,

    /// Current value, empty when unset
    pub field_value: String,

    /// Bounding box as `[left, top, right, bottom]`, top-left origin
    pub rect: [f32; 4],
}

impl FormField {
    /// Create a new form field.
    pub fn new(
        page: u32,
        field_name: impl Into<String>,
        field_type: impl Into<String>,
        field_value: impl Into<String>,
        rect: [f32; 4],
    ) -> Self {
        Self {
            page,
            field_name: field_name.into(),
            field_type: field_type.into(),
            field_value: field_value.into(),
            rect,
        }
    }
}
