//! Per-request form resolution context

use crate::schema::FieldMetadata;

use super::request::FormRequest;

/// What computed layout properties can see while a form is resolved
#[derive(Debug, Clone, Copy)]
pub struct FormContext<'a> {
    /// Requested form id, empty for the default form
    pub form_id: &'a str,
    /// Whether an existing record is being edited
    pub has_instance: bool,
    pub request: &'a FormRequest,
    pub fields: &'a FieldMetadata,
}

impl<'a> FormContext<'a> {
    pub fn new(
        form_id: &'a str,
        has_instance: bool,
        request: &'a FormRequest,
        fields: &'a FieldMetadata,
    ) -> Self {
        Self {
            form_id,
            has_instance,
            request,
            fields,
        }
    }
}
