//! Layout pipeline: authored layout -> transformed controls -> decorated controls
//!
//! This module takes an authored (or generated) layout and the serializer's
//! field metadata and produces the control tree sent to the form renderer.

pub mod control;
pub mod decorate;
pub mod error;
pub mod node;
pub mod resolver;
pub mod transform;

pub use control::{ContainerKind, Control};
pub use decorate::{decorate, DecorationHook, NoopHook};
pub use error::LayoutError;
pub use node::{
    columns, field, fieldset, group, props_from_map, FieldRef, LayoutNode, Prop, Props,
};
pub use resolver::{auto_layout, resolve_layout};
pub use transform::Transformer;

use std::collections::HashSet;

/// Validate that no id is used by more than one control.
pub fn validate_unique_ids(controls: &[Control]) -> Result<(), LayoutError> {
    let mut seen = HashSet::new();
    for control in controls {
        collect_ids(control, &mut seen)?;
    }
    Ok(())
}

fn collect_ids<'a>(control: &'a Control, seen: &mut HashSet<&'a str>) -> Result<(), LayoutError> {
    if let Some(id) = control.id() {
        if !seen.insert(id) {
            return Err(LayoutError::duplicate(id));
        }
    }
    for child in control.children() {
        collect_ids(child, seen)?;
    }
    Ok(())
}
