//! Layout resolution - picks the configured layout and defaults for a form

use tracing::debug;

use crate::error::FormError;
use crate::form::{DefaultsMap, FormConfig, FormContext};
use crate::schema::{FieldMetadata, ModelSchema};

use super::control::Control;
use super::node::{FieldRef, LayoutNode};
use super::transform::Transformer;
use super::validate_unique_ids;

/// Resolve the layout of form `ctx.form_id` into transformed controls
///
/// This function:
/// 1. Selects the form's layout and defaults (empty id = default form)
/// 2. Calls computed layouts and defaults with the live field metadata
/// 3. Generates a layout from the writable fields when none is configured
///    or the configured one is an empty list
/// 4. Transforms the layout with root-list semantics
/// 5. Checks that no id is used twice
pub fn resolve_layout(
    config: &FormConfig,
    ctx: &FormContext<'_>,
    schema: &dyn ModelSchema,
) -> Result<Vec<Control>, FormError> {
    let spec = config.form_spec(ctx.form_id)?;

    let defaults = spec
        .defaults
        .as_ref()
        .map(|source| source.resolve(ctx.fields))
        .unwrap_or_default();

    let configured = spec
        .layout
        .as_ref()
        .map(|source| source.resolve(ctx.fields))
        .transpose()?
        .filter(|node| !matches!(node, LayoutNode::List(items) if items.is_empty()));

    let layout = match configured {
        Some(layout) => {
            debug!(form = ctx.form_id, "using configured layout");
            layout
        }
        None => {
            debug!(form = ctx.form_id, fields = ctx.fields.len(), "generating layout from fields");
            auto_layout(ctx.fields)
        }
    };

    let controls = transform_layout(&layout, &defaults, ctx, schema)?;
    validate_unique_ids(&controls)?;
    Ok(controls)
}

/// One field reference per writable field, in metadata order
pub fn auto_layout(fields: &FieldMetadata) -> LayoutNode {
    LayoutNode::List(
        fields
            .writable_ids()
            .map(|id| LayoutNode::Field(FieldRef::new(id)))
            .collect(),
    )
}

fn transform_layout(
    layout: &LayoutNode,
    defaults: &DefaultsMap,
    ctx: &FormContext<'_>,
    schema: &dyn ModelSchema,
) -> Result<Vec<Control>, FormError> {
    Ok(Transformer::new(defaults, ctx, schema).transform_root(layout)?)
}
