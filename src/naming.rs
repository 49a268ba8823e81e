//! Key naming normalization for emitted layouts
//!
//! Serializer metadata and authored layouts use underscore separated keys
//! (`read_only`, `help_text`). The form renderer expects lower camel case
//! (`readOnly`, `helpText`), so every mapping key is rewritten on the way out.

use convert_case::{Case, Casing};
use serde_json::{Map, Value};

/// Convert a single underscore separated key to lower camel case.
///
/// Keys without an underscore are returned unchanged, which keeps already
/// camel cased keys (`maxLength`) intact.
///
/// ```rust
/// use form_layouts::naming::camel;
///
/// assert_eq!(camel("help_text"), "helpText");
/// assert_eq!(camel("maxLength"), "maxLength");
/// ```
pub fn camel(key: &str) -> String {
    if !key.contains('_') {
        return key.to_string();
    }
    key.from_case(Case::Snake).to_case(Case::Camel)
}

/// Rewrite every mapping key in `value` to lower camel case, recursively.
///
/// Arrays are walked element by element; scalars pass through untouched.
/// Applying it twice gives the same result as applying it once.
pub fn camelize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(camelize_map(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(camelize).collect()),
        scalar => scalar,
    }
}

/// Map flavour of [`camelize`], preserving key order.
pub fn camelize_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (camel(&key), camelize(value)))
        .collect()
}
