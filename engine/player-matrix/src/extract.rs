use crate::types::RawPlayer;
use indexmap::IndexMap;
use serde_json::Value;

/// Whether a raw value counts as provided.
///
/// Sources fill unknown attributes with `null`, `""`, `false` or `0`; all of
/// them are treated as missing so a later source can still supply the field.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Pull the declared fields out of a raw player, in declaration order.
///
/// Missing and empty fields are left out; this never fails.
pub fn extract_fields(raw: &RawPlayer, fields: &[String]) -> IndexMap<String, Value> {
    fields
        .iter()
        .filter_map(|field| {
            raw.get(field).filter(|value| is_present(value)).map(|value| (field.clone(), value.clone()))
        })
        .collect()
}
