//! Form-urlencoded query serialization.

use std::collections::BTreeMap;

use serde_json::Value;

/// Serialize a query mapping as `key=value` pairs joined by `&`.
///
/// Entries with an empty key or a null value are dropped; empty-string
/// values are kept (`b=""` serializes as `b=`). This asymmetry is
/// deliberate and relied upon by callers: null means "omit the parameter",
/// an empty string means "send it empty". Values are percent-encoded;
/// non-string values serialize through their JSON text form.
pub fn form_urlencode(query: &BTreeMap<String, Value>) -> String {
  query
    .iter()
    .filter(|(key, value)| !key.is_empty() && !value.is_null())
    .map(|(key, value)| format!("{key}={}", urlencoding::encode(&value_text(value))))
    .collect::<Vec<_>>()
    .join("&")
}

fn value_text(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}
