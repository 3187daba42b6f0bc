//! Forgiving field deserializers for inference output.
//!
//! Every helper accepts any JSON value and maps what it cannot use to the
//! field's empty default, so a structurally odd response never fails the
//! whole record.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;

pub(crate) fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?))
}

/// Arrays become one string per element; a lone scalar becomes a one-item list.
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .into_iter()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect(),
        other => {
            let single = value_to_string(other);
            if single.is_empty() {
                Vec::new()
            } else {
                vec![single]
            }
        }
    })
}

pub(crate) fn object<'de, D>(deserializer: D) -> Result<JsonObject, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    })
}

/// Arrays of objects; bare scalars in the array are wrapped as `{"name": ...}`.
pub(crate) fn object_list<'de, D>(deserializer: D) -> Result<Vec<JsonObject>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(wrap_object).collect(),
        Value::Object(map) => vec![map],
        _ => Vec::new(),
    })
}

pub(crate) fn wrap_object(value: Value) -> Option<JsonObject> {
    match value {
        Value::Object(map) => Some(map),
        Value::Null => None,
        other => {
            let name = value_to_string(other);
            if name.is_empty() {
                return None;
            }
            let mut map = JsonObject::new();
            map.insert("name".to_string(), Value::String(name));
            Some(map)
        }
    }
}

/// Numbers pass through; strings like `"8.5%"` or `" 12 "` are parsed.
/// Anything else, including `NaN` and infinities, is `0.0`.
pub(crate) fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|n| n.is_finite()).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Lenient {
        #[serde(deserialize_with = "string")]
        name: String,
        #[serde(deserialize_with = "string_list")]
        tags: Vec<String>,
        #[serde(deserialize_with = "object")]
        meta: JsonObject,
        #[serde(deserialize_with = "object_list")]
        rows: Vec<JsonObject>,
        #[serde(deserialize_with = "number")]
        rate: f64,
    }

    fn lenient(value: serde_json::Value) -> Lenient {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_fields_take_defaults() {
        let p = lenient(json!({}));
        assert!(p.name.is_empty());
        assert!(p.tags.is_empty());
        assert!(p.meta.is_empty());
        assert!(p.rows.is_empty());
        assert!(p.rate.abs() < f64::EPSILON);
    }

    #[test]
    fn null_fields_take_defaults() {
        let p = lenient(json!({"name": null, "tags": null, "meta": null, "rows": null, "rate": null}));
        assert!(p.name.is_empty());
        assert!(p.tags.is_empty());
        assert!(p.rows.is_empty());
    }

    #[test]
    fn string_list_stringifies_mixed_elements() {
        let p = lenient(json!({"tags": ["a", 2, true, null, {"k": "v"}]}));
        assert_eq!(p.tags, vec!["a", "2", "true", "{\"k\":\"v\"}"]);
    }

    #[test]
    fn string_list_wraps_single_scalar() {
        let p = lenient(json!({"tags": "only"}));
        assert_eq!(p.tags, vec!["only"]);
    }

    #[test]
    fn number_parses_percent_strings() {
        assert!((lenient(json!({"rate": "8.5%"})).rate - 8.5).abs() < f64::EPSILON);
        assert!((lenient(json!({"rate": 12})).rate - 12.0).abs() < f64::EPSILON);
        assert!(lenient(json!({"rate": "fast"})).rate.abs() < f64::EPSILON);
    }

    #[test]
    fn number_maps_non_finite_strings_to_zero() {
        for raw in ["NaN", "inf", "-infinity", "1e400"] {
            let rate = lenient(json!({"rate": raw})).rate;
            assert!(rate.abs() < f64::EPSILON, "{raw} gave {rate}");
        }
    }

    #[test]
    fn object_list_wraps_scalars_and_single_objects() {
        let p = lenient(json!({"rows": ["Samsung", {"name": "Apple"}, null]}));
        assert_eq!(p.rows.len(), 2);
        assert_eq!(p.rows[0]["name"], "Samsung");
        let single = lenient(json!({"rows": {"name": "Xiaomi"}}));
        assert_eq!(single.rows.len(), 1);
    }

    #[test]
    fn object_rejects_non_objects_quietly() {
        assert!(lenient(json!({"meta": [1, 2]})).meta.is_empty());
        assert_eq!(lenient(json!({"meta": {"a": 1}})).meta["a"], 1);
    }

    #[test]
    fn string_stringifies_numbers() {
        assert_eq!(lenient(json!({"name": 42})).name, "42");
    }
}
