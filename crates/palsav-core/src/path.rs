// Null-tolerant traversal of a decoded save tree.
//
// Every step may be missing; absence is an ordinary answer, not an error.
// Only objects are indexed: stepping into a leaf, an array or a missing key
// ends the walk with `None`.
use serde_json::Value;

pub fn get<'a>(node: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let mut cur = node;
    for key in keys {
        cur = cur.as_object()?.get(*key)?;
    }
    Some(cur)
}

/// Typed read at `keys`. A value of the wrong JSON kind reads as absent.
pub fn read<T: FromNode>(node: &Value, keys: &[&str]) -> Option<T> {
    get(node, keys).and_then(T::from_node)
}

/// Array at `keys`, or an empty slice when absent or not an array.
pub fn list<'a>(node: &'a Value, keys: &[&str]) -> &'a [Value] {
    get(node, keys)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub trait FromNode: Sized {
    fn from_node(v: &Value) -> Option<Self>;
}

impl FromNode for String {
    fn from_node(v: &Value) -> Option<Self> {
        v.as_str().map(str::to_string)
    }
}

impl FromNode for i64 {
    fn from_node(v: &Value) -> Option<Self> {
        v.as_i64()
    }
}

impl FromNode for u64 {
    fn from_node(v: &Value) -> Option<Self> {
        v.as_u64()
    }
}

// Non-finite floats arrive as `{"$float": ..}` markers.
impl FromNode for f64 {
    fn from_node(v: &Value) -> Option<Self> {
        if let Some(f) = v.as_f64() {
            return Some(f);
        }
        match crate::json::non_finite_token(v)? {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            _ => Some(f64::NEG_INFINITY),
        }
    }
}

impl FromNode for bool {
    fn from_node(v: &Value) -> Option<Self> {
        v.as_bool()
    }
}

// Untyped copy; JSON null still counts as absent.
impl FromNode for Value {
    fn from_node(v: &Value) -> Option<Self> {
        if v.is_null() { None } else { Some(v.clone()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_path_is_identity() {
        let v = json!({"a": 1});
        assert_eq!(get(&v, &[]), Some(&v));
    }

    #[test]
    fn stops_at_leaves_and_arrays() {
        let v = json!({"a": {"b": 3}, "arr": [{"x": 1}]});
        assert_eq!(get(&v, &["a", "b"]), Some(&json!(3)));
        assert_eq!(get(&v, &["a", "b", "c"]), None);
        assert_eq!(get(&v, &["arr", "0"]), None);
        assert_eq!(get(&v, &["missing", "deeper", "still"]), None);
    }

    #[test]
    fn typed_reads_degrade_to_none() {
        let v = json!({"n": "seven", "m": 7, "z": null});
        assert_eq!(read::<i64>(&v, &["n"]), None);
        assert_eq!(read::<i64>(&v, &["m"]), Some(7));
        assert_eq!(read::<Value>(&v, &["z"]), None);
        assert!(list(&v, &["m"]).is_empty());
    }

    #[test]
    fn float_markers_read_as_non_finite() {
        let v = json!({"nan": {"$float": "NaN"}, "inf": {"$float": "-Infinity"}, "x": {"$float": "?"}});
        assert!(read::<f64>(&v, &["nan"]).unwrap().is_nan());
        assert_eq!(read::<f64>(&v, &["inf"]), Some(f64::NEG_INFINITY));
        assert_eq!(read::<f64>(&v, &["x"]), None);
    }
}
