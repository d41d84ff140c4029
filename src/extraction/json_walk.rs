//! Depth-first search for price-bearing keys in untyped JSON

use serde_json::Value;

/// Keys conventionally holding a price in product JSON
pub const PRICE_KEYS: &[&str] = &[
    "price",
    "lowPrice",
    "highPrice",
    "priceAmount",
    "priceValue",
    "rawPrice",
    "sellingPrice",
];

/// Nesting beyond this is ignored
pub const MAX_DEPTH: usize = 64;

/// Collect every scalar found under a price key
///
/// Objects or arrays stored under a price key are descended into like any
/// other container. Only numbers and non-empty strings are yielded.
pub fn collect_prices(root: &Value) -> Vec<String> {
    let mut found = Vec::new();
    let mut stack: Vec<(&Value, usize)> = vec![(root, 0)];

    while let Some((value, depth)) = stack.pop() {
        if depth > MAX_DEPTH {
            continue;
        }
        match value {
            Value::Object(map) => {
                // reversed so that pops follow document order
                for (key, child) in map.iter().rev() {
                    if PRICE_KEYS.contains(&key.as_str()) {
                        if let Some(text) = scalar_text(child) {
                            found.push(text);
                            continue;
                        }
                    }
                    stack.push((child, depth + 1));
                }
            }
            Value::Array(items) => {
                for child in items.iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
            _ => {}
        }
    }

    found
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}
