// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Request parameters.
//!
//! Parameters are collected as JSON values so callers can use whatever
//! type is natural for each one, and are flattened into strings just
//! before a request is sent.

use itertools::Itertools;
use serde_json::{Map, Value};

/// Query string parameters or form fields, keyed by name.
pub type Params = Map<String, Value>;

/// Turns a JSON object into parameters.
///
/// Anything other than an object yields an empty set of parameters.
///
/// # Examples
///
/// ```
/// use arraw::params::into_params;
/// use serde_json::json;
/// let params = into_params(json!({"limit": 25, "sort": "new"}));
/// assert_eq!(params.len(), 2);
/// ```
pub fn into_params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

/// Flattens query string parameters.
///
/// Booleans become `"true"` or `"false"`. Values that are empty or falsy,
/// such as `null`, `""`, `0`, `[]`, and `{}`, are dropped entirely; lists
/// are joined with commas.
///
/// # Examples
///
/// ```
/// use arraw::params::{into_params, normalize_query};
/// use serde_json::json;
/// let params = into_params(json!({"include_over_18": false, "after": null, "q": "rust"}));
/// let normalized = normalize_query(&params);
/// assert_eq!(
///     normalized,
///     vec![
///         (String::from("include_over_18"), String::from("false")),
///         (String::from("q"), String::from("rust")),
///     ]
/// );
/// ```
pub fn normalize_query(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(_, value)| value.is_boolean() || is_truthy(value))
        .map(|(key, value)| (key.clone(), stringify(value)))
        .collect()
}

/// Flattens form fields.
///
/// Unlike query parameters, empty values in a form are meaningful and
/// only `null` fields are dropped.
pub fn normalize_form(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), stringify(value)))
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).join(","),
        Value::Object(_) => value.to_string(),
    }
}
