//! Reusable field validators
//!
//! A validator looks at one field of a JSON body and returns an error message
//! when the value is unacceptable. Only `required` rejects `null`; every other
//! validator lets a missing value through so optional fields compose.

use serde_json::Value;

/// Validator: field is required (present and not null)
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| {
        if value.is_null() {
            Err("is required".to_string())
        } else {
            Ok(())
        }
    }
}

/// Validator: field is a string
pub fn string() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| match value {
        Value::Null | Value::String(_) => Ok(()),
        other => Err(format!("must be a string (got {})", other)),
    }
}

/// Validator: string is not empty
pub fn non_empty() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| match value.as_str() {
        Some("") => Err("must not be empty".to_string()),
        _ => Ok(()),
    }
}

/// Validator: field is a number
pub fn number() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| match value {
        Value::Null | Value::Number(_) => Ok(()),
        other => Err(format!("must be a number (got {})", other)),
    }
}

/// Validator: number must be strictly positive
pub fn positive() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| match value.as_f64() {
        Some(num) if num <= 0.0 => Err(format!("must be positive (got {})", num)),
        _ => Ok(()),
    }
}

/// Validator: field is a boolean
pub fn boolean() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| match value {
        Value::Null | Value::Bool(_) => Ok(()),
        other => Err(format!("must be true or false (got {})", other)),
    }
}
