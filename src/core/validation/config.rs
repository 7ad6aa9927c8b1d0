//! Per-payload validation rules

use crate::core::error::FieldValidationError;
use serde_json::Value;

type Validator = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;
type Filter = Box<dyn Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync>;

/// Filters and validators for the fields of one JSON request body
///
/// Filters run first, in declaration order, then every validator of every
/// field. All failures are collected so the client sees them at once.
///
/// # Example
///
/// ```rust,ignore
/// let rules = PayloadRules::new()
///     .filter("name", filters::trim())
///     .validate("name", validators::required())
///     .validate("amt", validators::positive());
/// let body = rules.validate_and_filter(body)?;
/// ```
#[derive(Default)]
pub struct PayloadRules {
    filters: Vec<(String, Filter)>,
    validators: Vec<(String, Validator)>,
}

impl PayloadRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter for a field
    pub fn filter<F>(mut self, field: &str, filter: F) -> Self
    where
        F: Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.filters.push((field.to_string(), Box::new(filter)));
        self
    }

    /// Add a validator for a field
    pub fn validate<V>(mut self, field: &str, validator: V) -> Self
    where
        V: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push((field.to_string(), Box::new(validator)));
        self
    }

    /// Filter then validate a payload
    ///
    /// Missing fields are seen by validators as `null`. The filtered payload
    /// is returned on success.
    pub fn validate_and_filter(&self, payload: Value) -> Result<Value, Vec<FieldValidationError>> {
        let Value::Object(mut body) = payload else {
            return Err(vec![FieldValidationError {
                field: "body".to_string(),
                message: "must be a JSON object".to_string(),
            }]);
        };

        let mut errors = Vec::new();

        for (field, filter) in &self.filters {
            let Some(value) = body.remove(field) else {
                continue;
            };
            match filter(field, value) {
                Ok(filtered) => {
                    body.insert(field.clone(), filtered);
                }
                Err(e) => errors.push(FieldValidationError {
                    field: field.clone(),
                    message: e.to_string(),
                }),
            }
        }

        for (field, validator) in &self.validators {
            // One message per field is enough
            if errors.iter().any(|e| &e.field == field) {
                continue;
            }
            let value = body.get(field).unwrap_or(&Value::Null);
            if let Err(message) = validator(field, value) {
                errors.push(FieldValidationError {
                    field: field.clone(),
                    message,
                });
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(body))
        } else {
            Err(errors)
        }
    }
}
