//! Dynamic input-schema validation (C2): a per-flow validator built at call
//! time from the `START` node's declared `inputs`, rather than any
//! compile-time record type.

use std::collections::{BTreeMap, HashMap};

use crate::expression::Value;
use crate::models::{InputSpec, InputType, StartMetadata};

/// Validates a concrete payload against one flow's declared input schema.
pub struct PayloadValidator<'a> {
    inputs: &'a [InputSpec],
}

impl<'a> PayloadValidator<'a> {
    pub fn new(start: &'a StartMetadata) -> Self {
        Self { inputs: &start.inputs }
    }

    /// Validates `payload`, returning the typed environment the concrete
    /// executor can evaluate against, or a map of per-field error messages.
    pub fn validate(&self, payload: &serde_json::Map<String, serde_json::Value>) -> Result<BTreeMap<String, Value>, HashMap<String, String>> {
        let mut errors = HashMap::new();
        let mut env = BTreeMap::new();

        for spec in self.inputs {
            match payload.get(&spec.display_name) {
                None | Some(serde_json::Value::Null) => {
                    if spec.required {
                        errors.insert(spec.display_name.clone(), "required field is missing".to_string());
                    } else {
                        env.insert(spec.display_name.clone(), Value::Null);
                    }
                }
                Some(raw) => match check_type(raw, spec.input_type) {
                    Ok(()) => {
                        env.insert(spec.display_name.clone(), Value::from_json(raw));
                    }
                    Err(message) => {
                        errors.insert(spec.display_name.clone(), message);
                    }
                },
            }
        }

        if errors.is_empty() {
            Ok(env)
        } else {
            Err(errors)
        }
    }
}

fn check_type(value: &serde_json::Value, expected: InputType) -> Result<(), String> {
    let matches = match (expected, value) {
        (InputType::Number, serde_json::Value::Number(_)) => true,
        (InputType::Text, serde_json::Value::String(_)) => true,
        (InputType::Bool, serde_json::Value::Bool(_)) => true,
        (InputType::Object, serde_json::Value::Object(_)) => true,
        (InputType::List, serde_json::Value::Array(_)) => true,
        _ => false,
    };

    if matches {
        Ok(())
    } else {
        Err(format!("expected {:?}, found a different shape", expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(name: &str, ty: InputType, required: bool) -> InputSpec {
        InputSpec {
            display_name: name.to_string(),
            input_type: ty,
            required,
        }
    }

    #[test]
    fn rejects_missing_required_field() {
        let start = StartMetadata {
            inputs: vec![spec("age", InputType::Number, true)],
        };
        let validator = PayloadValidator::new(&start);
        let payload = json!({}).as_object().unwrap().clone();
        let result = validator.validate(&payload);
        assert!(result.is_err());
    }

    #[test]
    fn accepts_missing_optional_field() {
        let start = StartMetadata {
            inputs: vec![spec("nickname", InputType::Text, false)],
        };
        let validator = PayloadValidator::new(&start);
        let payload = json!({}).as_object().unwrap().clone();
        let env = validator.validate(&payload).unwrap();
        assert_eq!(env.get("nickname"), Some(&Value::Null));
    }

    #[test]
    fn rejects_mistyped_field() {
        let start = StartMetadata {
            inputs: vec![spec("age", InputType::Number, true)],
        };
        let validator = PayloadValidator::new(&start);
        let payload = json!({"age": "not a number"}).as_object().unwrap().clone();
        assert!(validator.validate(&payload).is_err());
    }
}
