use heck::ToTitleCase;
use serde_json::{Map, Value};

/// Produces the display form of quote, policy and claim form data.
pub trait FormDataPrettifier: Send + Sync {
    fn prettify(&self, form_data: &Value) -> Value;
}

/// Replaces field names with title-cased labels and booleans with `Yes`/`No`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelledFormDataPrettifier;

impl FormDataPrettifier for LabelledFormDataPrettifier {
    fn prettify(&self, form_data: &Value) -> Value {
        match form_data {
            Value::Object(fields) => {
                let mut labelled = Map::with_capacity(fields.len());
                for (key, value) in fields {
                    labelled.insert(label(key), self.prettify(value));
                }
                Value::Object(labelled)
            }
            Value::Array(items) => Value::Array(items.iter().map(|item| self.prettify(item)).collect()),
            Value::Bool(true) => Value::String("Yes".to_string()),
            Value::Bool(false) => Value::String("No".to_string()),
            other => other.clone(),
        }
    }
}

/// Title-cased label for a form field key. Acronyms written in capitals in the
/// key (`ABN`, `vehicleVIN`) keep their capitals.
fn label(key: &str) -> String {
    key.to_title_case()
        .split(' ')
        .map(|word| {
            let upper = word.to_uppercase();
            if word.len() > 1 && key.contains(&upper) {
                upper
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
