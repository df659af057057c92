//! Required-field validation for record forms.

use crate::models::record::{Field, Record};
use std::collections::{BTreeMap, HashMap};

/// Field name -> human readable message.
pub type FieldErrors = BTreeMap<String, String>;

/// Fields the create and edit forms refuse to submit blank.
pub const REQUIRED_FIELDS: [&str; 3] = ["company", "l1", "location"];

/// Anything that can answer "what is the value of field `name`".
/// `None` means the field is absent and is treated as empty.
pub trait FormData {
    fn value(&self, name: &str) -> Option<&str>;
}

impl FormData for Record {
    fn value(&self, name: &str) -> Option<&str> {
        Field::from_name(name).map(|f| self.get(f))
    }
}

impl FormData for HashMap<String, String> {
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FormData for BTreeMap<String, String> {
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Report every required field that is absent or blank after trimming.
pub fn validate<D, S>(data: &D, required_fields: &[S]) -> FieldErrors
where
    D: FormData + ?Sized,
    S: AsRef<str>,
{
    let mut errors = FieldErrors::new();

    for field in required_fields {
        let name = field.as_ref();
        let blank = data.value(name).is_none_or(|v| v.trim().is_empty());
        if blank {
            errors.insert(name.to_string(), required_message(name));
        }
    }

    errors
}

pub fn is_valid(errors: &FieldErrors) -> bool {
    errors.is_empty()
}

/// `"l1"` -> `"L1 is required"`. Only the first character is upper-cased.
fn required_message(name: &str) -> String {
    let mut chars = name.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{capitalized} is required")
}
