//! Structured Response Extractor
//!
//! Model replies wrap their JSON in prose. The scanner finds the first
//! balanced top-level `{...}` span (string literals and escapes are honored, so
//! braces inside strings do not count), hands it to `serde_json`, and then
//! checks the caller's [`ShapeContract`].

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ExtractionError;

/// What to do with array elements that violate the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementPolicy {
    /// One bad element fails the whole extraction
    Strict,
    /// Drop bad elements; fail only if too few valid ones remain
    FilterValid,
}

/// Minimal structure a parsed object must have to be accepted.
///
/// The object must carry `array_field` holding at least `min_len` elements,
/// each an object whose `required` keys are non-empty strings.
#[derive(Debug, Clone)]
pub struct ShapeContract {
    array_field: &'static str,
    required: &'static [&'static str],
    min_len: usize,
    policy: ElementPolicy,
}

impl ShapeContract {
    pub fn new(
        array_field: &'static str,
        required: &'static [&'static str],
        policy: ElementPolicy,
    ) -> Self {
        Self {
            array_field,
            required,
            min_len: 1,
            policy,
        }
    }

    pub fn strict(array_field: &'static str, required: &'static [&'static str]) -> Self {
        Self::new(array_field, required, ElementPolicy::Strict)
    }

    pub fn filter_valid(array_field: &'static str, required: &'static [&'static str]) -> Self {
        Self::new(array_field, required, ElementPolicy::FilterValid)
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    pub fn policy(&self) -> ElementPolicy {
        self.policy
    }

    pub fn array_field(&self) -> &'static str {
        self.array_field
    }

    /// First required key of `element` that is missing or blank
    fn element_violation(&self, element: &Value) -> Option<String> {
        let Some(object) = element.as_object() else {
            return Some("element is not an object".to_string());
        };
        self.required
            .iter()
            .find(|key| {
                object
                    .get(**key)
                    .and_then(Value::as_str)
                    .map_or(true, |s| s.trim().is_empty())
            })
            .map(|key| format!("{} missing or empty", key))
    }

    /// Validate `value`, returning it (possibly filtered) on success
    pub fn check(&self, mut value: Value) -> Result<Value, ExtractionError> {
        let field = self.array_field;
        let Some(object) = value.as_object_mut() else {
            return Err(ExtractionError::ShapeMismatch(
                "top-level value is not an object".to_string(),
            ));
        };
        let Some(items) = object.get_mut(field).and_then(Value::as_array_mut) else {
            return Err(ExtractionError::ShapeMismatch(format!(
                "`{}` is missing or not an array",
                field
            )));
        };

        match self.policy {
            ElementPolicy::Strict => {
                for (index, item) in items.iter().enumerate() {
                    if let Some(problem) = self.element_violation(item) {
                        return Err(ExtractionError::ShapeMismatch(format!(
                            "{}[{}]: {}",
                            field, index, problem
                        )));
                    }
                }
            }
            ElementPolicy::FilterValid => {
                let before = items.len();
                items.retain(|item| self.element_violation(item).is_none());
                if items.len() < before {
                    tracing::debug!(
                        "Dropped {} invalid element(s) from `{}`",
                        before - items.len(),
                        field
                    );
                }
            }
        }

        if items.len() < self.min_len {
            return Err(ExtractionError::ShapeMismatch(format!(
                "`{}` has {} valid element(s), expected at least {}",
                field,
                items.len(),
                self.min_len
            )));
        }

        Ok(value)
    }
}

/// Locate the first balanced top-level `{...}` span in `raw`.
///
/// An opening brace that never closes is skipped and the search resumes at the
/// next one.
pub fn find_json_object(raw: &str) -> Option<&str> {
    let bytes = raw.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = raw[search_from..].find('{') {
        let start = search_from + offset;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (i, &b) in bytes.iter().enumerate().skip(start) {
            if in_string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
                continue;
            }

            match b {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&raw[start..=i]);
                    }
                }
                _ => {}
            }
        }

        search_from = start + 1;
    }

    None
}

/// Find, parse and shape-check the JSON object embedded in `raw`
pub fn extract_value(raw: &str, contract: &ShapeContract) -> Result<Value, ExtractionError> {
    let span = find_json_object(raw).ok_or(ExtractionError::NoJsonFound)?;
    let value: Value =
        serde_json::from_str(span).map_err(|e| ExtractionError::MalformedJson(e.to_string()))?;
    contract.check(value)
}

/// Like [`extract_value`], then deserialize into the caller's type
pub fn extract<T: DeserializeOwned>(raw: &str, contract: &ShapeContract) -> Result<T, ExtractionError> {
    let value = extract_value(raw, contract)?;
    serde_json::from_value(value).map_err(|e| ExtractionError::ShapeMismatch(e.to_string()))
}
