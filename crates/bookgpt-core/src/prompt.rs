//! Prompt Builder
//!
//! Templates are plain text with `{{field}}` placeholders. A request supplies
//! the values through [`GenerationRequest::template_fields`] and declares which
//! of its required fields are missing through
//! [`GenerationRequest::missing_fields`]. Building refuses to render anything
//! until the request is complete.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

use crate::error::ValidationError;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{\s*([A-Za-z0-9_.]+)\s*\}\}").unwrap();
}

/// Placeholder values keyed by field name
pub type FieldMap = BTreeMap<String, String>;

/// Identifies one of the fixed prompt templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    Chat,
    MissionVision,
    MissionVisionRevision,
    StakeholderMotivation,
    StakeholderRevision,
}

impl TemplateId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::MissionVision => "mission_vision",
            Self::MissionVisionRevision => "mission_vision_revision",
            Self::StakeholderMotivation => "stakeholder_motivation",
            Self::StakeholderRevision => "stakeholder_revision",
        }
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-defined request shape
pub trait GenerationRequest {
    /// Every required field that is absent or blank, in declaration order.
    ///
    /// Nested fields are reported with a path, e.g. `stakeholders[1].role`.
    fn missing_fields(&self) -> Vec<String>;

    /// Values for the template placeholders
    fn template_fields(&self) -> FieldMap;
}

/// A system instruction plus a user prompt body
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    id: TemplateId,
    system: String,
    body: String,
}

impl PromptTemplate {
    pub fn new(id: TemplateId, system: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            system: system.into(),
            body: body.into(),
        }
    }

    pub fn id(&self) -> TemplateId {
        self.id
    }

    /// Placeholder names in order of first appearance
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for text in [&self.system, &self.body] {
            for cap in PLACEHOLDER.captures_iter(text) {
                let name = cap[1].to_string();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    fn interpolate(text: &str, fields: &FieldMap) -> String {
        PLACEHOLDER
            .replace_all(text, |cap: &Captures| {
                fields.get(&cap[1]).cloned().unwrap_or_default()
            })
            .into_owned()
    }

    /// Substitute `fields` into the template. Unknown placeholders render empty.
    pub fn render(&self, fields: &FieldMap) -> Prompt {
        Prompt {
            template: self.id,
            system: Self::interpolate(&self.system, fields).trim().to_string(),
            user: Self::interpolate(&self.body, fields).trim().to_string(),
        }
    }
}

/// A rendered prompt ready to be sent to a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub template: TemplateId,
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Single-string form for providers without a separate system channel
    pub fn combined(&self) -> String {
        if self.system.is_empty() {
            self.user.clone()
        } else {
            format!("{}\n\n{}", self.system, self.user)
        }
    }
}

pub struct PromptBuilder;

impl PromptBuilder {
    /// Validate `request` against its required fields and render `template`.
    ///
    /// Fails with every missing field at once, never just the first.
    pub fn build<R>(template: &PromptTemplate, request: &R) -> Result<Prompt, ValidationError>
    where
        R: GenerationRequest + ?Sized,
    {
        Self::validate(request)?;
        Ok(template.render(&request.template_fields()))
    }

    /// Required-field check on its own, without rendering
    pub fn validate<R>(request: &R) -> Result<(), ValidationError>
    where
        R: GenerationRequest + ?Sized,
    {
        match ValidationError::from_missing(request.missing_fields()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// True when `value` is absent or only whitespace
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Push `name` onto `missing` when `value` is blank
pub fn require(missing: &mut Vec<String>, name: &str, value: Option<&str>) {
    if is_blank(value) {
        missing.push(name.to_string());
    }
}

/// Value of an optional field, or `default` when blank
pub fn or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}
