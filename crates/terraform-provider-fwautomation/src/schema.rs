//! Declarative attribute schemas for the provider and its resources.
//!
//! Attribute values travel as strings; [`ValueType`] only constrains what a
//! string has to look like.

use crate::diag::{Diagnostic, Diagnostics};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Field validator: receives the value and the attribute name and returns one
/// message per problem.
pub type ValidateFn = fn(&str, &str) -> Vec<String>;

/// Attribute value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Free-form string.
    String,
    /// Non-negative integer.
    Number,
}

/// Schema of a single attribute.
#[derive(Clone, Serialize)]
pub struct Attribute {
    /// Value type.
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Human-readable description.
    pub description: &'static str,
    /// Must be set (directly or through `env_default`).
    pub required: bool,
    /// Changing the value replaces the resource.
    pub force_new: bool,
    /// Environment variable consulted when the value is not set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_default: Option<&'static str>,
    /// Value used when neither the configuration nor the environment set one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    /// Format validator.
    #[serde(skip)]
    pub validate: Option<ValidateFn>,
}

impl Attribute {
    /// Optional string attribute.
    #[must_use]
    pub const fn string(description: &'static str) -> Self {
        Self {
            value_type: ValueType::String,
            description,
            required: false,
            force_new: false,
            env_default: None,
            default: None,
            validate: None,
        }
    }

    /// Optional number attribute.
    #[must_use]
    pub const fn number(description: &'static str) -> Self {
        Self {
            value_type: ValueType::Number,
            ..Self::string(description)
        }
    }

    /// Marks the attribute as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the attribute as force-new.
    #[must_use]
    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Falls back to the environment variable `var`.
    #[must_use]
    pub const fn env_default(mut self, var: &'static str) -> Self {
        self.env_default = Some(var);
        self
    }

    /// Falls back to a fixed value.
    #[must_use]
    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Sets the format validator.
    #[must_use]
    pub fn validate_with(mut self, validate: ValidateFn) -> Self {
        self.validate = Some(validate);
        self
    }

    /// Checks a single value against this attribute.
    #[must_use]
    pub fn check(&self, key: &str, value: &str) -> Diagnostics {
        let mut diags = Diagnostics::new();

        if self.value_type == ValueType::Number && value.parse::<u64>().is_err() {
            diags.push(
                Diagnostic::error(format!("{key:?} must be a number, got {value:?}"))
                    .with_attribute(key),
            );
            return diags;
        }

        if let Some(validate) = self.validate {
            for message in validate(value, key) {
                diags.push(Diagnostic::error(message).with_attribute(key));
            }
        }

        diags
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("value_type", &self.value_type)
            .field("required", &self.required)
            .field("force_new", &self.force_new)
            .field("env_default", &self.env_default)
            .field("default", &self.default)
            .field("validated", &self.validate.is_some())
            .finish()
    }
}

/// Schema of a provider or resource.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Schema {
    /// Schema version.
    pub version: u32,
    /// Attributes by name.
    pub attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(version: u32) -> Self {
        Self {
            version,
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    /// Looks an attribute up.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Fills in unset attributes from the environment and fixed defaults.
    ///
    /// Empty strings count as unset. Keys unknown to the schema are kept so
    /// [`validate`](Self::validate) can report them.
    pub fn resolve<F>(&self, raw: &BTreeMap<String, String>, env: F) -> BTreeMap<String, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values: BTreeMap<String, String> = raw
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        for (name, attribute) in &self.attributes {
            if values.contains_key(*name) {
                continue;
            }
            let fallback = attribute
                .env_default
                .and_then(&env)
                .filter(|value| !value.is_empty())
                .or_else(|| attribute.default.map(str::to_string));
            if let Some(value) = fallback {
                values.insert((*name).to_string(), value);
            }
        }

        values
    }

    /// Validates resolved values: unknown attributes, missing required
    /// attributes, and per-attribute format checks.
    #[must_use]
    pub fn validate(&self, values: &BTreeMap<String, String>) -> Diagnostics {
        let mut diags = Diagnostics::new();

        for key in values.keys() {
            if !self.attributes.contains_key(key.as_str()) {
                diags.push(
                    Diagnostic::error(format!("Unsupported argument {key:?}")).with_attribute(key),
                );
            }
        }

        for (name, attribute) in &self.attributes {
            match values.get(*name) {
                Some(value) => diags.extend(attribute.check(name, value)),
                None if attribute.required => {
                    let mut diag = Diagnostic::error(format!(
                        "The argument {name:?} is required, but no definition was found."
                    ))
                    .with_attribute(*name);
                    if let Some(var) = attribute.env_default {
                        diag = diag.with_detail(format!("Set it in configuration or via {var}."));
                    }
                    diags.push(diag);
                }
                None => {}
            }
        }

        diags
    }
}
