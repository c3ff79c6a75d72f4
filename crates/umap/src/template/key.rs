use std::sync::OnceLock;

use regex::Regex;

use super::Template;
use crate::error::TemplateError;
use crate::value::Value;

fn key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z_][a-zA-Z0-9_]{0,63}$").unwrap())
}

/// Whether `name` is usable as a mapping key.
pub fn is_valid_key_name(name: &str) -> bool {
    name != "_" && key_regex().is_match(name)
}

/// Name, detail level and optionality of a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    name: String,
    detail_level: u32,
    optional: bool,
}

impl Key {
    pub fn new(
        name: impl Into<String>,
        detail_level: u32,
        optional: bool,
    ) -> Result<Self, TemplateError> {
        let name = name.into();
        if !is_valid_key_name(&name) {
            return Err(TemplateError::InvalidKey(name));
        }
        Ok(Self {
            name,
            detail_level,
            optional,
        })
    }

    pub fn required(name: impl Into<String>) -> Result<Self, TemplateError> {
        Self::new(name, 0, false)
    }

    pub fn optional(name: impl Into<String>) -> Result<Self, TemplateError> {
        Self::new(name, 0, true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn detail_level(&self) -> u32 {
        self.detail_level
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// A named, typed slot of a map template.
#[derive(Debug, Clone)]
pub struct Mapping {
    key: Key,
    template: Template,
    default: Option<Value>,
}

impl Mapping {
    /// Fails when `default` does not satisfy `template`. A null default is
    /// the same as no default.
    pub fn new(
        key: Key,
        template: Template,
        default: Option<Value>,
    ) -> Result<Self, TemplateError> {
        let default = default.filter(|v| !v.is_null());
        if let Some(value) = &default {
            if !template.matches_value(value) {
                return Err(TemplateError::DefaultMismatch {
                    key: key.name().to_owned(),
                });
            }
        }
        Ok(Self {
            key,
            template,
            default,
        })
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn name(&self) -> &str {
        self.key.name()
    }

    pub fn detail_level(&self) -> u32 {
        self.key.detail_level()
    }

    pub fn is_optional(&self) -> bool {
        self.key.is_optional()
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}
