//! Value constraints attached to primitive templates.

use std::ops::RangeInclusive;

use regex::{Regex, RegexBuilder};

use super::PrimitiveType;
use crate::error::TemplateError;
use crate::value::Value;

/// Constraint checked after coercion.
///
/// Exactly one family applies to a given primitive type: integer ranges to
/// the integer kinds, float ranges to the floating kinds and text rules to
/// strings and enums.
#[derive(Debug, Clone)]
pub enum Validator {
    IntRange { min: i64, max: i64 },
    FloatRange { min: f64, max: f64 },
    Text(TextValidator),
}

impl Validator {
    pub fn int_range(range: RangeInclusive<i64>) -> Self {
        Self::IntRange {
            min: *range.start(),
            max: *range.end(),
        }
    }

    pub fn float_range(range: RangeInclusive<f64>) -> Self {
        Self::FloatRange {
            min: *range.start(),
            max: *range.end(),
        }
    }

    pub fn family(&self) -> &'static str {
        match self {
            Self::IntRange { .. } => "integer range",
            Self::FloatRange { .. } => "float range",
            Self::Text(_) => "text",
        }
    }

    pub fn applies_to(&self, kind: PrimitiveType) -> bool {
        match self {
            Self::IntRange { .. } => kind.is_integer(),
            Self::FloatRange { .. } => kind.is_float(),
            Self::Text(_) => kind.is_text(),
        }
    }

    /// Checks `value`, returning a human readable rejection.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self {
            Self::IntRange { min, max } => {
                let n = value
                    .as_i64()
                    .ok_or_else(|| format!("{} is not an integer", value.type_name()))?;
                if n < *min || n > *max {
                    return Err(format!("{n} outside range [{min}, {max}]"));
                }
                Ok(())
            }
            Self::FloatRange { min, max } => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| format!("{} is not a float", value.type_name()))?;
                if n < *min || n > *max {
                    return Err(format!("{n} outside range [{min}, {max}]"));
                }
                Ok(())
            }
            Self::Text(text) => {
                let s = value
                    .as_str()
                    .ok_or_else(|| format!("{} is not text", value.type_name()))?;
                text.validate(s)
            }
        }
    }
}

impl PartialEq for Validator {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::IntRange { min: a, max: b }, Self::IntRange { min: c, max: d }) => {
                a == c && b == d
            }
            (Self::FloatRange { min: a, max: b }, Self::FloatRange { min: c, max: d }) => {
                a.to_bits() == c.to_bits() && b.to_bits() == d.to_bits()
            }
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

/// Text rules: length bounds (in characters), a full-match pattern and an
/// allow-list. Case sensitivity covers both the pattern and the allow-list.
#[derive(Debug, Clone)]
pub struct TextValidator {
    length: Option<RangeInclusive<usize>>,
    pattern: Option<(String, Regex)>,
    one_of: Option<Vec<String>>,
    case_sensitive: bool,
}

impl Default for TextValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl TextValidator {
    pub fn new() -> Self {
        Self {
            length: None,
            pattern: None,
            one_of: None,
            case_sensitive: true,
        }
    }

    pub fn length(mut self, range: RangeInclusive<usize>) -> Self {
        self.length = Some(range);
        self
    }

    /// The pattern must match the whole string.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, TemplateError> {
        let anchored = anchored_regex(pattern, self.case_sensitive)?;
        self.pattern = Some((pattern.to_owned(), anchored));
        Ok(self)
    }

    pub fn one_of<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_of = Some(members.into_iter().map(Into::into).collect());
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        if let Some((source, regex)) = &mut self.pattern {
            // the case flag never turns a valid pattern invalid
            if let Ok(folded) = anchored_regex(source, false) {
                *regex = folded;
            }
        }
        self
    }

    pub fn members(&self) -> Option<&[String]> {
        self.one_of.as_deref()
    }

    pub fn pattern_str(&self) -> Option<&str> {
        self.pattern.as_ref().map(|(source, _)| source.as_str())
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn validate(&self, s: &str) -> Result<(), String> {
        if let Some(range) = &self.length {
            let len = s.chars().count();
            if !range.contains(&len) {
                return Err(format!(
                    "length {len} outside range [{}, {}]",
                    range.start(),
                    range.end()
                ));
            }
        }
        if let Some((source, regex)) = &self.pattern {
            if !regex.is_match(s) {
                return Err(format!("does not match pattern {source:?}"));
            }
        }
        if let Some(members) = &self.one_of {
            let found = if self.case_sensitive {
                members.iter().any(|m| m == s)
            } else {
                let lowered = s.to_lowercase();
                members.iter().any(|m| m.to_lowercase() == lowered)
            };
            if !found {
                return Err(format!("not one of [{}]", members.join(", ")));
            }
        }
        Ok(())
    }
}

fn anchored_regex(pattern: &str, case_sensitive: bool) -> Result<Regex, TemplateError> {
    RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| TemplateError::InvalidPattern(e.to_string()))
}

impl PartialEq for TextValidator {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self.pattern_str() == other.pattern_str()
            && self.one_of == other.one_of
            && self.case_sensitive == other.case_sensitive
    }
}
