use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use super::{admit, Pending};
use crate::error::{AccessError, FieldError, FieldPath, PathSegment, Reason};
use crate::template::MapTemplate;
use crate::value::Value;

/// Immutable, schema-validated map. Entries follow the template's canonical
/// order; absent optional keys resolve to their default on read.
#[derive(Debug, Clone)]
pub struct MapDocument {
    template: Arc<MapTemplate>,
    entries: Arc<IndexMap<String, Value>>,
}

impl MapDocument {
    pub fn template(&self) -> &Arc<MapTemplate> {
        &self.template
    }

    /// Stored value, or the mapping's default when the key was left unset.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .get(key)
            .or_else(|| self.template.get(key).and_then(|m| m.default_value()))
    }

    /// Value of a required key.
    pub fn required(&self, key: &str) -> Result<&Value, AccessError> {
        let mapping = self
            .template
            .get(key)
            .ok_or_else(|| AccessError::UnknownKey(key.to_owned()))?;
        if mapping.is_optional() {
            return Err(AccessError::Optional(key.to_owned()));
        }
        self.entries
            .get(key)
            .ok_or_else(|| AccessError::Missing(key.to_owned()))
    }

    /// Value of an optional key, default applied.
    pub fn optional(&self, key: &str) -> Result<Option<&Value>, AccessError> {
        let mapping = self
            .template
            .get(key)
            .ok_or_else(|| AccessError::UnknownKey(key.to_owned()))?;
        if !mapping.is_optional() {
            return Err(AccessError::Required(key.to_owned()));
        }
        Ok(self.get(key))
    }

    /// Whether a value was explicitly stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of explicitly stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Templates must match and every key must resolve to the same value.
impl PartialEq for MapDocument {
    fn eq(&self, other: &Self) -> bool {
        if !Arc::ptr_eq(&self.template, &other.template) && !self.template.matches(&other.template)
        {
            return false;
        }
        self.template.keys().all(|key| self.get(key) == other.get(key))
    }
}

/// Assembles a [`MapDocument`], validating each assignment as it happens.
#[derive(Debug)]
pub struct MapBuilder {
    template: Arc<MapTemplate>,
    entries: IndexMap<String, Pending>,
    missing: IndexSet<String>,
    ignore_unknown_keys: bool,
    ignore_duplicate_keys: bool,
}

impl MapBuilder {
    pub fn new(template: Arc<MapTemplate>) -> Self {
        let missing = template.keys().map(str::to_owned).collect();
        Self {
            template,
            entries: IndexMap::new(),
            missing,
            ignore_unknown_keys: false,
            ignore_duplicate_keys: false,
        }
    }

    /// Drop keys the template does not declare instead of failing.
    pub fn ignore_unknown_keys(mut self, ignore: bool) -> Self {
        self.ignore_unknown_keys = ignore;
        self
    }

    /// Let a later assignment replace an earlier one instead of failing.
    pub fn ignore_duplicate_keys(mut self, ignore: bool) -> Self {
        self.ignore_duplicate_keys = ignore;
        self
    }

    pub fn template(&self) -> &Arc<MapTemplate> {
        &self.template
    }

    /// First unassigned key in canonical order.
    pub fn next_key(&self) -> Option<&str> {
        self.missing.first().map(String::as_str)
    }

    /// Keys not assigned yet, in canonical order.
    pub fn missing_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.missing.iter().map(String::as_str)
    }

    pub fn is_assigned(&self, key: &str) -> bool {
        self.template.contains_key(key) && !self.missing.contains(key)
    }

    /// Assigns `key`. Null clears an optional key; the default then applies.
    pub fn set(&mut self, key: &str, value: impl Into<Pending>) -> Result<&mut Self, FieldError> {
        let value = value.into();
        let template = Arc::clone(&self.template);
        let Some(mapping) = template.get(key) else {
            if self.ignore_unknown_keys {
                tracing::warn!(key, "dropping key not declared by the template");
                return Ok(self);
            }
            return Err(FieldError::bare(FieldPath::key(key), Reason::UnknownKey)
                .with_preview(value.preview()));
        };

        if !self.missing.contains(key) && !self.ignore_duplicate_keys {
            return Err(FieldError::bare(FieldPath::key(key), Reason::DuplicatedKey)
                .with_preview(value.preview()));
        }

        if value.is_null() {
            if !mapping.is_optional() {
                return Err(FieldError::bare(FieldPath::key(key), Reason::MissingValue)
                    .with_details("required key cannot be null"));
            }
            self.entries.shift_remove(key);
        } else {
            let admitted = admit(value, mapping.template())
                .map_err(|e| e.under(PathSegment::Key(key.to_owned())))?;
            self.entries.insert(key.to_owned(), admitted);
        }
        self.missing.shift_remove(key);
        Ok(self)
    }

    /// Resolves nested builders and checks that every required key was set.
    pub fn build(mut self) -> Result<MapDocument, FieldError> {
        if let Some(key) = self.missing.iter().find(|key| {
            self.template
                .get(key.as_str())
                .is_some_and(|m| !m.is_optional())
        }) {
            return Err(FieldError::bare(FieldPath::key(key.as_str()), Reason::MissingKey));
        }

        let mut entries = IndexMap::with_capacity(self.entries.len());
        for key in self.template.keys() {
            if let Some(pending) = self.entries.swap_remove(key) {
                let value = pending
                    .resolve()
                    .map_err(|e| e.under(PathSegment::Key(key.to_owned())))?;
                entries.insert(key.to_owned(), value);
            }
        }
        Ok(MapDocument {
            template: self.template,
            entries: Arc::new(entries),
        })
    }
}
