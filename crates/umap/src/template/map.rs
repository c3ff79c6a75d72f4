use std::sync::Arc;

use indexmap::IndexMap;

use super::key::{Key, Mapping};
use super::Template;
use crate::error::TemplateError;
use crate::value::Value;

/// Ordered set of mappings describing a map document.
///
/// Mappings are kept in canonical order: ascending complexity, then detail
/// level, then name. Scalars therefore precede nested structures.
#[derive(Debug, Clone)]
pub struct MapTemplate {
    mappings: IndexMap<String, Mapping>,
    complexity: u64,
    max_key_width: usize,
}

impl MapTemplate {
    pub fn builder() -> MapTemplateBuilder {
        MapTemplateBuilder::default()
    }

    fn from_mappings(mut mappings: Vec<Mapping>) -> Self {
        mappings.sort_by(|a, b| {
            a.template()
                .complexity()
                .cmp(&b.template().complexity())
                .then(a.detail_level().cmp(&b.detail_level()))
                .then_with(|| a.name().cmp(b.name()))
        });
        let complexity = mappings
            .iter()
            .fold(0u64, |acc, m| acc.saturating_add(m.template().complexity()));
        let max_key_width = mappings
            .iter()
            .map(|m| m.name().chars().count())
            .max()
            .unwrap_or(0);
        Self {
            mappings: mappings
                .into_iter()
                .map(|m| (m.name().to_owned(), m))
                .collect(),
            complexity,
            max_key_width,
        }
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Mapping> {
        self.mappings.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.mappings.contains_key(name)
    }

    /// Mappings in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Mapping> + '_ {
        self.mappings.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.mappings.keys().map(String::as_str)
    }

    /// Mappings with `detail_level <= level`, in canonical order.
    pub fn limit_detail_level(&self, level: u32) -> impl Iterator<Item = &Mapping> + '_ {
        self.mappings
            .values()
            .filter(move |m| m.detail_level() <= level)
    }

    pub fn complexity(&self) -> u64 {
        self.complexity
    }

    /// Length in characters of the longest key.
    pub fn max_key_width(&self) -> usize {
        self.max_key_width
    }

    /// Same key set, and every nested template matches. Optionality,
    /// defaults and detail levels do not take part.
    pub fn matches(&self, other: &MapTemplate) -> bool {
        self.mappings.len() == other.mappings.len()
            && self.mappings.iter().all(|(name, mapping)| {
                other
                    .mappings
                    .get(name)
                    .is_some_and(|o| mapping.template().matches_template(o.template()))
            })
    }
}

impl PartialEq for MapTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

/// Collects mappings for a [`MapTemplate`]. The first construction error is
/// kept and reported by [`MapTemplateBuilder::build`].
#[derive(Debug, Default)]
pub struct MapTemplateBuilder {
    mappings: Vec<Mapping>,
    error: Option<TemplateError>,
}

impl MapTemplateBuilder {
    pub fn add(mut self, mapping: Mapping) -> Self {
        if self.error.is_none() {
            if self.mappings.iter().any(|m| m.name() == mapping.name()) {
                self.error = Some(TemplateError::DuplicateMapping(mapping.name().to_owned()));
            } else {
                self.mappings.push(mapping);
            }
        }
        self
    }

    pub fn mapping(
        self,
        name: &str,
        detail_level: u32,
        optional: bool,
        template: impl Into<Template>,
        default: Option<Value>,
    ) -> Self {
        let mapping = Key::new(name, detail_level, optional)
            .and_then(|key| Mapping::new(key, template.into(), default));
        self.push(mapping)
    }

    pub fn required(self, name: &str, template: impl Into<Template>) -> Self {
        self.mapping(name, 0, false, template, None)
    }

    pub fn optional(self, name: &str, template: impl Into<Template>) -> Self {
        self.mapping(name, 0, true, template, None)
    }

    pub fn optional_with_default(
        self,
        name: &str,
        template: impl Into<Template>,
        default: impl Into<Value>,
    ) -> Self {
        self.mapping(name, 0, true, template, Some(default.into()))
    }

    fn push(mut self, mapping: Result<Mapping, TemplateError>) -> Self {
        match mapping {
            Ok(mapping) => self.add(mapping),
            Err(err) => {
                self.error.get_or_insert(err);
                self
            }
        }
    }

    pub fn build(self) -> Result<MapTemplate, TemplateError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(MapTemplate::from_mappings(self.mappings)),
        }
    }

    /// Builds straight into a shared handle.
    pub fn build_arc(self) -> Result<Arc<MapTemplate>, TemplateError> {
        self.build().map(Arc::new)
    }
}
