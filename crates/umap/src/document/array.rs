use std::ops::Range;
use std::sync::Arc;

use super::{admit, Pending};
use crate::error::{FieldError, FieldPath, PathSegment, Reason};
use crate::template::ArrayTemplate;
use crate::value::Value;

/// Immutable, schema-validated sequence. Never holds null.
#[derive(Debug, Clone)]
pub struct ArrayDocument {
    template: Arc<ArrayTemplate>,
    items: Arc<Vec<Value>>,
}

impl ArrayDocument {
    pub fn template(&self) -> &Arc<ArrayTemplate> {
        &self.template
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }

    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.items.iter().position(|v| v == value)
    }

    pub fn last_index_of(&self, value: &Value) -> Option<usize> {
        self.items.iter().rposition(|v| v == value)
    }

    /// Copy of `range` under the same template; `None` when out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Option<ArrayDocument> {
        let items = self.items.get(range)?.to_vec();
        Some(ArrayDocument {
            template: Arc::clone(&self.template),
            items: Arc::new(items),
        })
    }
}

impl PartialEq for ArrayDocument {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.template, &other.template) || self.template.matches(&other.template))
            && self.items == other.items
    }
}

impl<'a> IntoIterator for &'a ArrayDocument {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Assembles an [`ArrayDocument`]. Null entries are rejected.
#[derive(Debug)]
pub struct ArrayBuilder {
    template: Arc<ArrayTemplate>,
    items: Vec<Pending>,
}

impl ArrayBuilder {
    pub fn new(template: Arc<ArrayTemplate>) -> Self {
        Self {
            template,
            items: Vec::new(),
        }
    }

    pub fn template(&self) -> &Arc<ArrayTemplate> {
        &self.template
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add(&mut self, value: impl Into<Pending>) -> Result<&mut Self, FieldError> {
        let index = self.items.len();
        let value = value.into();
        if value.is_null() {
            return Err(FieldError::bare(FieldPath::index(index), Reason::InvalidValue)
                .with_details("arrays cannot hold null entries"));
        }
        let admitted =
            admit(value, self.template.entry()).map_err(|e| e.under(PathSegment::Index(index)))?;
        self.items.push(admitted);
        Ok(self)
    }

    pub fn extend<I, T>(&mut self, values: I) -> Result<&mut Self, FieldError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Pending>,
    {
        for value in values {
            self.add(value)?;
        }
        Ok(self)
    }

    pub fn build(self) -> Result<ArrayDocument, FieldError> {
        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(index, pending)| {
                pending
                    .resolve()
                    .map_err(|e| e.under(PathSegment::Index(index)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ArrayDocument {
            template: self.template,
            items: Arc::new(items),
        })
    }
}
