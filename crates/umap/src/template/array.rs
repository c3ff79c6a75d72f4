use super::Template;

/// Homogeneous sequence of one entry template.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayTemplate {
    entry: Template,
    complexity: u64,
}

impl ArrayTemplate {
    pub fn new(entry: impl Into<Template>) -> Self {
        let entry = entry.into();
        let complexity = entry.complexity().saturating_mul(10);
        Self { entry, complexity }
    }

    pub fn entry(&self) -> &Template {
        &self.entry
    }

    pub fn complexity(&self) -> u64 {
        self.complexity
    }

    pub fn matches(&self, other: &ArrayTemplate) -> bool {
        self.entry.matches_template(&other.entry)
    }
}
