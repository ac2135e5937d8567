//! Query enhancement.
//!
//! The raw query is wrapped in a sentence before embedding so that it lands
//! near movie descriptions in embedding space instead of near bare keywords.

use crate::error::{RankingError, Result};

/// Placeholder replaced by the caller's query
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Default template applied to every query
pub const DEFAULT_QUERY_TEMPLATE: &str = "I am looking for a movie that is: {query}";

/// Turns a raw query into the text handed to the embedding provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryEnhancer {
    template: String,
}

impl QueryEnhancer {
    /// Create an enhancer from a template containing `{query}`.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(QUERY_PLACEHOLDER) {
            return Err(RankingError::InvalidTemplate(template));
        }
        Ok(Self { template })
    }

    /// Apply the template. Empty or whitespace-only queries still get the prefix.
    pub fn enhance(&self, query: &str) -> String {
        self.template.replace(QUERY_PLACEHOLDER, query)
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl Default for QueryEnhancer {
    fn default() -> Self {
        Self {
            template: DEFAULT_QUERY_TEMPLATE.to_string(),
        }
    }
}
