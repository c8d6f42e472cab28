use std::collections::HashMap;

use crate::errors::{CascadeResult, ContextError};
use crate::models::GeographicContext;

/// Source of geographic contexts (the data-ingestion collaborator).
pub trait IContextProvider: Send + Sync {
    fn context(&self, geography_id: &str) -> CascadeResult<GeographicContext>;
}

/// In-memory provider keyed by geography id.
#[derive(Debug, Clone, Default)]
pub struct StaticContextProvider {
    contexts: HashMap<String, GeographicContext>,
}

impl StaticContextProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, context: GeographicContext) {
        self.contexts.insert(context.geography_id.clone(), context);
    }

    pub fn with(mut self, context: GeographicContext) -> Self {
        self.insert(context);
        self
    }
}

impl IContextProvider for StaticContextProvider {
    fn context(&self, geography_id: &str) -> CascadeResult<GeographicContext> {
        self.contexts.get(geography_id).cloned().ok_or_else(|| {
            ContextError::UnknownGeography {
                geography_id: geography_id.to_string(),
            }
            .into()
        })
    }
}
