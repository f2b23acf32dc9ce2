use async_trait::async_trait;
use catalog_mapper::ports::outbound::MetaobjectMatch;
use catalog_mapper::prelude::*;
use catalog_mapper::shared::error::CatalogError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock MetaobjectRepository answering searches from a fixed table
///
/// Searches are keyed by (type, exact query). Every query and creation is
/// recorded so tests can assert on the order of remote calls.
#[derive(Default)]
pub struct MockMetaobjectRepository {
    results: HashMap<(ComponentType, String), Vec<MetaobjectMatch>>,
    unavailable: bool,
    /// Creates that succeed before every later create fails
    creates_before_outage: Option<usize>,
    next_id: AtomicUsize,
    pub queries: Mutex<Vec<(ComponentType, String)>>,
    pub created: Mutex<Vec<(ComponentType, String)>>,
}

impl MockMetaobjectRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(9000),
            ..Default::default()
        }
    }

    pub fn with_result(
        mut self,
        component_type: ComponentType,
        query: &str,
        id: &str,
        display_name: &str,
    ) -> Self {
        self.results
            .entry((component_type, query.to_string()))
            .or_default()
            .push(MetaobjectMatch {
                id: id.to_string(),
                display_name: display_name.to_string(),
            });
        self
    }

    /// Every call fails as if the platform were unreachable.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }

    /// Searches keep working; creates fail once `successes` have gone through.
    pub fn failing_after_creates(successes: usize) -> Self {
        Self {
            creates_before_outage: Some(successes),
            ..Self::new()
        }
    }

    pub fn queries(&self) -> Vec<(ComponentType, String)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<(ComponentType, String)> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetaobjectRepository for MockMetaobjectRepository {
    async fn search(
        &self,
        component_type: ComponentType,
        query: &str,
    ) -> Result<Vec<MetaobjectMatch>> {
        self.queries
            .lock()
            .unwrap()
            .push((component_type, query.to_string()));
        if self.unavailable {
            return Err(CatalogError::RemoteUnavailable {
                operation: "metaobject search".to_string(),
                details: "connection refused".to_string(),
            }
            .into());
        }
        Ok(self
            .results
            .get(&(component_type, query.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn create(&self, component_type: ComponentType, display_name: &str) -> Result<String> {
        let mut created = self.created.lock().unwrap();
        if self.unavailable || self.creates_before_outage.is_some_and(|n| created.len() >= n) {
            return Err(CatalogError::RemoteUnavailable {
                operation: "metaobject create".to_string(),
                details: "gateway timeout".to_string(),
            }
            .into());
        }
        created.push((component_type, display_name.to_string()));
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(format!("gid://shopify/Metaobject/{}", id))
    }
}
