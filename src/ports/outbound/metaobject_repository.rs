use crate::catalog::domain::ComponentType;
use crate::shared::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One structured attribute record returned by a remote search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaobjectMatch {
    pub id: String,
    pub display_name: String,
}

/// MetaobjectRepository port for the remote platform's structured records
///
/// # Async Support
/// Calls are issued sequentially by the reconciliation jobs; implementations
/// must still be `Send + Sync` to be usable from the async runtime.
#[async_trait]
pub trait MetaobjectRepository: Send + Sync {
    /// Searches records of one component type
    ///
    /// # Returns
    /// Zero or more matches. An empty list means "not found".
    ///
    /// # Errors
    /// Returns `CatalogError::RemoteUnavailable` if the platform cannot be
    /// reached or answers with a failure status.
    async fn search(&self, component_type: ComponentType, query: &str)
        -> Result<Vec<MetaobjectMatch>>;

    /// Creates a record and returns its identifier
    ///
    /// # Errors
    /// Returns `CatalogError::RemoteRejected` with the platform's messages
    /// when it refuses the record.
    async fn create(&self, component_type: ComponentType, display_name: &str) -> Result<String>;
}

#[async_trait]
impl<T: MetaobjectRepository + ?Sized> MetaobjectRepository for &T {
    async fn search(
        &self,
        component_type: ComponentType,
        query: &str,
    ) -> Result<Vec<MetaobjectMatch>> {
        (**self).search(component_type, query).await
    }

    async fn create(&self, component_type: ComponentType, display_name: &str) -> Result<String> {
        (**self).create(component_type, display_name).await
    }
}
