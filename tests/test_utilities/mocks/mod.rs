/// Mock implementations for testing
mod mock_metaobject_repository;
mod mock_product_repository;
mod mock_progress_reporter;

pub use mock_metaobject_repository::MockMetaobjectRepository;
pub use mock_product_repository::MockProductRepository;
pub use mock_progress_reporter::MockProgressReporter;
