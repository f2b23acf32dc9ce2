use std::time::Duration;

/// ResolveRequest - Options of a remote resolution run
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Search only; never write catalog files or create records
    pub dry_run: bool,
    /// Create a remote record for values no search variation found
    pub create: bool,
    /// Pause between consecutive outbound calls
    pub request_delay: Duration,
}

impl ResolveRequest {
    pub fn new(dry_run: bool, create: bool, request_delay: Duration) -> Self {
        Self {
            dry_run,
            create,
            request_delay,
        }
    }
}
