/// Data Transfer Objects for application layer
///
/// Requests carry operator input into the use cases; responses carry the
/// domain results back out to the CLI.
mod assembly_request;
mod job_response;
mod publish_request;
mod resolve_request;

pub use assembly_request::AssemblyRequest;
pub use job_response::JobResponse;
pub use publish_request::{PublishRequest, PublishResponse};
pub use resolve_request::ResolveRequest;
