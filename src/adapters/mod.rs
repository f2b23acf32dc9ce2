/// Adapters layer - Infrastructure implementations
///
/// Concrete implementations of the outbound ports: the JSON data
/// directory, the remote admin API, the console and report formatting.
pub mod outbound;
