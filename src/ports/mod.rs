/// Ports module defining interfaces for hexagonal architecture
///
/// Outbound (driven) ports only: the CLI drives the application use cases
/// directly.
pub mod outbound;
