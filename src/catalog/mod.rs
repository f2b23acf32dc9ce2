/// Catalog domain: value types, pure matching algorithms and policies.
///
/// Nothing in this module performs I/O. Persistence and remote access are
/// reached through the traits in `crate::ports`.
pub mod domain;
pub mod policies;
pub mod services;
