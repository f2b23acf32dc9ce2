/// Application layer - Use cases, DTOs and long-lived services
///
/// This layer orchestrates the catalog domain services and reaches files
/// and the remote platform only through ports.
pub mod context;
pub mod dto;
pub mod services;
pub mod use_cases;

pub use context::AppContext;
