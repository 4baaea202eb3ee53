//! Client modules for external services

pub mod faxplus;

// Re-export all client types
pub use faxplus::FaxPlusClient;
