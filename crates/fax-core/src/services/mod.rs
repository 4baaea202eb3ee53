//! Service modules for business logic

pub mod cover_letter;

// Re-export service types
pub use cover_letter::DocumentRenderer;
