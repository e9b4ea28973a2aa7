//! JSON tool API
//!
//! Modular API with separated concerns:
//! - types: Request/response type definitions and app state
//! - extractors: Custom request extractors
//! - handlers: Tool endpoint handlers
//! - router: Router creation and configuration
//! - tests: Unit tests for all components

mod extractors;
mod handlers;
mod router;
mod tests;
pub mod types;

// Re-export public API
pub use extractors::JsonExtractor;
pub use router::create_router;
pub use types::{AppState, ToolMeta, ToolResponse};
