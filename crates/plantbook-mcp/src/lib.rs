//! plantbook-mcp: Open Plantbook care data as MCP tools
//!
//! The binary in `main.rs` wires configuration, logging and the HTTP client
//! together; the tool surface lives in [`server`] so it can be driven
//! directly in tests with any [`plantbook_client::PlantProvider`].

mod lenient;
pub mod server;

pub use server::{PlantbookMcp, ToolSettings};
