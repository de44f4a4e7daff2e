//! Confluence MCP - Confluence wiki tools over the Model Context Protocol
//!
//! A thin protocol adapter that exposes a Confluence Cloud instance's
//! REST API (spaces, pages, search) as callable tools for AI-assistant
//! hosts, served as JSON-RPC 2.0 over stdio.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config (environment settings, URL normalization)
//!   - client (REST client: Basic auth, retries, pagination)
//!   - cql (Confluence Query Language builder)
//!   - services (unified service container)
//!
//! - **mcp**: MCP adapter (depends on core)
//!   - server, protocol, transport, tools
//!
//! # Key Features
//!
//! - Basic-Auth credentials attached to every outbound request
//! - Bounded retry with fixed backoff for network and 5xx failures
//! - Offset pagination that walks every page of list endpoints
//! - Wiki API error messages surfaced to the MCP client unchanged

// Core domain logic (protocol-agnostic)
pub mod core;

// MCP (Model Context Protocol) adapter
pub mod mcp;

// Re-export commonly used types for convenience
pub use core::client::{ConfluenceClient, RetryPolicy, WikiApi};
pub use core::config::Settings;
pub use core::error::{ConfluenceError, Result};
pub use core::services::Services;
