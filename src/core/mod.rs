//! Core domain logic (protocol-agnostic): configuration, the
//! Confluence REST client and CQL query construction.

pub mod client;
pub mod config;
pub mod cql;
pub mod error;
pub mod services;
