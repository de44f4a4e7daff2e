//! MCP tool implementations
//!
//! This module contains all MCP tool handlers that expose the
//! Confluence REST API to AI assistants.

pub mod advanced_search;
pub mod create_page;
pub mod delete_page;
pub mod get_page;
pub mod get_space;
pub mod handler;
pub mod list_pages;
pub mod list_spaces;
pub mod registry;
pub mod search_content;
pub mod update_page;

pub use advanced_search::AdvancedSearchHandler;
pub use create_page::CreatePageHandler;
pub use delete_page::DeletePageHandler;
pub use get_page::GetPageHandler;
pub use get_space::GetSpaceHandler;
pub use handler::{json_content, text_content, McpToolHandler};
pub use list_pages::ListPagesHandler;
pub use list_spaces::ListSpacesHandler;
pub use registry::ToolRegistry;
pub use search_content::SearchContentHandler;
pub use update_page::UpdatePageHandler;
