//! CQL (Confluence Query Language) query construction.
//!
//! The search tools accept structured filters and translate them into
//! a CQL string; a caller-supplied CQL query bypasses this entirely.

/// Builder for CQL query strings.
///
/// All clauses are joined with ` AND `. The free-text query is always
/// present; every other clause is optional.
#[derive(Debug, Clone, Default)]
pub struct CqlQuery {
    text: String,
    space_id: Option<String>,
    content_type: Option<String>,
    include_archived: bool,
    created_after: Option<String>,
    created_before: Option<String>,
    updated_after: Option<String>,
    updated_before: Option<String>,
    creator: Option<String>,
    contributor: Option<String>,
}

impl CqlQuery {
    /// Create a builder for a free-text query
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Restrict results to a space by ID
    pub fn space_id(mut self, id: impl Into<String>) -> Self {
        self.space_id = Some(id.into());
        self
    }

    /// Restrict results to a content type ('page', 'blogpost', 'comment', ...)
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Include archived content.
    ///
    /// Retained for API symmetry: archived filtering via a `status`
    /// clause is not supported by the Confluence Cloud REST API, so
    /// this currently emits no clause.
    pub fn include_archived(mut self, include: bool) -> Self {
        self.include_archived = include;
        self
    }

    /// Only content created on or after this ISO date (e.g. "2023-01-01")
    pub fn created_after(mut self, date: impl Into<String>) -> Self {
        self.created_after = Some(date.into());
        self
    }

    /// Only content created on or before this ISO date
    pub fn created_before(mut self, date: impl Into<String>) -> Self {
        self.created_before = Some(date.into());
        self
    }

    /// Only content last modified on or after this ISO date
    pub fn updated_after(mut self, date: impl Into<String>) -> Self {
        self.updated_after = Some(date.into());
        self
    }

    /// Only content last modified on or before this ISO date
    pub fn updated_before(mut self, date: impl Into<String>) -> Self {
        self.updated_before = Some(date.into());
        self
    }

    /// Only content created by this user
    pub fn creator(mut self, username: impl Into<String>) -> Self {
        self.creator = Some(username.into());
        self
    }

    /// Only content this user contributed to
    pub fn contributor(mut self, username: impl Into<String>) -> Self {
        self.contributor = Some(username.into());
        self
    }

    /// Render the CQL string
    pub fn build(&self) -> String {
        // Escape double quotes inside the free-text query
        let text = self.text.replace('"', "\\\"");
        let mut parts = vec![format!("text ~ \"{text}\"")];

        if let Some(space_id) = &self.space_id {
            parts.push(format!("space.id = {space_id}"));
        }
        if let Some(content_type) = &self.content_type {
            parts.push(format!("type = {content_type}"));
        }
        if let Some(date) = &self.created_after {
            parts.push(format!("created >= \"{date}\""));
        }
        if let Some(date) = &self.created_before {
            parts.push(format!("created <= \"{date}\""));
        }
        if let Some(date) = &self.updated_after {
            parts.push(format!("lastmodified >= \"{date}\""));
        }
        if let Some(date) = &self.updated_before {
            parts.push(format!("lastmodified <= \"{date}\""));
        }
        if let Some(creator) = &self.creator {
            parts.push(format!("creator = \"{creator}\""));
        }
        if let Some(contributor) = &self.contributor {
            parts.push(format!("contributor = \"{contributor}\""));
        }

        parts.join(" AND ")
    }
}
