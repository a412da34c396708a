// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error kinds and user-facing error formatting.
//!
//! Library functions return `anyhow::Result`; the failures that callers act
//! on are wrapped as a [`CatalogError`] and can be recovered with
//! `err.downcast_ref::<CatalogError>()`.

use std::fmt;
use std::path::PathBuf;

/// Failures while fetching listings or catalog files.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Network failure or non-success HTTP status.
    Fetch { url: String, reason: String },
    /// A listing page does not have the expected layout.
    Parse { source_name: String, detail: String },
    /// Creating or writing a local file failed.
    Write { path: PathBuf, reason: String },
}

impl CatalogError {
    /// Network or HTTP failure while fetching `url`.
    pub fn fetch(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Fetch { url: url.into(), reason: reason.to_string() }
    }

    /// Listing page that does not have the expected layout.
    pub fn parse(source_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Parse { source_name: source_name.into(), detail: detail.into() }
    }

    /// Local file that could not be written.
    pub fn write(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::Write { path: path.into(), reason: reason.to_string() }
    }

    /// Short kind label for logs and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::Parse { .. } => "parse",
            Self::Write { .. } => "write",
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch { url, reason } => write!(f, "Failed to fetch {}: {}", url, reason),
            Self::Parse { source_name, detail } => {
                write!(f, "Unexpected {} listing layout: {}", source_name, detail)
            }
            Self::Write { path, reason } => {
                write!(f, "Failed to write {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Formats an error message with title, causes and fixes.
pub fn format_error(title: &str, causes: &[&str], fixes: &[&str]) -> String {
    let mut output = String::new();

    output.push_str(&format!("[✗] {}\n", title));

    if !causes.is_empty() {
        output.push_str("\nPossible causes:\n");
        for cause in causes {
            output.push_str(&format!("  - {}\n", cause));
        }
    }

    if !fixes.is_empty() {
        output.push_str("\nTry these fixes:\n");
        for (i, fix) in fixes.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, fix));
        }
    }

    output
}

/// Builder for constructing formatted error messages.
///
/// # Example
///
/// ```
/// use linecat::error::ErrorBuilder;
///
/// let error = ErrorBuilder::new("Could not read the CDMS listing")
///     .cause("No network connection")
///     .fix("Check the archive URL: linecat config show")
///     .build();
/// println!("{}", error);
/// ```
#[derive(Debug, Clone)]
pub struct ErrorBuilder {
    title: String,
    causes: Vec<String>,
    fixes: Vec<String>,
}

impl ErrorBuilder {
    /// Create a new error builder with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            causes: Vec::new(),
            fixes: Vec::new(),
        }
    }

    /// Add a possible cause.
    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Add a suggested fix.
    pub fn fix(mut self, fix: impl Into<String>) -> Self {
        self.fixes.push(fix.into());
        self
    }

    /// Build the formatted error message.
    pub fn build(self) -> String {
        let causes: Vec<&str> = self.causes.iter().map(|s| s.as_str()).collect();
        let fixes: Vec<&str> = self.fixes.iter().map(|s| s.as_str()).collect();
        format_error(&self.title, &causes, &fixes)
    }
}

impl fmt::Display for ErrorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clone().build())
    }
}
