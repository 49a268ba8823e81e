//! Error types for form resolution

use thiserror::Error;

use crate::layout::LayoutError;
use crate::manifest::ManifestError;

/// Errors that can occur while resolving form metadata
#[derive(Debug, Error)]
pub enum FormError {
    /// A named form was requested but the resource has no named forms
    #[error("form layouts not configured; add named forms to the resource configuration")]
    NotConfigured,

    /// The resource has named forms, but not this one
    #[error("form with name '{name}' not found{}", format_suggestions(.suggestions))]
    NotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// The request path matches none of the form routes
    #[error("no form route matches '{path}'")]
    NoRoute { path: String },

    /// A linked form points at a resource that is not registered
    #[error("linked form target '{name}' is not a registered resource{}", format_suggestions(.suggestions))]
    UnknownResource {
        name: String,
        suggestions: Vec<String>,
    },

    /// Two resources registered under the same name
    #[error("duplicate resource definition: {name}")]
    DuplicateResource { name: String },

    /// Linked forms that delegate back to themselves
    #[error("circular linked form reference: {chain}")]
    CircularLink { chain: String },

    /// Field metadata could not be produced
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Error in a configured layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Error loading a resource manifest
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

impl FormError {
    /// Create a not found error, suggesting close form names
    pub fn not_found<'a>(name: impl Into<String>, known: impl Iterator<Item = &'a str>) -> Self {
        let name = name.into();
        let suggestions = find_similar(known, &name, 2);
        Self::NotFound { name, suggestions }
    }

    /// Create an unknown resource error, suggesting close resource names
    pub fn unknown_resource<'a>(
        name: impl Into<String>,
        known: impl Iterator<Item = &'a str>,
    ) -> Self {
        let name = name.into();
        let suggestions = find_similar(known, &name, 2);
        Self::UnknownResource { name, suggestions }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Whether the caller asked for something that does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotConfigured | Self::NotFound { .. } | Self::NoRoute { .. }
        )
    }

    /// HTTP status the error maps to
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else {
            500
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::NotFound { suggestions, .. } => Some(suggestions),
            Self::UnknownResource { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();

    if a_chars.is_empty() {
        return n;
    }
    if n == 0 {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut row = vec![0usize; n + 1];

    for (i, ac) in a_chars.iter().enumerate() {
        row[0] = i + 1;
        for (j, bc) in b_chars.iter().enumerate() {
            let cost = usize::from(ac != bc);
            row[j + 1] = (prev[j + 1] + 1).min(row[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut row);
    }

    prev[n]
}

/// Find known names within a maximum edit distance, closest first
pub(crate) fn find_similar<'a>(
    known: impl Iterator<Item = &'a str>,
    target: &str,
    max_distance: usize,
) -> Vec<String> {
    let mut candidates: Vec<(String, usize)> = known
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            (dist <= max_distance && dist > 0).then(|| (name.to_string(), dist))
        })
        .collect();

    candidates.sort_by_key(|(_, d)| *d);
    candidates
        .into_iter()
        .map(|(name, _)| name)
        .take(3)
        .collect()
}
