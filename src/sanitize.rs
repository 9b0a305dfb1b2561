//! Validation and escaping for everything that enters rendered SPARQL text.
//!
//! The catalog and the mutation engine never interpolate caller data
//! directly: identifiers pass through [`validate_iri`], literal text through
//! [`escape_literal`], and language tags through [`validate_language_tag`].
//! Anything that fails validation is rejected before a single byte reaches
//! the store.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("invalid IRI: {0}")]
    InvalidIri(String),

    #[error("IRI uses unsupported scheme: {0}")]
    InvalidScheme(String),

    #[error("invalid language tag: {0}")]
    InvalidLanguageTag(String),

    #[error("invalid tenant segment: {0}")]
    InvalidTenantSegment(String),
}

static IRI_RE: Lazy<Regex> = Lazy::new(|| {
    // Absolute IRI, no whitespace, no angle brackets, no quotes, no braces.
    Regex::new(r#"^[a-zA-Z][a-zA-Z0-9+.-]*:[^\s<>"{}|\\^`]*$"#).expect("valid IRI regex")
});

static LANG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]{1,8}(-[a-zA-Z0-9]{1,8})*$").expect("valid lang regex"));

static TENANT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_-]{0,63}$").expect("valid tenant regex"));

/// Validate an absolute IRI for use between angle brackets.
pub fn validate_iri(input: &str) -> Result<&str, SanitizeError> {
    if input.is_empty() || !IRI_RE.is_match(input) {
        return Err(SanitizeError::InvalidIri(input.to_string()));
    }
    let scheme = input.split(':').next().unwrap_or_default();
    match scheme {
        "http" | "https" | "urn" => Ok(input),
        other => Err(SanitizeError::InvalidScheme(other.to_string())),
    }
}

/// Render a validated IRI as a SPARQL term.
pub fn iri_term(input: &str) -> Result<String, SanitizeError> {
    validate_iri(input)?;
    Ok(format!("<{input}>"))
}

/// Escape literal text for a double-quoted SPARQL string.
pub fn escape_literal(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + 2);
    for ch in input.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Validate a BCP 47-shaped language tag (`de`, `en-US`).
pub fn validate_language_tag(input: &str) -> Result<&str, SanitizeError> {
    if LANG_RE.is_match(input) {
        Ok(input)
    } else {
        Err(SanitizeError::InvalidLanguageTag(input.to_string()))
    }
}

/// Validate a tenant group segment before it is embedded in graph and entity
/// IRIs.
pub fn validate_tenant_segment(input: &str) -> Result<&str, SanitizeError> {
    if TENANT_RE.is_match(input) {
        Ok(input)
    } else {
        Err(SanitizeError::InvalidTenantSegment(input.to_string()))
    }
}

/// Render a literal term, optionally language tagged.
pub fn literal_term(text: &str, language: Option<&str>) -> Result<String, SanitizeError> {
    let escaped = escape_literal(text);
    match language {
        Some(lang) => {
            validate_language_tag(lang)?;
            Ok(format!("\"{escaped}\"@{lang}"))
        }
        None => Ok(format!("\"{escaped}\"")),
    }
}
