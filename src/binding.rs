//! Typed extraction from SPARQL result rows.
//!
//! Both transports normalize their solutions into [`Row`] values over
//! `oxigraph` terms; the hydration engine reads identifiers and literals out
//! of them with the typed getters here instead of pattern matching terms at
//! every call site.

use indexmap::IndexMap;
use oxigraph::model::Term;
use thiserror::Error;

use crate::model::{EntityId, LangString};
use crate::sanitize::SanitizeError;

/// Errors raised when a row does not carry the shape the catalog promised.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BindingError {
    #[error("variable '{0}' is unbound")]
    Unbound(String),

    #[error("expected {expected} for '{var}', got {actual}")]
    TypeMismatch {
        var: String,
        expected: &'static str,
        actual: String,
    },

    #[error("variable '{var}' holds a malformed identifier: {source}")]
    InvalidIdentifier {
        var: String,
        source: SanitizeError,
    },
}

/// One solution of a SELECT query.
#[derive(Debug, Clone, Default)]
pub struct Row {
    bindings: IndexMap<String, Term>,
}

impl Row {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Term)>) -> Self {
        Row {
            bindings: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, var: &str) -> Option<&Term> {
        self.bindings.get(var)
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Extract an entity identifier, requiring the variable to be bound.
    pub fn iri(&self, var: &str) -> Result<EntityId, BindingError> {
        self.iri_opt(var)?
            .ok_or_else(|| BindingError::Unbound(var.to_string()))
    }

    /// Extract an optional entity identifier.
    pub fn iri_opt(&self, var: &str) -> Result<Option<EntityId>, BindingError> {
        match self.bindings.get(var) {
            None => Ok(None),
            Some(Term::NamedNode(node)) => EntityId::new(node.as_str())
                .map(Some)
                .map_err(|source| BindingError::InvalidIdentifier {
                    var: var.to_string(),
                    source,
                }),
            Some(term) => Err(BindingError::TypeMismatch {
                var: var.to_string(),
                expected: "IRI",
                actual: term_type_name(term),
            }),
        }
    }

    /// Extract an optional plain literal, dropping any language tag.
    pub fn literal_opt(&self, var: &str) -> Result<Option<String>, BindingError> {
        Ok(self.lang_literal_opt(var)?.map(|value| value.text))
    }

    /// Extract an optional literal together with its language tag, keeping
    /// the tagged and untagged cases distinct.
    pub fn lang_literal_opt(&self, var: &str) -> Result<Option<LangString>, BindingError> {
        match self.bindings.get(var) {
            None => Ok(None),
            Some(Term::Literal(lit)) => Ok(Some(LangString {
                text: lit.value().to_string(),
                language: lit.language().map(str::to_string),
            })),
            Some(term) => Err(BindingError::TypeMismatch {
                var: var.to_string(),
                expected: "literal",
                actual: term_type_name(term),
            }),
        }
    }
}

fn term_type_name(term: &Term) -> String {
    match term {
        Term::NamedNode(_) => "IRI".to_string(),
        Term::BlankNode(_) => "blank node".to_string(),
        Term::Literal(lit) => match lit.language() {
            Some(lang) => format!("literal@{lang}"),
            None => format!("literal<{}>", lit.datatype()),
        },
        Term::Triple(_) => "quoted triple".to_string(),
    }
}
