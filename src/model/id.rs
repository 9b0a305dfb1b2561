use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sanitize::{self, SanitizeError};

/// Globally unique identifier of one entity in the store.
///
/// A validated absolute IRI. Identity is the only notion of equality the
/// engine has: entities are never compared by attribute value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    pub fn new(iri: impl Into<String>) -> Result<Self, SanitizeError> {
        let iri = iri.into();
        sanitize::validate_iri(&iri)?;
        Ok(EntityId(iri))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render as a SPARQL term.
    pub fn as_term(&self) -> String {
        format!("<{}>", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntityId {
    type Error = SanitizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        EntityId::new(value)
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0
    }
}
