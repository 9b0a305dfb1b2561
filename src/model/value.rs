use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::entities::HasId;
use super::id::EntityId;

/// Literal text with an independent, optional language tag.
///
/// `language: None` and an absent value are different states and both are
/// preserved through hydration and mutation: the update path needs to know
/// whether a stored label had a tag to decide what a partial patch means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LangString {
    pub text: String,
    pub language: Option<String>,
}

impl LangString {
    pub fn plain(text: impl Into<String>) -> Self {
        LangString {
            text: text.into(),
            language: None,
        }
    }

    pub fn tagged(text: impl Into<String>, language: impl Into<String>) -> Self {
        LangString {
            text: text.into(),
            language: Some(language.into()),
        }
    }
}

/// Reference to a related entity: either fully materialized and shared, or a
/// stub carrying nothing but the identifier.
///
/// Stubs appear where the hydration engine cut a cycle, hit the depth bound,
/// or found a dangling edge. Equality, ordering and hashing all go by
/// identifier, so relation sets deduplicate by identity regardless of how
/// much of the target was materialized.
#[derive(Debug, Clone)]
pub enum Linked<T> {
    Stub(EntityId),
    Full(Arc<T>),
}

impl<T: HasId> Linked<T> {
    pub fn id(&self) -> &EntityId {
        match self {
            Linked::Stub(id) => id,
            Linked::Full(entity) => entity.id(),
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, Linked::Stub(_))
    }

    /// The materialized target, when this reference is not a stub.
    pub fn entity(&self) -> Option<&Arc<T>> {
        match self {
            Linked::Stub(_) => None,
            Linked::Full(entity) => Some(entity),
        }
    }
}

impl<T: HasId> PartialEq for Linked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl<T: HasId> Eq for Linked<T> {}

impl<T: HasId> PartialOrd for Linked<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: HasId> Ord for Linked<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id().cmp(other.id())
    }
}

impl<T: HasId> Hash for Linked<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::model::SemanticReference;

    fn id(n: u32) -> EntityId {
        EntityId::new(format!("https://w3id.org/plantgraph/entity/t/{n}")).unwrap()
    }

    #[test]
    fn stub_and_full_with_same_id_collapse_in_sets() {
        let sem = SemanticReference::new(id(1));
        let mut set: BTreeSet<Linked<SemanticReference>> = BTreeSet::new();
        set.insert(Linked::Stub(id(1)));
        set.insert(Linked::Full(Arc::new(sem)));
        assert_eq!(set.len(), 1);
    }
}
