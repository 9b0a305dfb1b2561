//! Folding of denormalized result rows into one raw entity record.
//!
//! The wide SELECT repeats the scalar columns on every row and binds at most
//! one match per relation column per row. Scalars are taken from the first
//! row only (the repetition is redundant by construction); relation columns
//! are unioned across all rows into per-family identifier sets.

use indexmap::{IndexMap, IndexSet};

use crate::binding::Row;
use crate::model::{EntityId, EntityKind, LangString};
use crate::schema::{self, FetchKind};

use super::HydrationError;

/// One entity as read from the store, before typed assembly.
#[derive(Debug, Clone)]
pub struct RawEntity {
    pub id: EntityId,
    /// Concrete kind, decided by the type marker of the matched rows.
    pub kind: EntityKind,
    scalars: IndexMap<&'static str, LangString>,
    edges: IndexMap<&'static str, IndexSet<EntityId>>,
}

impl RawEntity {
    /// Scalar value with its language tag, when present.
    pub fn scalar(&self, field: &str) -> Option<&LangString> {
        self.scalars.get(field)
    }

    /// Scalar text, dropping any language tag.
    pub fn scalar_text(&self, field: &str) -> Option<String> {
        self.scalars.get(field).map(|value| value.text.clone())
    }

    /// All edge targets of one relation family.
    pub fn edge(&self, field: &str) -> impl Iterator<Item = &EntityId> {
        self.edges.get(field).into_iter().flatten()
    }

    /// The single target of a single-valued relation. When the store holds
    /// several (it has no cardinality enforcement) the first one wins.
    pub fn single_edge(&self, field: &str) -> Option<&EntityId> {
        self.edges.get(field).and_then(|targets| targets.first())
    }

    /// Every (relation field, target) pair, for traversal.
    pub fn edge_targets(&self) -> impl Iterator<Item = (&'static str, &EntityId)> {
        self.edges
            .iter()
            .flat_map(|(field, targets)| targets.iter().map(move |id| (*field, id)))
    }
}

/// Fold the rows of one wide SELECT into a raw record. An empty row set
/// means the entity does not exist; the caller decides what that means.
pub fn fold_rows(
    id: &EntityId,
    fetch: FetchKind,
    rows: &[Row],
) -> Result<Option<RawEntity>, HydrationError> {
    let Some(first) = rows.first() else {
        return Ok(None);
    };

    let marker = first
        .iri_opt("type")
        .ok()
        .flatten()
        .ok_or_else(|| HydrationError::MissingTypeMarker { id: id.clone() })?;
    let kind = EntityKind::from_marker(marker.as_str())
        .filter(|kind| fetch.markers().contains(&kind.type_marker()))
        .ok_or_else(|| HydrationError::MissingTypeMarker { id: id.clone() })?;

    let mut scalars = IndexMap::new();
    for spec in schema::fetch_scalars(fetch) {
        if let Some(value) = first.lang_literal_opt(spec.field).ok().flatten() {
            // Untagged columns keep language = None even if the store holds
            // a stray tag; the tagged/untagged distinction is part of the
            // scalar contract, not of the storage.
            let value = if spec.lang_tagged {
                value
            } else {
                LangString::plain(value.text)
            };
            scalars.insert(spec.field, value);
        }
    }

    let mut edges: IndexMap<&'static str, IndexSet<EntityId>> = IndexMap::new();
    for row in rows {
        for spec in schema::fetch_relations(fetch) {
            if let Some(target) = row.iri_opt(spec.field).ok().flatten() {
                edges.entry(spec.field).or_default().insert(target);
            }
        }
    }

    Ok(Some(RawEntity {
        id: id.clone(),
        kind,
        scalars,
        edges,
    }))
}
