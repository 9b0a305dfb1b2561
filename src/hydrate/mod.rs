//! Graph hydration: read one root entity and everything reachable from it,
//! reconstructing a typed object graph that terminates on cycles.
//!
//! The engine runs in two passes, both iterative:
//!
//! 1. **Fetch.** A worklist walks identifiers breadth-first, one catalog
//!    query per entity. Identifiers are marked visited when they are
//!    enqueued, before any fetch, so cyclic data cannot loop, and the
//!    traversal stops descending past the configured depth bound. The
//!    visited set lives in the per-call traversal context and is never
//!    shared between calls.
//! 2. **Assembly.** Fetched records are materialized deepest-first. An edge
//!    whose target is already materialized shares the same `Arc` (diamond
//!    references deduplicate to one instance); an edge pointing back at an
//!    entity not yet materialized is a cycle and becomes a stub carrying
//!    only the identifier. No native recursion anywhere on remote data.

mod assemble;
mod raw;

pub use raw::RawEntity;

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use thiserror::Error;

use crate::catalog;
use crate::error::Result;
use crate::model::{AnyEntity, EntityId, EntityKind};
use crate::schema::{self, FetchKind};
use crate::scope::ReadScope;
use crate::transport::SparqlTransport;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HydrationError {
    #[error("entity {id} matched rows without a usable type marker")]
    MissingTypeMarker { id: EntityId },

    #[error("entity {id} hydrated as {found} where {expected} was required")]
    KindMismatch {
        id: EntityId,
        expected: &'static str,
        found: EntityKind,
    },
}

/// Per-call traversal context: what was fetched, and what was queried but
/// absent. Constructed fresh for every top-level call.
#[derive(Debug, Default)]
pub(crate) struct Traversal {
    pub(crate) fetched: IndexMap<EntityId, RawEntity>,
    pub(crate) missing: HashSet<EntityId>,
}

pub struct HydrationEngine<'a> {
    transport: &'a dyn SparqlTransport,
    max_depth: usize,
}

impl<'a> HydrationEngine<'a> {
    pub fn new(transport: &'a dyn SparqlTransport, max_depth: usize) -> Self {
        HydrationEngine {
            transport,
            max_depth,
        }
    }

    /// Hydrate `id` and its reachable closure under the engine's depth
    /// bound. `Ok(None)` means the entity does not exist; the only exception
    /// is a product-application root, which tolerates the miss and comes
    /// back as a placeholder wrapping the given identifier as its product.
    pub async fn hydrate(
        &self,
        id: &EntityId,
        fetch: FetchKind,
        scope: &ReadScope,
    ) -> Result<Option<AnyEntity>> {
        self.hydrate_with_depth(id, fetch, scope, self.max_depth).await
    }

    pub async fn hydrate_with_depth(
        &self,
        id: &EntityId,
        fetch: FetchKind,
        scope: &ReadScope,
        max_depth: usize,
    ) -> Result<Option<AnyEntity>> {
        tracing::debug!(root = %id, depth = max_depth, "hydrating");
        let traversal = self.fetch_closure(id, fetch, scope, max_depth).await?;

        if !traversal.fetched.contains_key(id) {
            // Input tolerance for dangling product-application references:
            // the miss materializes a placeholder wrapping the given product
            // instead of reporting absence. Every other kind reports the
            // miss explicitly.
            if fetch == FetchKind::Exact(EntityKind::ProductApplication) {
                return Ok(Some(assemble::product_application_placeholder(id)));
            }
            return Ok(None);
        }

        let mut entities = assemble::assemble_all(&traversal)?;
        Ok(entities.shift_remove(id))
    }

    /// Fetch and fold a single record without descending into relations.
    /// The update and delete paths read current state through this.
    pub(crate) async fn fetch_raw(
        &self,
        id: &EntityId,
        fetch: FetchKind,
        scope: &ReadScope,
    ) -> Result<Option<RawEntity>> {
        let query = catalog::wide_select(fetch, id, scope);
        let rows = self.transport.select(&query).await?;
        Ok(raw::fold_rows(id, fetch, &rows)?)
    }

    async fn fetch_closure(
        &self,
        root: &EntityId,
        fetch: FetchKind,
        scope: &ReadScope,
        max_depth: usize,
    ) -> Result<Traversal> {
        let mut traversal = Traversal::default();
        let mut visited: HashSet<EntityId> = HashSet::new();
        let mut queue: VecDeque<(EntityId, FetchKind, usize)> = VecDeque::new();

        visited.insert(root.clone());
        queue.push_back((root.clone(), fetch, 0));

        while let Some((id, fetch, depth)) = queue.pop_front() {
            let query = catalog::wide_select(fetch, &id, scope);
            let rows = self.transport.select(&query).await?;
            let Some(record) = raw::fold_rows(&id, fetch, &rows)? else {
                traversal.missing.insert(id);
                continue;
            };

            if depth < max_depth {
                for (field, target) in record.edge_targets() {
                    if visited.contains(target) {
                        continue;
                    }
                    let Some(spec) = schema::fetch_relations(fetch)
                        .iter()
                        .find(|spec| spec.field == field)
                    else {
                        continue;
                    };
                    visited.insert(target.clone());
                    queue.push_back((
                        target.clone(),
                        FetchKind::from_target(spec.target),
                        depth + 1,
                    ));
                }
            }

            traversal.fetched.insert(id, record);
        }

        tracing::debug!(
            root = %root,
            fetched = traversal.fetched.len(),
            missing = traversal.missing.len(),
            "traversal complete"
        );
        Ok(traversal)
    }
}
