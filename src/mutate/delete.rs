//! Delete and bounded cascade delete, both verified by re-reading.

use crate::catalog;
use crate::error::Result;
use crate::hydrate::HydrationEngine;
use crate::model::EntityId;
use crate::schema::FetchKind;
use crate::scope::{ReadScope, TenantScope};

use super::{MutationEngine, statements};

impl MutationEngine<'_> {
    /// Remove every triple with `id` as subject, then confirm by re-reading
    /// rather than trusting the update response. `Ok(true)` means the entity
    /// is gone — including the case where it never existed.
    pub async fn delete(
        &self,
        write: &TenantScope,
        read: &ReadScope,
        id: &EntityId,
        fetch: FetchKind,
    ) -> Result<bool> {
        tracing::info!(id = %id, "deleting entity");
        self.transport
            .update(&statements::delete_subject(&write.graph, id))
            .await?;

        let hydration = HydrationEngine::new(self.transport, self.max_depth);
        let still_present = hydration.fetch_raw(id, fetch, read).await?.is_some();
        if still_present {
            tracing::warn!(id = %id, "entity still present after delete");
        }
        Ok(!still_present)
    }

    /// Cascade over the ownership predicates at one and two hops, then
    /// delete `id` itself. The cascade is fixed-depth on purpose: a full
    /// reachability closure over `has`/`contains` could walk across far more
    /// of the partition than the caller intended to give up.
    pub async fn bulk_delete(
        &self,
        write: &TenantScope,
        read: &ReadScope,
        id: &EntityId,
        fetch: FetchKind,
    ) -> Result<bool> {
        let closure = catalog::ownership_closure_select(id, &write.graph);
        let rows = self.transport.select(&closure).await?;
        tracing::info!(id = %id, owned = rows.len(), "cascade deleting owned entities");

        for row in rows {
            let Some(target) = row.iri_opt("x")? else {
                continue;
            };
            if target == *id {
                continue;
            }
            self.transport
                .update(&statements::delete_subject(&write.graph, &target))
                .await?;
        }

        self.delete(write, read, id, fetch).await
    }
}
