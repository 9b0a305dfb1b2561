//! Identifier allocation.
//!
//! New identifiers embed the caller's tenant segment so every created entity
//! is addressable inside the right partition from the moment it exists. The
//! store is consulted before a candidate is handed out: an identifier that
//! already appears in any graph, in subject or object position, is discarded
//! and a fresh candidate drawn. When the store cannot be reached the
//! allocation fails; there is deliberately no local fallback, since a
//! colliding identifier would corrupt the graph silently while an outage is
//! loud and recoverable.

use uuid::Uuid;

use crate::error::{RepositoryError, Result};
use crate::model::EntityId;
use crate::scope::TenantScope;
use crate::transport::SparqlTransport;
use crate::vocab;

/// Attempts per allocation before giving up. Collisions on v4 identifiers
/// mean the store holds foreign data under our namespace; bailing out beats
/// spinning.
const MAX_ATTEMPTS: usize = 4;

pub struct IdAllocator<'a> {
    transport: &'a dyn SparqlTransport,
}

impl<'a> IdAllocator<'a> {
    pub fn new(transport: &'a dyn SparqlTransport) -> Self {
        IdAllocator { transport }
    }

    /// Mint an identifier unique within the store, scoped to the caller's
    /// tenant segment.
    pub async fn allocate(&self, scope: &TenantScope) -> Result<EntityId> {
        let prefix = vocab::tenant_entity_prefix(&scope.tenant);
        for _ in 0..MAX_ATTEMPTS {
            let candidate = EntityId::new(format!("{prefix}{}", Uuid::new_v4()))
                .map_err(|e| RepositoryError::Allocation(e.to_string()))?;
            if !self.is_known(&candidate).await? {
                tracing::debug!(id = %candidate, "allocated identifier");
                return Ok(candidate);
            }
            tracing::warn!(id = %candidate, "identifier collision, drawing a fresh candidate");
        }
        Err(RepositoryError::Allocation(format!(
            "no unique identifier after {MAX_ATTEMPTS} attempts under {prefix}"
        )))
    }

    /// True when the identifier already occurs anywhere in the store, in any
    /// graph, as subject or object.
    async fn is_known(&self, id: &EntityId) -> Result<bool> {
        let term = id.as_term();
        let query = format!(
            "ASK {{ {{ {term} ?p ?o }} UNION {{ ?s ?p {term} }} \
             UNION {{ GRAPH ?g {{ {term} ?p ?o }} }} UNION {{ GRAPH ?h {{ ?s ?p {term} }} }} }}"
        );
        Ok(self.transport.ask(&query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    fn scope() -> TenantScope {
        TenantScope {
            tenant: "acme".into(),
            graph: vocab::tenant_graph("acme"),
        }
    }

    #[tokio::test]
    async fn allocated_ids_carry_the_tenant_segment() {
        let transport = MemoryTransport::new().unwrap();
        let allocator = IdAllocator::new(&transport);
        let id = allocator.allocate(&scope()).await.unwrap();
        assert!(
            id.as_str()
                .starts_with("https://w3id.org/plantgraph/entity/acme/")
        );
    }

    #[tokio::test]
    async fn consecutive_allocations_differ() {
        let transport = MemoryTransport::new().unwrap();
        let allocator = IdAllocator::new(&transport);
        let a = allocator.allocate(&scope()).await.unwrap();
        let b = allocator.allocate(&scope()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn known_identifier_is_detected() {
        let transport = MemoryTransport::new().unwrap();
        transport
            .update(
                "INSERT DATA { GRAPH <https://w3id.org/plantgraph/graph/acme> { \
                 <https://w3id.org/plantgraph/entity/acme/taken> \
                 <https://w3id.org/plantgraph#sourceId> \"1\" } }",
            )
            .await
            .unwrap();
        let allocator = IdAllocator::new(&transport);
        let taken = EntityId::new("https://w3id.org/plantgraph/entity/acme/taken").unwrap();
        assert!(allocator.is_known(&taken).await.unwrap());
    }
}
