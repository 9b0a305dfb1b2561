//! Mutation engine: nested input trees in, ordered statement sequences out.
//!
//! Every statement is one independent remote update call; the SPARQL
//! protocol offers no transaction spanning them. A failure partway through a
//! nested create leaves the already-committed statements in place, surfaces
//! the first error, and performs no compensation — that risk is part of the
//! contract, not something this module papers over.

mod create;
mod delete;
mod statements;
mod update;
mod validate;

use thiserror::Error;

use crate::model::{EntityId, EntityKind};
use crate::schema::RelationSpec;
use crate::scope::TenantScope;
use crate::transport::SparqlTransport;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MutationError {
    /// Rejected before any remote call.
    #[error("invalid input for '{field}': {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    #[error("entity {id} not found")]
    NotFound { id: EntityId },

    #[error("unknown relation '{field}' on {kind}")]
    UnknownRelation { kind: EntityKind, field: String },

    #[error("relation '{field}' on {kind} is read-only")]
    NotWritable { kind: EntityKind, field: String },
}

pub struct MutationEngine<'a> {
    transport: &'a dyn SparqlTransport,
    max_depth: usize,
}

impl<'a> MutationEngine<'a> {
    pub fn new(transport: &'a dyn SparqlTransport, max_depth: usize) -> Self {
        MutationEngine {
            transport,
            max_depth,
        }
    }

    /// Insert one relation edge between two existing entities.
    pub async fn link(
        &self,
        write: &TenantScope,
        kind: EntityKind,
        entity: &EntityId,
        field: &str,
        target: &EntityId,
    ) -> crate::error::Result<()> {
        let spec = self.writable_relation(kind, field)?;
        for statement in statements::edge_inserts(&write.graph, entity, spec, target) {
            self.transport.update(&statement).await?;
        }
        Ok(())
    }

    /// Remove one relation edge, leaving both entities in place.
    pub async fn unlink(
        &self,
        write: &TenantScope,
        kind: EntityKind,
        entity: &EntityId,
        field: &str,
        target: &EntityId,
    ) -> crate::error::Result<()> {
        let spec = self.writable_relation(kind, field)?;
        for statement in statements::edge_deletes(&write.graph, entity, spec, target) {
            self.transport.update(&statement).await?;
        }
        Ok(())
    }

    fn writable_relation(
        &self,
        kind: EntityKind,
        field: &str,
    ) -> Result<&'static RelationSpec, MutationError> {
        let spec = crate::schema::relation(kind, field).ok_or_else(|| {
            MutationError::UnknownRelation {
                kind,
                field: field.to_string(),
            }
        })?;
        if !spec.writable() {
            return Err(MutationError::NotWritable {
                kind,
                field: field.to_string(),
            });
        }
        Ok(spec)
    }
}
