//! Update: partial patches become delete/insert pairs per touched predicate.

use std::collections::VecDeque;

use crate::error::Result;
use crate::hydrate::{HydrationEngine, RawEntity};
use crate::input::InputNode;
use crate::model::EntityId;
use crate::sanitize;
use crate::schema::{self, FetchKind};
use crate::scope::{ReadScope, TenantScope};

use super::{MutationEngine, MutationError, statements, validate};

impl MutationEngine<'_> {
    /// Apply a partial patch to `id`, recursing into nested relation entries
    /// (create-and-link without id, patch with id). Omitted fields stay
    /// untouched; omitted relation entries are never unlinked, except where
    /// the relation is declared full-replace.
    pub async fn update(
        &self,
        write: &TenantScope,
        read: &ReadScope,
        id: &EntityId,
        root: &InputNode,
    ) -> Result<()> {
        validate::validate_tree(root, self.max_depth, true)?;

        let mut queue: VecDeque<(EntityId, &InputNode)> = VecDeque::new();
        queue.push_back((id.clone(), root));

        while let Some((id, node)) = queue.pop_front() {
            self.apply_patch(write, read, &id, node, &mut queue).await?;
        }
        Ok(())
    }

    async fn apply_patch<'t>(
        &self,
        write: &TenantScope,
        read: &ReadScope,
        id: &EntityId,
        node: &'t InputNode,
        queue: &mut VecDeque<(EntityId, &'t InputNode)>,
    ) -> Result<()> {
        let hydration = HydrationEngine::new(self.transport, self.max_depth);
        let current = hydration
            .fetch_raw(id, FetchKind::Exact(node.kind), read)
            .await?
            .ok_or_else(|| MutationError::NotFound { id: id.clone() })?;

        tracing::debug!(id = %id, kind = %node.kind, "patching entity");
        self.patch_scalars(write, id, node, &current).await?;

        for relation in &node.relations {
            let spec = schema::relation(node.kind, relation.field).ok_or_else(|| {
                MutationError::UnknownRelation {
                    kind: node.kind,
                    field: relation.field.to_string(),
                }
            })?;

            // Full-replace relations drop the stored link before the new one
            // goes in; everything else merges.
            if spec.full_replace {
                for existing in current.edge(spec.field) {
                    for statement in
                        statements::edge_deletes(&write.graph, id, spec, existing)
                    {
                        self.transport.update(&statement).await?;
                    }
                }
            }

            for child in &relation.nodes {
                match &child.id {
                    Some(child_id) => {
                        let already_linked =
                            current.edge(spec.field).any(|target| target == child_id);
                        if !already_linked {
                            for statement in
                                statements::edge_inserts(&write.graph, id, spec, child_id)
                            {
                                self.transport.update(&statement).await?;
                            }
                        }
                        queue.push_back((child_id.clone(), child));
                    }
                    None => {
                        let created = self.create(write, child).await?;
                        for statement in
                            statements::edge_inserts(&write.graph, id, spec, &created)
                        {
                            self.transport.update(&statement).await?;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Delete-then-insert per supplied scalar, with the language-tag
    /// preservation rules:
    /// - text without a tag keeps the tag already on file;
    /// - a tag without text re-inserts the stored text under the new tag,
    ///   and is a no-op when no text is stored;
    /// - blank text clears the predicate without re-inserting.
    async fn patch_scalars(
        &self,
        write: &TenantScope,
        id: &EntityId,
        node: &InputNode,
        current: &RawEntity,
    ) -> Result<()> {
        for scalar in &node.scalars {
            let Some(spec) = schema::scalars(node.kind)
                .iter()
                .find(|spec| spec.field == scalar.field)
            else {
                continue;
            };
            let stored = current.scalar(spec.field);

            let (text, language) = if spec.lang_tagged {
                match (scalar.text.as_deref(), scalar.language.as_deref()) {
                    (Some(text), Some(language)) => {
                        (text.to_string(), Some(language.to_string()))
                    }
                    (Some(text), None) => (
                        text.to_string(),
                        stored.and_then(|value| value.language.clone()),
                    ),
                    (None, Some(language)) => match stored {
                        Some(value) => (value.text.clone(), Some(language.to_string())),
                        None => continue,
                    },
                    (None, None) => continue,
                }
            } else {
                match scalar.text.as_deref() {
                    Some(text) => (text.to_string(), None),
                    None => continue,
                }
            };

            self.transport
                .update(&statements::delete_predicate(
                    &write.graph,
                    id,
                    spec.predicate,
                ))
                .await?;

            if !text.trim().is_empty() {
                let literal = sanitize::literal_term(&text, language.as_deref())?;
                self.transport
                    .update(&statements::insert_data(
                        &write.graph,
                        &[statements::literal_triple(id, spec.predicate, &literal)],
                    ))
                    .await?;
            }
        }
        Ok(())
    }
}
