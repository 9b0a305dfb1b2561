//! Create: nested input trees become statement sequences.

use crate::alloc::IdAllocator;
use crate::error::Result;
use crate::input::InputNode;
use crate::model::EntityId;
use crate::sanitize;
use crate::schema;
use crate::scope::TenantScope;

use super::{MutationEngine, MutationError, statements, validate};

impl MutationEngine<'_> {
    /// Create the input tree in the caller's partition and return the root
    /// identifier.
    ///
    /// An input that already carries an identifier is a reference, not a
    /// create: nothing is inserted and every other field on that node is
    /// ignored. This holds for the root and for every nested node — callers
    /// attaching data to a referenced node will lose it silently, which is
    /// the documented (and surprising) reference semantics of the API.
    pub async fn create(&self, write: &TenantScope, root: &InputNode) -> Result<EntityId> {
        validate::validate_tree(root, self.max_depth, false)?;

        if let Some(id) = &root.id {
            tracing::debug!(id = %id, "create input carries an identifier; reusing it verbatim");
            return Ok(id.clone());
        }

        let allocator = IdAllocator::new(self.transport);
        let root_id = allocator.allocate(write).await?;
        tracing::info!(id = %root_id, kind = %root.kind, "creating entity tree");

        // Explicit stack instead of recursion; node statements go out as
        // they are popped, edge statements only after every node they touch
        // exists.
        let mut stack: Vec<(&InputNode, EntityId)> = vec![(root, root_id.clone())];
        let mut edge_statements: Vec<String> = Vec::new();

        while let Some((node, id)) = stack.pop() {
            let statement = self.node_insert(write, node, &id)?;
            self.transport.update(&statement).await?;

            for relation in &node.relations {
                let spec = schema::relation(node.kind, relation.field).ok_or_else(|| {
                    MutationError::UnknownRelation {
                        kind: node.kind,
                        field: relation.field.to_string(),
                    }
                })?;
                for child in &relation.nodes {
                    let child_id = match &child.id {
                        Some(existing) => existing.clone(),
                        None => {
                            let fresh = allocator.allocate(write).await?;
                            stack.push((child, fresh.clone()));
                            fresh
                        }
                    };
                    edge_statements.extend(statements::edge_inserts(
                        &write.graph,
                        &id,
                        spec,
                        &child_id,
                    ));
                }
            }
        }

        for statement in edge_statements {
            self.transport.update(&statement).await?;
        }

        Ok(root_id)
    }

    /// One INSERT DATA covering the node's type marker and its non-blank
    /// scalars.
    fn node_insert(
        &self,
        write: &TenantScope,
        node: &InputNode,
        id: &EntityId,
    ) -> Result<String> {
        let mut triples = vec![statements::type_triple(id, node.kind.type_marker())];

        for scalar in &node.scalars {
            let Some(spec) = schema::scalars(node.kind)
                .iter()
                .find(|spec| spec.field == scalar.field)
            else {
                continue;
            };
            // Blank and absent values are skipped on create; a language code
            // without text has nothing to tag.
            let Some(text) = scalar.text.as_deref().filter(|text| !text.trim().is_empty())
            else {
                continue;
            };
            let language = if spec.lang_tagged {
                scalar.language.as_deref()
            } else {
                None
            };
            let literal = sanitize::literal_term(text, language)?;
            triples.push(statements::literal_triple(id, spec.predicate, &literal));
        }

        Ok(statements::insert_data(&write.graph, &triples))
    }
}
