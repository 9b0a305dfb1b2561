//! Rendering of single update statements.
//!
//! Everything here returns complete SPARQL Update strings, each meant to be
//! executed as its own remote call. Subjects and objects are validated
//! [`EntityId`]s, predicates are vocabulary constants, literals come
//! pre-escaped from the sanitizer.

use crate::model::EntityId;
use crate::schema::{Direction, RelationSpec};
use crate::vocab;

pub(crate) fn type_triple(id: &EntityId, marker: &str) -> String {
    format!("{} <{}> <{marker}>", id.as_term(), vocab::RDF_TYPE)
}

pub(crate) fn literal_triple(id: &EntityId, predicate: &str, literal: &str) -> String {
    format!("{} <{predicate}> {literal}", id.as_term())
}

pub(crate) fn insert_data(graph: &str, triples: &[String]) -> String {
    let body = triples
        .iter()
        .map(|triple| format!("{triple} ."))
        .collect::<Vec<_>>()
        .join(" ");
    format!("INSERT DATA {{ GRAPH <{graph}> {{ {body} }} }}")
}

/// Remove every triple with `id` as subject. Incoming references are left
/// alone; dangling edges are a documented consequence of delete.
pub(crate) fn delete_subject(graph: &str, id: &EntityId) -> String {
    format!(
        "DELETE WHERE {{ GRAPH <{graph}> {{ {} ?p ?o }} }}",
        id.as_term()
    )
}

/// Remove every value of one predicate on `id`, ahead of a re-insert.
pub(crate) fn delete_predicate(graph: &str, id: &EntityId, predicate: &str) -> String {
    format!(
        "DELETE WHERE {{ GRAPH <{graph}> {{ {} <{predicate}> ?o }} }}",
        id.as_term()
    )
}

fn delete_data(graph: &str, triple: &str) -> String {
    format!("DELETE DATA {{ GRAPH <{graph}> {{ {triple} }} }}")
}

/// Statements inserting one relation edge, honoring storage direction and
/// the redundant inverse where the family keeps one. One statement each.
pub(crate) fn edge_inserts(
    graph: &str,
    entity: &EntityId,
    spec: &RelationSpec,
    target: &EntityId,
) -> Vec<String> {
    let mut statements = Vec::with_capacity(2);
    match spec.direction {
        Direction::Forward => {
            statements.push(insert_data(
                graph,
                &[format!(
                    "{} <{}> {}",
                    entity.as_term(),
                    spec.predicate,
                    target.as_term()
                )],
            ));
            if let Some(inverse) = spec.inverse_predicate {
                statements.push(insert_data(
                    graph,
                    &[format!(
                        "{} <{inverse}> {}",
                        target.as_term(),
                        entity.as_term()
                    )],
                ));
            }
        }
        Direction::Reverse => {
            statements.push(insert_data(
                graph,
                &[format!(
                    "{} <{}> {}",
                    target.as_term(),
                    spec.predicate,
                    entity.as_term()
                )],
            ));
        }
        Direction::ReversePath(_) => {
            // Read-only relations never reach the renderer; validation
            // rejects them first.
        }
    }
    statements
}

/// Statements removing one relation edge, mirroring [`edge_inserts`].
pub(crate) fn edge_deletes(
    graph: &str,
    entity: &EntityId,
    spec: &RelationSpec,
    target: &EntityId,
) -> Vec<String> {
    let mut statements = Vec::with_capacity(2);
    match spec.direction {
        Direction::Forward => {
            statements.push(delete_data(
                graph,
                &format!(
                    "{} <{}> {}",
                    entity.as_term(),
                    spec.predicate,
                    target.as_term()
                ),
            ));
            if let Some(inverse) = spec.inverse_predicate {
                statements.push(delete_data(
                    graph,
                    &format!(
                        "{} <{inverse}> {}",
                        target.as_term(),
                        entity.as_term()
                    ),
                ));
            }
        }
        Direction::Reverse => {
            statements.push(delete_data(
                graph,
                &format!(
                    "{} <{}> {}",
                    target.as_term(),
                    spec.predicate,
                    entity.as_term()
                ),
            ));
        }
        Direction::ReversePath(_) => {}
    }
    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;
    use crate::schema::{self, TargetKind};

    fn id(n: &str) -> EntityId {
        EntityId::new(format!("https://w3id.org/plantgraph/entity/t/{n}")).unwrap()
    }

    #[test]
    fn insert_data_wraps_the_target_graph() {
        let statement = insert_data(
            "https://w3id.org/plantgraph/graph/t",
            &[type_triple(&id("e1"), vocab::CLASS_FACTORY)],
        );
        assert!(statement.starts_with("INSERT DATA { GRAPH <https://w3id.org/plantgraph/graph/t>"));
        assert!(statement.contains(vocab::CLASS_FACTORY));
    }

    #[test]
    fn paired_relations_emit_two_statements() {
        let spec = schema::relation(EntityKind::Process, "childProcesses").unwrap();
        let statements = edge_inserts("https://g", &id("parent"), spec, &id("child"));
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains(vocab::REL_CONTAINS));
        assert!(statements[1].contains(vocab::REL_CONTAINED_IN));
    }

    #[test]
    fn reverse_relations_flip_the_subject() {
        let spec = schema::relation(EntityKind::Factory, "enterprise").unwrap();
        assert_eq!(spec.target, TargetKind::Exact(EntityKind::Enterprise));
        let statements = edge_inserts("https://g", &id("factory"), spec, &id("enterprise"));
        assert_eq!(statements.len(), 1);
        assert!(
            statements[0].contains(&format!(
                "{} <{}> {}",
                id("enterprise").as_term(),
                vocab::REL_HAS,
                id("factory").as_term()
            ))
        );
    }

    #[test]
    fn edge_deletes_mirror_edge_inserts() {
        let spec = schema::relation(EntityKind::Capability, "parentCapabilities").unwrap();
        let inserts = edge_inserts("https://g", &id("child"), spec, &id("parent"));
        let deletes = edge_deletes("https://g", &id("child"), spec, &id("parent"));
        assert_eq!(inserts.len(), deletes.len());
        assert!(deletes[0].starts_with("DELETE DATA"));
    }
}
