//! The entity query catalog: one parameterized wide SELECT per entity kind.
//!
//! The rendered query binds the entity's full scalar set plus one OPTIONAL
//! column per relation family, so the result is a denormalized join: scalars
//! repeat on every row, and each row carries at most one match per relation
//! column. The hydration engine folds that shape back into a single object.
//!
//! All IRIs entering the text are either vocabulary constants or validated
//! [`EntityId`]s; caller-supplied strings never reach the renderer.

use crate::model::EntityId;
use crate::schema::{self, Direction, FetchKind, TargetKind};
use crate::scope::ReadScope;
use crate::vocab;

/// Render the wide SELECT for one entity under one read scope.
pub fn wide_select(fetch: FetchKind, id: &EntityId, scope: &ReadScope) -> String {
    let entity = id.as_term();
    let mut ordinal = 0usize;
    let mut blocks: Vec<String> = Vec::new();

    let type_pattern = format!(
        "{entity} <{rdf_type}> ?type . FILTER(?type IN ({markers}))",
        rdf_type = vocab::RDF_TYPE,
        markers = marker_list(fetch.markers()),
    );
    blocks.push(scope.graph_pattern(&type_pattern, next(&mut ordinal)));

    for scalar in schema::fetch_scalars(fetch) {
        let pattern = format!(
            "{entity} <{predicate}> ?{field}",
            predicate = scalar.predicate,
            field = scalar.field,
        );
        blocks.push(format!(
            "OPTIONAL {{ {} }}",
            scope.graph_pattern(&pattern, next(&mut ordinal))
        ));
    }

    for relation in schema::fetch_relations(fetch) {
        let field = relation.field;
        let type_constraint = target_constraint(field, relation.target);
        let pattern = match relation.direction {
            Direction::Forward => format!(
                "{entity} <{predicate}> ?{field} . {type_constraint}",
                predicate = relation.predicate,
            ),
            Direction::Reverse => format!(
                "?{field} <{predicate}> {entity} . {type_constraint}",
                predicate = relation.predicate,
            ),
            Direction::ReversePath(second_hop) => format!(
                "?{field} <{predicate}>/<{second_hop}> {entity} . {type_constraint}",
                predicate = relation.predicate,
            ),
        };
        blocks.push(format!(
            "OPTIONAL {{ {} }}",
            scope.graph_pattern(&pattern, next(&mut ordinal))
        ));
    }

    let from = scope
        .from_clause()
        .map(|clause| format!("{clause} "))
        .unwrap_or_default();
    format!("SELECT * {from}WHERE {{\n  {}\n}}", blocks.join("\n  "))
}

/// Subjects reachable from `id` over the ownership predicates within one
/// graph, at one and two hops. Feeds the bounded cascade delete; deliberately
/// not a transitive closure.
pub fn ownership_closure_select(id: &EntityId, graph: &str) -> String {
    let entity = id.as_term();
    let owns = format!("<{}>|<{}>", vocab::REL_HAS, vocab::REL_CONTAINS);
    format!(
        "SELECT DISTINCT ?x WHERE {{ GRAPH <{graph}> {{ \
         {{ {entity} {owns} ?x }} UNION {{ {entity} ({owns})/({owns}) ?x }} \
         }} FILTER(isIRI(?x)) }}"
    )
}

fn next(ordinal: &mut usize) -> usize {
    *ordinal += 1;
    *ordinal
}

fn marker_list(markers: &[&str]) -> String {
    markers
        .iter()
        .map(|marker| format!("<{marker}>"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn target_constraint(field: &str, target: TargetKind) -> String {
    match target.markers() {
        [single] => format!(
            "?{field} <{rdf_type}> <{single}>",
            rdf_type = vocab::RDF_TYPE
        ),
        markers => format!(
            "?{field} <{rdf_type}> ?{field}Kind . FILTER(?{field}Kind IN ({list}))",
            rdf_type = vocab::RDF_TYPE,
            list = marker_list(markers),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;
    use crate::scope::{ReadScope, TenantScope};

    fn id() -> EntityId {
        EntityId::new("https://w3id.org/plantgraph/entity/acme/e1").unwrap()
    }

    fn tenant_scope() -> ReadScope {
        ReadScope::Tenant(TenantScope {
            tenant: "acme".into(),
            graph: vocab::tenant_graph("acme"),
        })
    }

    #[test]
    fn tenant_query_scopes_with_from() {
        let query = wide_select(FetchKind::Exact(EntityKind::Enterprise), &id(), &tenant_scope());
        assert!(query.contains("FROM <https://w3id.org/plantgraph/graph/acme>"));
        assert!(!query.contains("GRAPH ?g"));
        assert!(query.contains("?factories"));
        assert!(query.contains("OPTIONAL"));
    }

    #[test]
    fn shared_query_matches_any_named_graph_per_block() {
        let query = wide_select(
            FetchKind::Exact(EntityKind::Enterprise),
            &id(),
            &ReadScope::AllTenants,
        );
        assert!(!query.contains("FROM"));
        assert!(query.contains("GRAPH ?g1"));
        assert!(query.contains("GRAPH ?g2"));
    }

    #[test]
    fn resource_fetch_filters_both_variants() {
        let query = wide_select(FetchKind::Resource, &id(), &tenant_scope());
        assert!(query.contains(vocab::CLASS_MACHINE));
        assert!(query.contains(vocab::CLASS_HUMAN_RESOURCE));
        assert!(query.contains("?certificates"));
    }

    #[test]
    fn reverse_relations_flip_subject_and_object() {
        let query = wide_select(FetchKind::Exact(EntityKind::Factory), &id(), &tenant_scope());
        assert!(query.contains(&format!(
            "?enterprise <{}> {}",
            vocab::REL_HAS,
            id().as_term()
        )));
    }

    #[test]
    fn product_reads_supply_chains_over_two_hops() {
        let query = wide_select(FetchKind::Exact(EntityKind::Product), &id(), &tenant_scope());
        assert!(query.contains(&format!(
            "?supplyChains <{has}>/<{has}> {id}",
            has = vocab::REL_HAS,
            id = id().as_term()
        )));
    }

    #[test]
    fn closure_select_is_bounded_to_two_hops() {
        let query = ownership_closure_select(&id(), &vocab::tenant_graph("acme"));
        assert!(query.contains("UNION"));
        assert!(!query.contains('*'), "closure must not be transitive: {query}");
    }
}
