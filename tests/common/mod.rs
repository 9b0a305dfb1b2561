//! Shared fixtures for the integration suites: an in-memory store behind the
//! real repository, plus raw triple helpers for seeding data the way a
//! long-lived deployment would have accumulated it.

#![allow(dead_code)]

use plantgraph::{Caller, EntityId, GraphRepository, MemoryTransport, SparqlTransport, vocab};

pub const TENANT: &str = "acme";

pub fn graph() -> String {
    vocab::tenant_graph(TENANT)
}

pub fn repo() -> GraphRepository<MemoryTransport> {
    GraphRepository::new(MemoryTransport::new().expect("create memory store"))
}

pub fn repo_with_depth(depth: usize) -> GraphRepository<MemoryTransport> {
    GraphRepository::with_max_depth(MemoryTransport::new().expect("create memory store"), depth)
}

pub fn caller() -> Caller {
    Caller::new("integration-tests", vec![TENANT.to_string()])
}

pub fn eid(name: &str) -> EntityId {
    EntityId::new(format!("{}{}/{name}", vocab::ENTITY_NS, TENANT)).expect("valid entity id")
}

pub fn class_of(id: &EntityId, class: &str) -> String {
    format!("{} <{}> <{class}>", id.as_term(), vocab::RDF_TYPE)
}

pub fn edge(subject: &EntityId, predicate: &str, object: &EntityId) -> String {
    format!("{} <{predicate}> {}", subject.as_term(), object.as_term())
}

pub fn lit(subject: &EntityId, predicate: &str, text: &str, language: Option<&str>) -> String {
    match language {
        Some(language) => format!("{} <{predicate}> \"{text}\"@{language}", subject.as_term()),
        None => format!("{} <{predicate}> \"{text}\"", subject.as_term()),
    }
}

/// Seed raw triples into the tenant graph, bypassing the mutation engine.
pub async fn insert(repo: &GraphRepository<MemoryTransport>, triples: &[String]) {
    let body = triples
        .iter()
        .map(|triple| format!("{triple} ."))
        .collect::<Vec<_>>()
        .join(" ");
    repo.transport()
        .update(&format!(
            "INSERT DATA {{ GRAPH <{}> {{ {body} }} }}",
            graph()
        ))
        .await
        .expect("seed triples");
}

pub async fn ask(repo: &GraphRepository<MemoryTransport>, pattern: &str) -> bool {
    repo.transport()
        .ask(&format!("ASK {{ GRAPH <{}> {{ {pattern} }} }}", graph()))
        .await
        .expect("ask")
}
