//! Thin SPARQL transport.
//!
//! The engines above this layer only ever see [`SparqlTransport`]: one
//! `select`, one `ask`, one `update`, each a single remote call. There is no
//! batching and no transaction surface because the SPARQL 1.1 protocol offers
//! none; partial failure across a statement sequence is the caller's
//! documented risk.
//!
//! Two implementations ship: [`HttpTransport`] speaks the protocol against a
//! remote store, [`MemoryTransport`] runs an embedded `oxigraph` store and
//! backs the integration tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use oxigraph::model::{BlankNode, Literal, NamedNode, Term};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use serde::Deserialize;
use thiserror::Error;

use crate::binding::Row;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("store returned HTTP {status} from {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("malformed results document: {0}")]
    MalformedResults(String),

    #[error("unexpected result form: expected {expected}")]
    UnexpectedForm { expected: &'static str },

    #[error("embedded store error: {0}")]
    Embedded(String),
}

/// One blocking remote call per method; connections are acquired per request
/// and released on every exit path.
#[async_trait]
pub trait SparqlTransport: Send + Sync {
    async fn select(&self, query: &str) -> Result<Vec<Row>, TransportError>;

    async fn ask(&self, query: &str) -> Result<bool, TransportError>;

    async fn update(&self, update: &str) -> Result<(), TransportError>;
}

// =============================================================================
// HTTP transport (SPARQL 1.1 protocol)
// =============================================================================

pub struct HttpTransport {
    client: reqwest::Client,
    query_endpoint: String,
    update_endpoint: String,
}

impl HttpTransport {
    pub fn new(
        query_endpoint: impl Into<String>,
        update_endpoint: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let query_endpoint = query_endpoint.into();
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|source| TransportError::Http {
                endpoint: query_endpoint.clone(),
                source,
            })?;
        Ok(HttpTransport {
            client,
            query_endpoint,
            update_endpoint: update_endpoint.into(),
        })
    }

    async fn run_query(&self, query: &str) -> Result<ResultsDocument, TransportError> {
        let response = self
            .client
            .post(&self.query_endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/sparql-query")
            .header(reqwest::header::ACCEPT, "application/sparql-results+json")
            .body(query.to_string())
            .send()
            .await
            .map_err(|source| TransportError::Http {
                endpoint: self.query_endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                endpoint: self.query_endpoint.clone(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ResultsDocument>()
            .await
            .map_err(|source| TransportError::Http {
                endpoint: self.query_endpoint.clone(),
                source,
            })
    }
}

#[async_trait]
impl SparqlTransport for HttpTransport {
    async fn select(&self, query: &str) -> Result<Vec<Row>, TransportError> {
        tracing::debug!(endpoint = %self.query_endpoint, "executing select");
        let document = self.run_query(query).await?;
        let results = document
            .results
            .ok_or(TransportError::UnexpectedForm { expected: "bindings" })?;
        results
            .bindings
            .into_iter()
            .map(|solution| {
                let pairs = solution
                    .into_iter()
                    .map(|(var, term)| Ok((var, term.into_term()?)))
                    .collect::<Result<Vec<_>, TransportError>>()?;
                Ok(Row::from_pairs(pairs))
            })
            .collect()
    }

    async fn ask(&self, query: &str) -> Result<bool, TransportError> {
        tracing::debug!(endpoint = %self.query_endpoint, "executing ask");
        let document = self.run_query(query).await?;
        document
            .boolean
            .ok_or(TransportError::UnexpectedForm { expected: "boolean" })
    }

    async fn update(&self, update: &str) -> Result<(), TransportError> {
        tracing::debug!(endpoint = %self.update_endpoint, "executing update");
        let response = self
            .client
            .post(&self.update_endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/sparql-update")
            .body(update.to_string())
            .send()
            .await
            .map_err(|source| TransportError::Http {
                endpoint: self.update_endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                endpoint: self.update_endpoint.clone(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// `application/sparql-results+json` document shape.
#[derive(Debug, Deserialize)]
struct ResultsDocument {
    #[allow(dead_code)]
    #[serde(default)]
    head: ResultsHead,
    #[serde(default)]
    results: Option<ResultsBindings>,
    #[serde(default)]
    boolean: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct ResultsHead {
    #[serde(default)]
    #[allow(dead_code)]
    vars: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ResultsBindings {
    bindings: Vec<HashMap<String, JsonTerm>>,
}

#[derive(Debug, Deserialize)]
struct JsonTerm {
    #[serde(rename = "type")]
    term_type: String,
    value: String,
    #[serde(rename = "xml:lang")]
    language: Option<String>,
    datatype: Option<String>,
}

impl JsonTerm {
    fn into_term(self) -> Result<Term, TransportError> {
        let malformed = |what: &str, detail: String| {
            TransportError::MalformedResults(format!("{what}: {detail}"))
        };
        match self.term_type.as_str() {
            "uri" => NamedNode::new(&self.value)
                .map(Term::NamedNode)
                .map_err(|e| malformed("invalid IRI", e.to_string())),
            "bnode" => BlankNode::new(&self.value)
                .map(Term::BlankNode)
                .map_err(|e| malformed("invalid blank node id", e.to_string())),
            "literal" | "typed-literal" => {
                if let Some(language) = self.language {
                    Literal::new_language_tagged_literal(self.value, &language)
                        .map(Term::Literal)
                        .map_err(|e| malformed("invalid language tag", e.to_string()))
                } else if let Some(datatype) = self.datatype {
                    let datatype = NamedNode::new(&datatype)
                        .map_err(|e| malformed("invalid datatype IRI", e.to_string()))?;
                    Ok(Term::Literal(Literal::new_typed_literal(
                        self.value, datatype,
                    )))
                } else {
                    Ok(Term::Literal(Literal::new_simple_literal(self.value)))
                }
            }
            other => Err(malformed("unknown term type", other.to_string())),
        }
    }
}

// =============================================================================
// Embedded transport
// =============================================================================

/// In-process store used by the test suites and for embedded deployments.
#[derive(Clone)]
pub struct MemoryTransport {
    store: Store,
}

impl MemoryTransport {
    pub fn new() -> Result<Self, TransportError> {
        let store = Store::new().map_err(|e| TransportError::Embedded(e.to_string()))?;
        Ok(MemoryTransport { store })
    }

    /// Direct access to the backing store, for test fixtures.
    pub fn store(&self) -> &Store {
        &self.store
    }
}

#[async_trait]
impl SparqlTransport for MemoryTransport {
    async fn select(&self, query: &str) -> Result<Vec<Row>, TransportError> {
        let results = self
            .store
            .query(query)
            .map_err(|e| TransportError::Embedded(e.to_string()))?;
        let QueryResults::Solutions(solutions) = results else {
            return Err(TransportError::UnexpectedForm { expected: "bindings" });
        };
        let mut rows = Vec::new();
        for solution in solutions {
            let solution = solution.map_err(|e| TransportError::Embedded(e.to_string()))?;
            rows.push(Row::from_pairs(
                solution
                    .iter()
                    .map(|(var, term)| (var.as_str().to_string(), term.clone())),
            ));
        }
        Ok(rows)
    }

    async fn ask(&self, query: &str) -> Result<bool, TransportError> {
        let results = self
            .store
            .query(query)
            .map_err(|e| TransportError::Embedded(e.to_string()))?;
        match results {
            QueryResults::Boolean(value) => Ok(value),
            _ => Err(TransportError::UnexpectedForm { expected: "boolean" }),
        }
    }

    async fn update(&self, update: &str) -> Result<(), TransportError> {
        self.store
            .update(update)
            .map_err(|e| TransportError::Embedded(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_transport_round_trips_rows() {
        let transport = MemoryTransport::new().unwrap();
        transport
            .update(
                "INSERT DATA { GRAPH <https://w3id.org/plantgraph/graph/t> { \
                 <https://w3id.org/plantgraph/entity/t/a> \
                 <https://w3id.org/plantgraph#sourceId> \"X-1\" } }",
            )
            .await
            .unwrap();

        let rows = transport
            .select(
                "SELECT ?s ?v FROM <https://w3id.org/plantgraph/graph/t> WHERE { \
                 ?s <https://w3id.org/plantgraph#sourceId> ?v }",
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].literal_opt("v").unwrap().as_deref(), Some("X-1"));
    }

    #[tokio::test]
    async fn ask_reports_presence() {
        let transport = MemoryTransport::new().unwrap();
        assert!(
            !transport
                .ask("ASK { GRAPH ?g { ?s ?p ?o } }")
                .await
                .unwrap()
        );
    }

    #[test]
    fn json_terms_map_to_oxigraph_terms() {
        let term = JsonTerm {
            term_type: "literal".into(),
            value: "Walzwerk".into(),
            language: Some("de".into()),
            datatype: None,
        }
        .into_term()
        .unwrap();
        match term {
            Term::Literal(lit) => assert_eq!(lit.language(), Some("de")),
            other => panic!("unexpected term {other:?}"),
        }
    }
}
