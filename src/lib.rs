//! plantgraph: typed repository engine for an industrial knowledge graph
//! stored as RDF in a SPARQL 1.1 triple store.
//!
//! The crate reconstructs typed, deduplicated object graphs out of cyclic
//! triple data (hydration) and turns nested input trees into ordered
//! insert/delete statement sequences (mutation), with tenant-scoped named
//! graph addressing and store-checked identifier allocation. The GraphQL
//! surface, authorization wiring and the concrete store deployment live in
//! other services; everything here speaks plain SPARQL through a thin
//! transport.

pub mod alloc;
pub mod binding;
pub mod catalog;
pub mod config;
pub mod error;
pub mod hydrate;
pub mod input;
pub mod logging;
pub mod model;
pub mod mutate;
pub mod repository;
pub mod sanitize;
pub mod schema;
pub mod scope;
pub mod transport;
pub mod vocab;

pub use config::StoreConfig;
pub use error::{RepositoryError, Result};
pub use logging::{LogFormat, LoggingConfig, init_logging};
pub use model::{AnyEntity, EntityId, EntityKind, LangString, Linked};
pub use repository::GraphRepository;
pub use scope::Caller;
pub use transport::{HttpTransport, MemoryTransport, SparqlTransport};
