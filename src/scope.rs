//! Tenant-scoped graph addressing.
//!
//! Every write targets exactly one named graph: the caller's own tenant
//! partition. Reads target that partition, or the union of all tenant
//! partitions when the caller carries the shared-read capability. Membership
//! in zero or several tenant groups is rejected here, before any graph IRI is
//! computed or any remote call is made.

use thiserror::Error;

use crate::sanitize::{self, SanitizeError};
use crate::vocab;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("caller '{subject}' belongs to no tenant group")]
    NoTenancy { subject: String },

    #[error("caller '{subject}' belongs to {count} tenant groups; exactly one is required")]
    AmbiguousTenancy { subject: String, count: usize },

    #[error("tenant segment rejected: {0}")]
    InvalidTenant(#[from] SanitizeError),
}

/// Identity of the caller as handed down by the (out-of-scope) API layer.
#[derive(Debug, Clone)]
pub struct Caller {
    pub subject: String,
    pub groups: Vec<String>,
    /// Capability flag: read across all tenant partitions.
    pub shared_read: bool,
}

impl Caller {
    pub fn new(subject: impl Into<String>, groups: Vec<String>) -> Self {
        Caller {
            subject: subject.into(),
            groups,
            shared_read: false,
        }
    }

    pub fn with_shared_read(mut self) -> Self {
        self.shared_read = true;
        self
    }
}

/// The single partition all writes of one caller land in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantScope {
    pub tenant: String,
    pub graph: String,
}

/// The partition set a read operates against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadScope {
    Tenant(TenantScope),
    AllTenants,
}

impl ReadScope {
    /// `FROM` clause for the rendered query, when the scope is one graph.
    pub fn from_clause(&self) -> Option<String> {
        match self {
            ReadScope::Tenant(scope) => Some(format!("FROM <{}>", scope.graph)),
            ReadScope::AllTenants => None,
        }
    }

    /// Wrap one basic graph pattern for this scope. The single-tenant form
    /// relies on the `FROM` clause; the shared form matches any named graph,
    /// with a distinct graph variable per pattern so edges may cross
    /// partitions.
    pub fn graph_pattern(&self, inner: &str, ordinal: usize) -> String {
        match self {
            ReadScope::Tenant(_) => inner.to_string(),
            ReadScope::AllTenants => format!("GRAPH ?g{ordinal} {{ {inner} }}"),
        }
    }
}

fn single_tenant(caller: &Caller) -> Result<TenantScope, ScopeError> {
    match caller.groups.as_slice() {
        [] => Err(ScopeError::NoTenancy {
            subject: caller.subject.clone(),
        }),
        [tenant] => {
            sanitize::validate_tenant_segment(tenant)?;
            Ok(TenantScope {
                tenant: tenant.clone(),
                graph: vocab::tenant_graph(tenant),
            })
        }
        groups => Err(ScopeError::AmbiguousTenancy {
            subject: caller.subject.clone(),
            count: groups.len(),
        }),
    }
}

/// Resolve the partition a read should see.
pub fn resolve_read_scope(caller: &Caller) -> Result<ReadScope, ScopeError> {
    if caller.shared_read {
        return Ok(ReadScope::AllTenants);
    }
    single_tenant(caller).map(ReadScope::Tenant)
}

/// Resolve the one partition a write must land in.
pub fn resolve_write_scope(caller: &Caller) -> Result<TenantScope, ScopeError> {
    single_tenant(caller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn write_scope_requires_exactly_one_group() {
        let none = Caller::new("svc", vec![]);
        assert_matches!(
            resolve_write_scope(&none),
            Err(ScopeError::NoTenancy { .. })
        );

        let two = Caller::new("svc", vec!["a".into(), "b".into()]);
        assert_matches!(
            resolve_write_scope(&two),
            Err(ScopeError::AmbiguousTenancy { count: 2, .. })
        );

        let one = Caller::new("svc", vec!["acme".into()]);
        let scope = resolve_write_scope(&one).unwrap();
        assert_eq!(scope.graph, "https://w3id.org/plantgraph/graph/acme");
    }

    #[test]
    fn shared_read_skips_tenancy_check() {
        let caller = Caller::new("auditor", vec!["a".into(), "b".into()]).with_shared_read();
        assert_eq!(resolve_read_scope(&caller).unwrap(), ReadScope::AllTenants);
        // The same caller still may not write.
        assert_matches!(
            resolve_write_scope(&caller),
            Err(ScopeError::AmbiguousTenancy { .. })
        );
    }

    #[test]
    fn ambiguous_read_without_capability_fails_fast() {
        let caller = Caller::new("svc", vec!["a".into(), "b".into()]);
        assert_matches!(
            resolve_read_scope(&caller),
            Err(ScopeError::AmbiguousTenancy { .. })
        );
    }

    #[test]
    fn scoped_patterns_render_per_scope() {
        let tenant = ReadScope::Tenant(TenantScope {
            tenant: "acme".into(),
            graph: vocab::tenant_graph("acme"),
        });
        assert_eq!(
            tenant.from_clause().unwrap(),
            "FROM <https://w3id.org/plantgraph/graph/acme>"
        );
        assert_eq!(tenant.graph_pattern("?s ?p ?o", 1), "?s ?p ?o");

        let shared = ReadScope::AllTenants;
        assert_eq!(shared.from_clause(), None);
        assert_eq!(
            shared.graph_pattern("?s ?p ?o", 1),
            "GRAPH ?g1 { ?s ?p ?o }"
        );
    }
}
