use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::vocab;

/// Concrete entity kinds known to the catalog.
///
/// Machine and HumanResource are separate kinds here; the abstract
/// production-resource family exists only as an edge-target selector in the
/// schema tables, and hydration dispatches on the type marker the store
/// returns.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Enterprise,
    Factory,
    Machine,
    HumanResource,
    Process,
    Capability,
    Product,
    ProductApplication,
    ProductClass,
    SupplyChain,
    SupplyChainElement,
    Property,
    SemanticReference,
    Location,
    ProductPassport,
    Certificate,
}

impl EntityKind {
    /// The rdf:type marker IRI for this kind.
    pub fn type_marker(self) -> &'static str {
        match self {
            EntityKind::Enterprise => vocab::CLASS_ENTERPRISE,
            EntityKind::Factory => vocab::CLASS_FACTORY,
            EntityKind::Machine => vocab::CLASS_MACHINE,
            EntityKind::HumanResource => vocab::CLASS_HUMAN_RESOURCE,
            EntityKind::Process => vocab::CLASS_PROCESS,
            EntityKind::Capability => vocab::CLASS_CAPABILITY,
            EntityKind::Product => vocab::CLASS_PRODUCT,
            EntityKind::ProductApplication => vocab::CLASS_PRODUCT_APPLICATION,
            EntityKind::ProductClass => vocab::CLASS_PRODUCT_CLASS,
            EntityKind::SupplyChain => vocab::CLASS_SUPPLY_CHAIN,
            EntityKind::SupplyChainElement => vocab::CLASS_SUPPLY_CHAIN_ELEMENT,
            EntityKind::Property => vocab::CLASS_PROPERTY,
            EntityKind::SemanticReference => vocab::CLASS_SEMANTIC_REFERENCE,
            EntityKind::Location => vocab::CLASS_LOCATION,
            EntityKind::ProductPassport => vocab::CLASS_PRODUCT_PASSPORT,
            EntityKind::Certificate => vocab::CLASS_CERTIFICATE,
        }
    }

    /// Reverse lookup from a type marker IRI.
    pub fn from_marker(iri: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        EntityKind::iter().find(|kind| kind.type_marker() == iri)
    }

    pub fn is_production_resource(self) -> bool {
        matches!(self, EntityKind::Machine | EntityKind::HumanResource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_round_trip() {
        use strum::IntoEnumIterator;
        for kind in EntityKind::iter() {
            assert_eq!(EntityKind::from_marker(kind.type_marker()), Some(kind));
        }
    }

    #[test]
    fn displays_camel_case() {
        assert_eq!(EntityKind::SupplyChainElement.to_string(), "supplyChainElement");
    }
}
