//! Descriptor tables for every entity kind: which scalar predicates it
//! carries and which relation families hang off it.
//!
//! The catalog renders its wide SELECT from these tables, the hydration
//! engine folds result rows through them, and the mutation engine derives its
//! insert/delete statements from the same rows — one place to keep the three
//! in agreement.

use crate::model::EntityKind;
use crate::vocab;

/// How an edge is stored relative to the entity owning the relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `(entity, predicate, target)`
    Forward,
    /// `(target, predicate, entity)`
    Reverse,
    /// Read-only reverse reachability over `predicate` followed by a second
    /// hop, e.g. the supply chains touching a product through their elements.
    /// The payload is the second-hop predicate.
    ReversePath(&'static str),
}

/// Edge target selector. Production resources stay abstract here; the
/// concrete kind is decided by the type marker of the row that matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Exact(EntityKind),
    Resource,
}

impl TargetKind {
    pub fn markers(self) -> &'static [&'static str] {
        match self {
            TargetKind::Exact(kind) => match kind {
                EntityKind::Enterprise => &[vocab::CLASS_ENTERPRISE],
                EntityKind::Factory => &[vocab::CLASS_FACTORY],
                EntityKind::Machine => &[vocab::CLASS_MACHINE],
                EntityKind::HumanResource => &[vocab::CLASS_HUMAN_RESOURCE],
                EntityKind::Process => &[vocab::CLASS_PROCESS],
                EntityKind::Capability => &[vocab::CLASS_CAPABILITY],
                EntityKind::Product => &[vocab::CLASS_PRODUCT],
                EntityKind::ProductApplication => &[vocab::CLASS_PRODUCT_APPLICATION],
                EntityKind::ProductClass => &[vocab::CLASS_PRODUCT_CLASS],
                EntityKind::SupplyChain => &[vocab::CLASS_SUPPLY_CHAIN],
                EntityKind::SupplyChainElement => &[vocab::CLASS_SUPPLY_CHAIN_ELEMENT],
                EntityKind::Property => &[vocab::CLASS_PROPERTY],
                EntityKind::SemanticReference => &[vocab::CLASS_SEMANTIC_REFERENCE],
                EntityKind::Location => &[vocab::CLASS_LOCATION],
                EntityKind::ProductPassport => &[vocab::CLASS_PRODUCT_PASSPORT],
                EntityKind::Certificate => &[vocab::CLASS_CERTIFICATE],
            },
            TargetKind::Resource => &[vocab::CLASS_MACHINE, vocab::CLASS_HUMAN_RESOURCE],
        }
    }

    /// True when a row typed with `marker` satisfies this selector.
    pub fn matches(self, marker: &str) -> bool {
        self.markers().contains(&marker)
    }
}

/// What the catalog query should fetch for one worklist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Exact(EntityKind),
    Resource,
}

impl FetchKind {
    pub fn markers(self) -> &'static [&'static str] {
        match self {
            FetchKind::Exact(kind) => TargetKind::Exact(kind).markers(),
            FetchKind::Resource => TargetKind::Resource.markers(),
        }
    }

    pub fn from_target(target: TargetKind) -> Self {
        match target {
            TargetKind::Exact(kind) => FetchKind::Exact(kind),
            TargetKind::Resource => FetchKind::Resource,
        }
    }
}

/// One scalar attribute.
#[derive(Debug, Clone, Copy)]
pub struct ScalarSpec {
    pub field: &'static str,
    pub predicate: &'static str,
    /// Label/description carry an independent language tag.
    pub lang_tagged: bool,
}

/// One relation family.
#[derive(Debug, Clone, Copy)]
pub struct RelationSpec {
    /// Column variable and input field name.
    pub field: &'static str,
    pub predicate: &'static str,
    pub direction: Direction,
    pub target: TargetKind,
    /// Single-valued relation (`Option` on the entity) instead of a set.
    pub single: bool,
    /// Redundant inverse statement kept in lockstep with the main edge.
    pub inverse_predicate: Option<&'static str>,
    /// Update semantics: the supplied link replaces the stored one instead
    /// of merging into it.
    pub full_replace: bool,
}

impl RelationSpec {
    pub const fn writable(&self) -> bool {
        !matches!(self.direction, Direction::ReversePath(_))
    }
}

const fn forward(
    field: &'static str,
    predicate: &'static str,
    target: TargetKind,
) -> RelationSpec {
    RelationSpec {
        field,
        predicate,
        direction: Direction::Forward,
        target,
        single: false,
        inverse_predicate: None,
        full_replace: false,
    }
}

const fn forward_single(
    field: &'static str,
    predicate: &'static str,
    target: TargetKind,
) -> RelationSpec {
    RelationSpec {
        single: true,
        ..forward(field, predicate, target)
    }
}

const fn paired(
    field: &'static str,
    predicate: &'static str,
    inverse: &'static str,
    target: TargetKind,
) -> RelationSpec {
    RelationSpec {
        inverse_predicate: Some(inverse),
        ..forward(field, predicate, target)
    }
}

const fn reverse(
    field: &'static str,
    predicate: &'static str,
    target: TargetKind,
) -> RelationSpec {
    RelationSpec {
        field,
        predicate,
        direction: Direction::Reverse,
        target,
        single: false,
        inverse_predicate: None,
        full_replace: false,
    }
}

// =============================================================================
// Scalar tables
// =============================================================================

const COMMON_SCALARS: [ScalarSpec; 3] = [
    ScalarSpec {
        field: "sourceId",
        predicate: vocab::PROP_SOURCE_ID,
        lang_tagged: false,
    },
    ScalarSpec {
        field: "label",
        predicate: vocab::RDFS_LABEL,
        lang_tagged: true,
    },
    ScalarSpec {
        field: "description",
        predicate: vocab::RDFS_COMMENT,
        lang_tagged: true,
    },
];

const PROPERTY_SCALARS: [ScalarSpec; 4] = [
    COMMON_SCALARS[0],
    COMMON_SCALARS[1],
    COMMON_SCALARS[2],
    ScalarSpec {
        field: "value",
        predicate: vocab::PROP_VALUE,
        lang_tagged: false,
    },
];

const SEMANTIC_REFERENCE_SCALARS: [ScalarSpec; 4] = [
    COMMON_SCALARS[0],
    COMMON_SCALARS[1],
    COMMON_SCALARS[2],
    ScalarSpec {
        field: "sourceUri",
        predicate: vocab::PROP_SOURCE_URI,
        lang_tagged: false,
    },
];

const LOCATION_SCALARS: [ScalarSpec; 9] = [
    COMMON_SCALARS[0],
    COMMON_SCALARS[1],
    COMMON_SCALARS[2],
    ScalarSpec {
        field: "street",
        predicate: vocab::PROP_STREET,
        lang_tagged: false,
    },
    ScalarSpec {
        field: "zip",
        predicate: vocab::PROP_ZIP,
        lang_tagged: false,
    },
    ScalarSpec {
        field: "city",
        predicate: vocab::PROP_CITY,
        lang_tagged: false,
    },
    ScalarSpec {
        field: "country",
        predicate: vocab::PROP_COUNTRY,
        lang_tagged: false,
    },
    ScalarSpec {
        field: "latitude",
        predicate: vocab::PROP_LATITUDE,
        lang_tagged: false,
    },
    ScalarSpec {
        field: "longitude",
        predicate: vocab::PROP_LONGITUDE,
        lang_tagged: false,
    },
];

pub fn scalars(kind: EntityKind) -> &'static [ScalarSpec] {
    match kind {
        EntityKind::Property => &PROPERTY_SCALARS,
        EntityKind::SemanticReference => &SEMANTIC_REFERENCE_SCALARS,
        EntityKind::Location => &LOCATION_SCALARS,
        _ => &COMMON_SCALARS,
    }
}

// =============================================================================
// Relation tables
// =============================================================================

static ENTERPRISE_RELATIONS: [RelationSpec; 8] = [
    forward_single("location", vocab::REL_HAS, TargetKind::Exact(EntityKind::Location)),
    forward("factories", vocab::REL_HAS, TargetKind::Exact(EntityKind::Factory)),
    forward(
        "subsidiaryEnterprises",
        vocab::REL_HAS,
        TargetKind::Exact(EntityKind::Enterprise),
    ),
    forward("products", vocab::REL_HAS, TargetKind::Exact(EntityKind::Product)),
    forward("processes", vocab::REL_HAS, TargetKind::Exact(EntityKind::Process)),
    forward("productionResources", vocab::REL_HAS, TargetKind::Resource),
    forward(
        "supplyChains",
        vocab::REL_HAS,
        TargetKind::Exact(EntityKind::SupplyChain),
    ),
    forward(
        "certificates",
        vocab::REL_HAS,
        TargetKind::Exact(EntityKind::Certificate),
    ),
];

static FACTORY_RELATIONS: [RelationSpec; 6] = [
    forward_single("location", vocab::REL_HAS, TargetKind::Exact(EntityKind::Location)),
    RelationSpec {
        single: true,
        ..reverse(
            "enterprise",
            vocab::REL_HAS,
            TargetKind::Exact(EntityKind::Enterprise),
        )
    },
    forward("productionResources", vocab::REL_HAS, TargetKind::Resource),
    forward("products", vocab::REL_HAS, TargetKind::Exact(EntityKind::Product)),
    forward("processes", vocab::REL_HAS, TargetKind::Exact(EntityKind::Process)),
    forward(
        "certificates",
        vocab::REL_HAS,
        TargetKind::Exact(EntityKind::Certificate),
    ),
];

// Machines and human resources share the resource coupling; human resources
// additionally hold certificates. The fetch table is the superset.
static RESOURCE_RELATIONS: [RelationSpec; 4] = [
    paired(
        "providedProcesses",
        vocab::REL_PROVIDES,
        vocab::REL_PROVIDED_BY,
        TargetKind::Exact(EntityKind::Process),
    ),
    paired(
        "usingProcesses",
        vocab::REL_USED_BY,
        vocab::REL_USES,
        TargetKind::Exact(EntityKind::Process),
    ),
    paired(
        "providedCapabilities",
        vocab::REL_PROVIDES,
        vocab::REL_PROVIDED_BY,
        TargetKind::Exact(EntityKind::Capability),
    ),
    forward(
        "certificates",
        vocab::REL_HAS,
        TargetKind::Exact(EntityKind::Certificate),
    ),
];

static PROCESS_RELATIONS: [RelationSpec; 13] = [
    paired(
        "parentProcesses",
        vocab::REL_CONTAINED_IN,
        vocab::REL_CONTAINS,
        TargetKind::Exact(EntityKind::Process),
    ),
    paired(
        "childProcesses",
        vocab::REL_CONTAINS,
        vocab::REL_CONTAINED_IN,
        TargetKind::Exact(EntityKind::Process),
    ),
    forward(
        "realizedCapabilities",
        vocab::REL_REALIZES,
        TargetKind::Exact(EntityKind::Capability),
    ),
    forward(
        "requiredCapabilities",
        vocab::REL_REQUIRES,
        TargetKind::Exact(EntityKind::Capability),
    ),
    forward(
        "rawMaterials",
        vocab::REL_HAS_RAW_MATERIAL,
        TargetKind::Exact(EntityKind::ProductApplication),
    ),
    forward(
        "auxiliaryMaterials",
        vocab::REL_HAS_AUXILIARY_MATERIAL,
        TargetKind::Exact(EntityKind::ProductApplication),
    ),
    forward(
        "operatingMaterials",
        vocab::REL_HAS_OPERATING_MATERIAL,
        TargetKind::Exact(EntityKind::ProductApplication),
    ),
    forward(
        "preliminaryProducts",
        vocab::REL_HAS_PRELIMINARY_PRODUCT,
        TargetKind::Exact(EntityKind::ProductApplication),
    ),
    forward(
        "endProducts",
        vocab::REL_HAS_END_PRODUCT,
        TargetKind::Exact(EntityKind::ProductApplication),
    ),
    forward(
        "byProducts",
        vocab::REL_HAS_BY_PRODUCT,
        TargetKind::Exact(EntityKind::ProductApplication),
    ),
    forward(
        "wasteProducts",
        vocab::REL_HAS_WASTE_PRODUCT,
        TargetKind::Exact(EntityKind::ProductApplication),
    ),
    paired(
        "usedProductionResources",
        vocab::REL_USES,
        vocab::REL_USED_BY,
        TargetKind::Resource,
    ),
    paired(
        "providingProductionResources",
        vocab::REL_PROVIDED_BY,
        vocab::REL_PROVIDES,
        TargetKind::Resource,
    ),
];

static CAPABILITY_RELATIONS: [RelationSpec; 6] = [
    paired(
        "parentCapabilities",
        vocab::REL_SPECIALIZES,
        vocab::REL_GENERALIZES,
        TargetKind::Exact(EntityKind::Capability),
    ),
    paired(
        "childCapabilities",
        vocab::REL_GENERALIZES,
        vocab::REL_SPECIALIZES,
        TargetKind::Exact(EntityKind::Capability),
    ),
    reverse(
        "processes",
        vocab::REL_REALIZES,
        TargetKind::Exact(EntityKind::Process),
    ),
    paired(
        "productionResources",
        vocab::REL_PROVIDED_BY,
        vocab::REL_PROVIDES,
        TargetKind::Resource,
    ),
    forward("properties", vocab::REL_HAS, TargetKind::Exact(EntityKind::Property)),
    forward(
        "semanticReferences",
        vocab::REL_HAS_SEMANTIC,
        TargetKind::Exact(EntityKind::SemanticReference),
    ),
];

static PRODUCT_RELATIONS: [RelationSpec; 7] = [
    forward(
        "productApplications",
        vocab::REL_HAS,
        TargetKind::Exact(EntityKind::ProductApplication),
    ),
    paired(
        "productClasses",
        vocab::REL_SPECIALIZES,
        vocab::REL_GENERALIZES,
        TargetKind::Exact(EntityKind::ProductClass),
    ),
    forward(
        "semanticReferences",
        vocab::REL_HAS_SEMANTIC,
        TargetKind::Exact(EntityKind::SemanticReference),
    ),
    reverse("factories", vocab::REL_HAS, TargetKind::Exact(EntityKind::Factory)),
    reverse(
        "enterprises",
        vocab::REL_HAS,
        TargetKind::Exact(EntityKind::Enterprise),
    ),
    RelationSpec {
        direction: Direction::ReversePath(vocab::REL_HAS),
        ..reverse(
            "supplyChains",
            vocab::REL_HAS,
            TargetKind::Exact(EntityKind::SupplyChain),
        )
    },
    RelationSpec {
        single: true,
        full_replace: true,
        ..forward(
            "productPassport",
            vocab::REL_HAS_PASSPORT,
            TargetKind::Exact(EntityKind::ProductPassport),
        )
    },
];

static PRODUCT_APPLICATION_RELATIONS: [RelationSpec; 3] = [
    forward_single("product", vocab::REL_HAS, TargetKind::Exact(EntityKind::Product)),
    forward_single(
        "quantity",
        vocab::REL_HAS_QUANTITY,
        TargetKind::Exact(EntityKind::Property),
    ),
    forward("properties", vocab::REL_HAS, TargetKind::Exact(EntityKind::Property)),
];

static PRODUCT_CLASS_RELATIONS: [RelationSpec; 4] = [
    paired(
        "parentClasses",
        vocab::REL_SPECIALIZES,
        vocab::REL_GENERALIZES,
        TargetKind::Exact(EntityKind::ProductClass),
    ),
    paired(
        "childClasses",
        vocab::REL_GENERALIZES,
        vocab::REL_SPECIALIZES,
        TargetKind::Exact(EntityKind::ProductClass),
    ),
    paired(
        "products",
        vocab::REL_GENERALIZES,
        vocab::REL_SPECIALIZES,
        TargetKind::Exact(EntityKind::Product),
    ),
    forward(
        "semanticReferences",
        vocab::REL_HAS_SEMANTIC,
        TargetKind::Exact(EntityKind::SemanticReference),
    ),
];

static SUPPLY_CHAIN_RELATIONS: [RelationSpec; 1] = [forward(
    "elements",
    vocab::REL_HAS,
    TargetKind::Exact(EntityKind::SupplyChainElement),
)];

static SUPPLY_CHAIN_ELEMENT_RELATIONS: [RelationSpec; 4] = [
    forward(
        "suppliers",
        vocab::REL_HAS_SUPPLIER,
        TargetKind::Exact(EntityKind::SupplyChainElement),
    ),
    forward_single(
        "enterprise",
        vocab::REL_HAS,
        TargetKind::Exact(EntityKind::Enterprise),
    ),
    forward_single("factory", vocab::REL_HAS, TargetKind::Exact(EntityKind::Factory)),
    forward("products", vocab::REL_HAS, TargetKind::Exact(EntityKind::Product)),
];

static PROPERTY_RELATIONS: [RelationSpec; 1] = [forward(
    "semanticReferences",
    vocab::REL_HAS_SEMANTIC,
    TargetKind::Exact(EntityKind::SemanticReference),
)];

static CERTIFICATE_RELATIONS: [RelationSpec; 1] = [forward(
    "semanticReferences",
    vocab::REL_HAS_SEMANTIC,
    TargetKind::Exact(EntityKind::SemanticReference),
)];

static PRODUCT_PASSPORT_RELATIONS: [RelationSpec; 1] = [forward(
    "properties",
    vocab::REL_HAS,
    TargetKind::Exact(EntityKind::Property),
)];

static LEAF_RELATIONS: [RelationSpec; 0] = [];

pub fn relations(kind: EntityKind) -> &'static [RelationSpec] {
    match kind {
        EntityKind::Enterprise => &ENTERPRISE_RELATIONS,
        EntityKind::Factory => &FACTORY_RELATIONS,
        EntityKind::Machine => &RESOURCE_RELATIONS[..3],
        EntityKind::HumanResource => &RESOURCE_RELATIONS,
        EntityKind::Process => &PROCESS_RELATIONS,
        EntityKind::Capability => &CAPABILITY_RELATIONS,
        EntityKind::Product => &PRODUCT_RELATIONS,
        EntityKind::ProductApplication => &PRODUCT_APPLICATION_RELATIONS,
        EntityKind::ProductClass => &PRODUCT_CLASS_RELATIONS,
        EntityKind::SupplyChain => &SUPPLY_CHAIN_RELATIONS,
        EntityKind::SupplyChainElement => &SUPPLY_CHAIN_ELEMENT_RELATIONS,
        EntityKind::Property => &PROPERTY_RELATIONS,
        EntityKind::SemanticReference => &LEAF_RELATIONS,
        EntityKind::Location => &LEAF_RELATIONS,
        EntityKind::ProductPassport => &PRODUCT_PASSPORT_RELATIONS,
        EntityKind::Certificate => &CERTIFICATE_RELATIONS,
    }
}

/// Relation table a fetch should project, covering every kind the fetch may
/// resolve to.
pub fn fetch_relations(fetch: FetchKind) -> &'static [RelationSpec] {
    match fetch {
        FetchKind::Exact(kind) => relations(kind),
        FetchKind::Resource => &RESOURCE_RELATIONS,
    }
}

/// Scalar table for a fetch; the resource variants share one.
pub fn fetch_scalars(fetch: FetchKind) -> &'static [ScalarSpec] {
    match fetch {
        FetchKind::Exact(kind) => scalars(kind),
        FetchKind::Resource => &COMMON_SCALARS,
    }
}

/// Look up a relation family of a kind by its field name.
pub fn relation(kind: EntityKind, field: &str) -> Option<&'static RelationSpec> {
    relations(kind).iter().find(|spec| spec.field == field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn relation_fields_are_unique_per_kind() {
        for kind in EntityKind::iter() {
            let mut seen = std::collections::HashSet::new();
            for spec in relations(kind) {
                assert!(seen.insert(spec.field), "{kind}: duplicate {}", spec.field);
            }
        }
    }

    #[test]
    fn paired_predicates_are_symmetric() {
        // Every relation storing a redundant inverse must be readable back
        // through some relation using that inverse as its main predicate.
        for kind in EntityKind::iter() {
            for spec in relations(kind) {
                if let Some(inverse) = spec.inverse_predicate {
                    let target_kinds: Vec<EntityKind> = match spec.target {
                        TargetKind::Exact(k) => vec![k],
                        TargetKind::Resource => vec![EntityKind::Machine, EntityKind::HumanResource],
                    };
                    for target in target_kinds {
                        assert!(
                            relations(target).iter().any(|peer| {
                                peer.predicate == inverse && peer.target.matches(kind.type_marker())
                            }),
                            "{kind}.{} stores inverse {inverse} that {target} never reads",
                            spec.field
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn machine_table_hides_certificates() {
        assert!(relation(EntityKind::Machine, "certificates").is_none());
        assert!(relation(EntityKind::HumanResource, "certificates").is_some());
    }
}
