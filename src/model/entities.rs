//! Typed entities of the industrial catalog.
//!
//! Every entity is identified by a single [`EntityId`]; relation collections
//! are sets of [`Linked`] references deduplicated by identity. Cyclic
//! families (capability and process hierarchies, product classes, subsidiary
//! enterprises, supply-chain suppliers) terminate in [`Linked::Stub`] nodes
//! where the hydration engine cut the traversal.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::id::EntityId;
use super::kind::EntityKind;
use super::value::{LangString, Linked};

/// Identity access shared by all entity types.
pub trait HasId {
    fn id(&self) -> &EntityId;
}

macro_rules! impl_has_id {
    ($($ty:ty),+ $(,)?) => {
        $(impl HasId for $ty {
            fn id(&self) -> &EntityId {
                &self.id
            }
        })+
    };
}

#[derive(Debug, Clone)]
pub struct Enterprise {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub location: Option<Linked<Location>>,
    pub factories: BTreeSet<Linked<Factory>>,
    pub subsidiary_enterprises: BTreeSet<Linked<Enterprise>>,
    pub products: BTreeSet<Linked<Product>>,
    pub processes: BTreeSet<Linked<Process>>,
    pub production_resources: BTreeSet<Linked<ProductionResource>>,
    pub supply_chains: BTreeSet<Linked<SupplyChain>>,
    pub certificates: BTreeSet<Linked<Certificate>>,
}

impl Enterprise {
    pub fn new(id: EntityId) -> Self {
        Enterprise {
            id,
            source_id: None,
            label: None,
            description: None,
            location: None,
            factories: BTreeSet::new(),
            subsidiary_enterprises: BTreeSet::new(),
            products: BTreeSet::new(),
            processes: BTreeSet::new(),
            production_resources: BTreeSet::new(),
            supply_chains: BTreeSet::new(),
            certificates: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Factory {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub location: Option<Linked<Location>>,
    pub enterprise: Option<Linked<Enterprise>>,
    pub production_resources: BTreeSet<Linked<ProductionResource>>,
    pub products: BTreeSet<Linked<Product>>,
    pub processes: BTreeSet<Linked<Process>>,
    pub certificates: BTreeSet<Linked<Certificate>>,
}

impl Factory {
    pub fn new(id: EntityId) -> Self {
        Factory {
            id,
            source_id: None,
            label: None,
            description: None,
            location: None,
            enterprise: None,
            production_resources: BTreeSet::new(),
            products: BTreeSet::new(),
            processes: BTreeSet::new(),
            certificates: BTreeSet::new(),
        }
    }
}

/// Variant-specific payload of a production resource.
#[derive(Debug, Clone)]
pub enum ResourceVariant {
    Machine,
    HumanResource {
        certificates: BTreeSet<Linked<Certificate>>,
    },
}

/// A machine or a human resource; the discriminant comes from the type
/// marker the store returned for the matched row.
#[derive(Debug, Clone)]
pub struct ProductionResource {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub provided_processes: BTreeSet<Linked<Process>>,
    pub using_processes: BTreeSet<Linked<Process>>,
    pub provided_capabilities: BTreeSet<Linked<Capability>>,
    pub variant: ResourceVariant,
}

impl ProductionResource {
    pub fn new(id: EntityId, variant: ResourceVariant) -> Self {
        ProductionResource {
            id,
            source_id: None,
            label: None,
            description: None,
            provided_processes: BTreeSet::new(),
            using_processes: BTreeSet::new(),
            provided_capabilities: BTreeSet::new(),
            variant,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self.variant {
            ResourceVariant::Machine => EntityKind::Machine,
            ResourceVariant::HumanResource { .. } => EntityKind::HumanResource,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Process {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub parent_processes: BTreeSet<Linked<Process>>,
    pub child_processes: BTreeSet<Linked<Process>>,
    pub realized_capabilities: BTreeSet<Linked<Capability>>,
    pub required_capabilities: BTreeSet<Linked<Capability>>,
    pub raw_materials: BTreeSet<Linked<ProductApplication>>,
    pub auxiliary_materials: BTreeSet<Linked<ProductApplication>>,
    pub operating_materials: BTreeSet<Linked<ProductApplication>>,
    pub preliminary_products: BTreeSet<Linked<ProductApplication>>,
    pub end_products: BTreeSet<Linked<ProductApplication>>,
    pub by_products: BTreeSet<Linked<ProductApplication>>,
    pub waste_products: BTreeSet<Linked<ProductApplication>>,
    pub used_production_resources: BTreeSet<Linked<ProductionResource>>,
    pub providing_production_resources: BTreeSet<Linked<ProductionResource>>,
}

impl Process {
    pub fn new(id: EntityId) -> Self {
        Process {
            id,
            source_id: None,
            label: None,
            description: None,
            parent_processes: BTreeSet::new(),
            child_processes: BTreeSet::new(),
            realized_capabilities: BTreeSet::new(),
            required_capabilities: BTreeSet::new(),
            raw_materials: BTreeSet::new(),
            auxiliary_materials: BTreeSet::new(),
            operating_materials: BTreeSet::new(),
            preliminary_products: BTreeSet::new(),
            end_products: BTreeSet::new(),
            by_products: BTreeSet::new(),
            waste_products: BTreeSet::new(),
            used_production_resources: BTreeSet::new(),
            providing_production_resources: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Capability {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub parent_capabilities: BTreeSet<Linked<Capability>>,
    pub child_capabilities: BTreeSet<Linked<Capability>>,
    pub processes: BTreeSet<Linked<Process>>,
    pub production_resources: BTreeSet<Linked<ProductionResource>>,
    pub properties: BTreeSet<Linked<Property>>,
    pub semantic_references: BTreeSet<Linked<SemanticReference>>,
}

impl Capability {
    pub fn new(id: EntityId) -> Self {
        Capability {
            id,
            source_id: None,
            label: None,
            description: None,
            parent_capabilities: BTreeSet::new(),
            child_capabilities: BTreeSet::new(),
            processes: BTreeSet::new(),
            production_resources: BTreeSet::new(),
            properties: BTreeSet::new(),
            semantic_references: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub product_applications: BTreeSet<Linked<ProductApplication>>,
    pub product_classes: BTreeSet<Linked<ProductClass>>,
    pub semantic_references: BTreeSet<Linked<SemanticReference>>,
    pub factories: BTreeSet<Linked<Factory>>,
    pub enterprises: BTreeSet<Linked<Enterprise>>,
    pub supply_chains: BTreeSet<Linked<SupplyChain>>,
    pub product_passport: Option<Linked<ProductPassport>>,
}

impl Product {
    pub fn new(id: EntityId) -> Self {
        Product {
            id,
            source_id: None,
            label: None,
            description: None,
            product_applications: BTreeSet::new(),
            product_classes: BTreeSet::new(),
            semantic_references: BTreeSet::new(),
            factories: BTreeSet::new(),
            enterprises: BTreeSet::new(),
            supply_chains: BTreeSet::new(),
            product_passport: None,
        }
    }
}

/// A quantified usage of a product, e.g. one line of a bill of materials.
#[derive(Debug, Clone)]
pub struct ProductApplication {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub product: Option<Linked<Product>>,
    pub quantity: Option<Linked<Property>>,
    pub properties: BTreeSet<Linked<Property>>,
}

impl ProductApplication {
    pub fn new(id: EntityId) -> Self {
        ProductApplication {
            id,
            source_id: None,
            label: None,
            description: None,
            product: None,
            quantity: None,
            properties: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductClass {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub parent_classes: BTreeSet<Linked<ProductClass>>,
    pub child_classes: BTreeSet<Linked<ProductClass>>,
    pub products: BTreeSet<Linked<Product>>,
    pub semantic_references: BTreeSet<Linked<SemanticReference>>,
}

impl ProductClass {
    pub fn new(id: EntityId) -> Self {
        ProductClass {
            id,
            source_id: None,
            label: None,
            description: None,
            parent_classes: BTreeSet::new(),
            child_classes: BTreeSet::new(),
            products: BTreeSet::new(),
            semantic_references: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SupplyChain {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub elements: BTreeSet<Linked<SupplyChainElement>>,
}

impl SupplyChain {
    pub fn new(id: EntityId) -> Self {
        SupplyChain {
            id,
            source_id: None,
            label: None,
            description: None,
            elements: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SupplyChainElement {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub suppliers: BTreeSet<Linked<SupplyChainElement>>,
    pub enterprise: Option<Linked<Enterprise>>,
    pub factory: Option<Linked<Factory>>,
    pub products: BTreeSet<Linked<Product>>,
}

impl SupplyChainElement {
    pub fn new(id: EntityId) -> Self {
        SupplyChainElement {
            id,
            source_id: None,
            label: None,
            description: None,
            suppliers: BTreeSet::new(),
            enterprise: None,
            factory: None,
            products: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Property {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub value: Option<String>,
    pub semantic_references: BTreeSet<Linked<SemanticReference>>,
}

impl Property {
    pub fn new(id: EntityId) -> Self {
        Property {
            id,
            source_id: None,
            label: None,
            description: None,
            value: None,
            semantic_references: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SemanticReference {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub source_uri: Option<String>,
}

impl SemanticReference {
    pub fn new(id: EntityId) -> Self {
        SemanticReference {
            id,
            source_id: None,
            label: None,
            description: None,
            source_uri: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Location {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub street: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl Location {
    pub fn new(id: EntityId) -> Self {
        Location {
            id,
            source_id: None,
            label: None,
            description: None,
            street: None,
            zip: None,
            city: None,
            country: None,
            latitude: None,
            longitude: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductPassport {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub properties: BTreeSet<Linked<Property>>,
}

impl ProductPassport {
    pub fn new(id: EntityId) -> Self {
        ProductPassport {
            id,
            source_id: None,
            label: None,
            description: None,
            properties: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Certificate {
    pub id: EntityId,
    pub source_id: Option<String>,
    pub label: Option<LangString>,
    pub description: Option<LangString>,
    pub semantic_references: BTreeSet<Linked<SemanticReference>>,
}

impl Certificate {
    pub fn new(id: EntityId) -> Self {
        Certificate {
            id,
            source_id: None,
            label: None,
            description: None,
            semantic_references: BTreeSet::new(),
        }
    }
}

impl_has_id!(
    Enterprise,
    Factory,
    ProductionResource,
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
);

/// A fully assembled entity of any kind, as returned by the hydration engine.
#[derive(Debug, Clone)]
pub enum AnyEntity {
    Enterprise(Arc<Enterprise>),
    Factory(Arc<Factory>),
    ProductionResource(Arc<ProductionResource>),
    Process(Arc<Process>),
    Capability(Arc<Capability>),
    Product(Arc<Product>),
    ProductApplication(Arc<ProductApplication>),
    ProductClass(Arc<ProductClass>),
    SupplyChain(Arc<SupplyChain>),
    SupplyChainElement(Arc<SupplyChainElement>),
    Property(Arc<Property>),
    SemanticReference(Arc<SemanticReference>),
    Location(Arc<Location>),
    ProductPassport(Arc<ProductPassport>),
    Certificate(Arc<Certificate>),
}

impl AnyEntity {
    pub fn id(&self) -> &EntityId {
        match self {
            AnyEntity::Enterprise(e) => e.id(),
            AnyEntity::Factory(e) => e.id(),
            AnyEntity::ProductionResource(e) => e.id(),
            AnyEntity::Process(e) => e.id(),
            AnyEntity::Capability(e) => e.id(),
            AnyEntity::Product(e) => e.id(),
            AnyEntity::ProductApplication(e) => e.id(),
            AnyEntity::ProductClass(e) => e.id(),
            AnyEntity::SupplyChain(e) => e.id(),
            AnyEntity::SupplyChainElement(e) => e.id(),
            AnyEntity::Property(e) => e.id(),
            AnyEntity::SemanticReference(e) => e.id(),
            AnyEntity::Location(e) => e.id(),
            AnyEntity::ProductPassport(e) => e.id(),
            AnyEntity::Certificate(e) => e.id(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            AnyEntity::Enterprise(_) => EntityKind::Enterprise,
            AnyEntity::Factory(_) => EntityKind::Factory,
            AnyEntity::ProductionResource(e) => e.kind(),
            AnyEntity::Process(_) => EntityKind::Process,
            AnyEntity::Capability(_) => EntityKind::Capability,
            AnyEntity::Product(_) => EntityKind::Product,
            AnyEntity::ProductApplication(_) => EntityKind::ProductApplication,
            AnyEntity::ProductClass(_) => EntityKind::ProductClass,
            AnyEntity::SupplyChain(_) => EntityKind::SupplyChain,
            AnyEntity::SupplyChainElement(_) => EntityKind::SupplyChainElement,
            AnyEntity::Property(_) => EntityKind::Property,
            AnyEntity::SemanticReference(_) => EntityKind::SemanticReference,
            AnyEntity::Location(_) => EntityKind::Location,
            AnyEntity::ProductPassport(_) => EntityKind::ProductPassport,
            AnyEntity::Certificate(_) => EntityKind::Certificate,
        }
    }
}

macro_rules! any_entity_downcasts {
    ($(($variant:ident, $ty:ty, $into:ident)),+ $(,)?) => {
        impl AnyEntity {
            $(
                pub fn $into(self) -> Option<Arc<$ty>> {
                    match self {
                        AnyEntity::$variant(e) => Some(e),
                        _ => None,
                    }
                }
            )+
        }
    };
}

any_entity_downcasts!(
    (Enterprise, Enterprise, into_enterprise),
    (Factory, Factory, into_factory),
    (ProductionResource, ProductionResource, into_production_resource),
    (Process, Process, into_process),
    (Capability, Capability, into_capability),
    (Product, Product, into_product),
    (ProductApplication, ProductApplication, into_product_application),
    (ProductClass, ProductClass, into_product_class),
    (SupplyChain, SupplyChain, into_supply_chain),
    (SupplyChainElement, SupplyChainElement, into_supply_chain_element),
    (Property, Property, into_property),
    (SemanticReference, SemanticReference, into_semantic_reference),
    (Location, Location, into_location),
    (ProductPassport, ProductPassport, into_product_passport),
    (Certificate, Certificate, into_certificate),
);
