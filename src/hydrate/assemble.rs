//! Typed assembly of fetched records.
//!
//! Records are materialized deepest-first (reverse worklist order). Each
//! relation target resolves against the set of already-materialized
//! entities: a hit shares the existing `Arc`, a miss is either a cycle or a
//! cut edge and becomes a stub. The edge always lands on the relation set of
//! the record being assembled, never on the peer.

use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::model::{
    AnyEntity, Capability, Certificate, Enterprise, EntityId, EntityKind, Factory, Linked,
    Location, Process, Product, ProductApplication, ProductClass, ProductPassport,
    ProductionResource, Property, ResourceVariant, SemanticReference, SupplyChain,
    SupplyChainElement,
};

use super::raw::RawEntity;
use super::{HydrationError, Traversal};

/// Materialize every fetched record, deepest-first.
pub(crate) fn assemble_all(
    traversal: &Traversal,
) -> Result<IndexMap<EntityId, AnyEntity>, HydrationError> {
    let mut assembler = Assembler {
        traversal,
        done: IndexMap::new(),
    };
    let order: Vec<EntityId> = traversal.fetched.keys().rev().cloned().collect();
    for id in order {
        assembler.assemble(&id)?;
    }
    Ok(assembler.done)
}

/// The placeholder a product-application miss materializes into: nothing but
/// the identifier, wrapping that identifier as its product reference.
pub(crate) fn product_application_placeholder(id: &EntityId) -> AnyEntity {
    AnyEntity::ProductApplication(placeholder_application(id))
}

fn placeholder_application(id: &EntityId) -> Arc<ProductApplication> {
    let mut application = ProductApplication::new(id.clone());
    application.product = Some(Linked::Stub(id.clone()));
    Arc::new(application)
}

struct Assembler<'a> {
    traversal: &'a Traversal,
    done: IndexMap<EntityId, AnyEntity>,
}

macro_rules! resolver {
    ($name:ident, $variant:ident, $ty:ty, $label:literal) => {
        fn $name(&self, id: &EntityId) -> Result<Linked<$ty>, HydrationError> {
            match self.done.get(id) {
                Some(AnyEntity::$variant(entity)) => Ok(Linked::Full(entity.clone())),
                Some(other) => Err(HydrationError::KindMismatch {
                    id: id.clone(),
                    expected: $label,
                    found: other.kind(),
                }),
                None => Ok(Linked::Stub(id.clone())),
            }
        }
    };
}

impl Assembler<'_> {
    fn assemble(&mut self, id: &EntityId) -> Result<(), HydrationError> {
        let traversal = self.traversal;
        let Some(raw) = traversal.fetched.get(id) else {
            return Ok(());
        };

        let entity = match raw.kind {
            EntityKind::Enterprise => AnyEntity::Enterprise(Arc::new(self.build_enterprise(raw)?)),
            EntityKind::Factory => AnyEntity::Factory(Arc::new(self.build_factory(raw)?)),
            EntityKind::Machine | EntityKind::HumanResource => {
                AnyEntity::ProductionResource(Arc::new(self.build_resource(raw)?))
            }
            EntityKind::Process => AnyEntity::Process(Arc::new(self.build_process(raw)?)),
            EntityKind::Capability => {
                AnyEntity::Capability(Arc::new(self.build_capability(raw)?))
            }
            EntityKind::Product => AnyEntity::Product(Arc::new(self.build_product(raw)?)),
            EntityKind::ProductApplication => {
                AnyEntity::ProductApplication(Arc::new(self.build_product_application(raw)?))
            }
            EntityKind::ProductClass => {
                AnyEntity::ProductClass(Arc::new(self.build_product_class(raw)?))
            }
            EntityKind::SupplyChain => {
                AnyEntity::SupplyChain(Arc::new(self.build_supply_chain(raw)?))
            }
            EntityKind::SupplyChainElement => {
                AnyEntity::SupplyChainElement(Arc::new(self.build_supply_chain_element(raw)?))
            }
            EntityKind::Property => AnyEntity::Property(Arc::new(self.build_property(raw)?)),
            EntityKind::SemanticReference => {
                AnyEntity::SemanticReference(Arc::new(self.build_semantic_reference(raw)?))
            }
            EntityKind::Location => AnyEntity::Location(Arc::new(self.build_location(raw)?)),
            EntityKind::ProductPassport => {
                AnyEntity::ProductPassport(Arc::new(self.build_product_passport(raw)?))
            }
            EntityKind::Certificate => {
                AnyEntity::Certificate(Arc::new(self.build_certificate(raw)?))
            }
        };

        self.done.insert(id.clone(), entity);
        Ok(())
    }

    resolver!(resolve_enterprise, Enterprise, Enterprise, "enterprise");
    resolver!(resolve_factory, Factory, Factory, "factory");
    resolver!(
        resolve_production_resource,
        ProductionResource,
        ProductionResource,
        "production resource"
    );
    resolver!(resolve_process, Process, Process, "process");
    resolver!(resolve_capability, Capability, Capability, "capability");
    resolver!(resolve_product, Product, Product, "product");
    resolver!(resolve_product_class, ProductClass, ProductClass, "product class");
    resolver!(resolve_supply_chain, SupplyChain, SupplyChain, "supply chain");
    resolver!(
        resolve_supply_chain_element,
        SupplyChainElement,
        SupplyChainElement,
        "supply chain element"
    );
    resolver!(resolve_property, Property, Property, "property");
    resolver!(
        resolve_semantic_reference,
        SemanticReference,
        SemanticReference,
        "semantic reference"
    );
    resolver!(resolve_location, Location, Location, "location");
    resolver!(
        resolve_product_passport,
        ProductPassport,
        ProductPassport,
        "product passport"
    );
    resolver!(resolve_certificate, Certificate, Certificate, "certificate");

    /// Product applications tolerate dangling references: a target that was
    /// queried and found absent materializes as a placeholder wrapping the
    /// identifier as its product.
    fn resolve_product_application(
        &self,
        id: &EntityId,
    ) -> Result<Linked<ProductApplication>, HydrationError> {
        match self.done.get(id) {
            Some(AnyEntity::ProductApplication(entity)) => Ok(Linked::Full(entity.clone())),
            Some(other) => Err(HydrationError::KindMismatch {
                id: id.clone(),
                expected: "product application",
                found: other.kind(),
            }),
            None if self.traversal.missing.contains(id) => {
                Ok(Linked::Full(placeholder_application(id)))
            }
            None => Ok(Linked::Stub(id.clone())),
        }
    }

    fn build_enterprise(&self, raw: &RawEntity) -> Result<Enterprise, HydrationError> {
        let mut entity = Enterprise::new(raw.id.clone());
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        if let Some(target) = raw.single_edge("location") {
            entity.location = Some(self.resolve_location(target)?);
        }
        for target in raw.edge("factories") {
            entity.factories.insert(self.resolve_factory(target)?);
        }
        for target in raw.edge("subsidiaryEnterprises") {
            entity
                .subsidiary_enterprises
                .insert(self.resolve_enterprise(target)?);
        }
        for target in raw.edge("products") {
            entity.products.insert(self.resolve_product(target)?);
        }
        for target in raw.edge("processes") {
            entity.processes.insert(self.resolve_process(target)?);
        }
        for target in raw.edge("productionResources") {
            entity
                .production_resources
                .insert(self.resolve_production_resource(target)?);
        }
        for target in raw.edge("supplyChains") {
            entity.supply_chains.insert(self.resolve_supply_chain(target)?);
        }
        for target in raw.edge("certificates") {
            entity.certificates.insert(self.resolve_certificate(target)?);
        }
        Ok(entity)
    }

    fn build_factory(&self, raw: &RawEntity) -> Result<Factory, HydrationError> {
        let mut entity = Factory::new(raw.id.clone());
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        if let Some(target) = raw.single_edge("location") {
            entity.location = Some(self.resolve_location(target)?);
        }
        if let Some(target) = raw.single_edge("enterprise") {
            entity.enterprise = Some(self.resolve_enterprise(target)?);
        }
        for target in raw.edge("productionResources") {
            entity
                .production_resources
                .insert(self.resolve_production_resource(target)?);
        }
        for target in raw.edge("products") {
            entity.products.insert(self.resolve_product(target)?);
        }
        for target in raw.edge("processes") {
            entity.processes.insert(self.resolve_process(target)?);
        }
        for target in raw.edge("certificates") {
            entity.certificates.insert(self.resolve_certificate(target)?);
        }
        Ok(entity)
    }

    fn build_resource(&self, raw: &RawEntity) -> Result<ProductionResource, HydrationError> {
        let variant = match raw.kind {
            EntityKind::Machine => ResourceVariant::Machine,
            EntityKind::HumanResource => {
                let mut certificates = BTreeSet::new();
                for target in raw.edge("certificates") {
                    certificates.insert(self.resolve_certificate(target)?);
                }
                ResourceVariant::HumanResource { certificates }
            }
            other => {
                return Err(HydrationError::KindMismatch {
                    id: raw.id.clone(),
                    expected: "production resource",
                    found: other,
                });
            }
        };
        let mut entity = ProductionResource::new(raw.id.clone(), variant);
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        for target in raw.edge("providedProcesses") {
            entity.provided_processes.insert(self.resolve_process(target)?);
        }
        for target in raw.edge("usingProcesses") {
            entity.using_processes.insert(self.resolve_process(target)?);
        }
        for target in raw.edge("providedCapabilities") {
            entity
                .provided_capabilities
                .insert(self.resolve_capability(target)?);
        }
        Ok(entity)
    }

    fn build_process(&self, raw: &RawEntity) -> Result<Process, HydrationError> {
        let mut entity = Process::new(raw.id.clone());
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        for target in raw.edge("parentProcesses") {
            entity.parent_processes.insert(self.resolve_process(target)?);
        }
        for target in raw.edge("childProcesses") {
            entity.child_processes.insert(self.resolve_process(target)?);
        }
        for target in raw.edge("realizedCapabilities") {
            entity
                .realized_capabilities
                .insert(self.resolve_capability(target)?);
        }
        for target in raw.edge("requiredCapabilities") {
            entity
                .required_capabilities
                .insert(self.resolve_capability(target)?);
        }
        for (field, set) in [
            ("rawMaterials", &mut entity.raw_materials),
            ("auxiliaryMaterials", &mut entity.auxiliary_materials),
            ("operatingMaterials", &mut entity.operating_materials),
            ("preliminaryProducts", &mut entity.preliminary_products),
            ("endProducts", &mut entity.end_products),
            ("byProducts", &mut entity.by_products),
            ("wasteProducts", &mut entity.waste_products),
        ] {
            for target in raw.edge(field) {
                set.insert(self.resolve_product_application(target)?);
            }
        }
        for target in raw.edge("usedProductionResources") {
            entity
                .used_production_resources
                .insert(self.resolve_production_resource(target)?);
        }
        for target in raw.edge("providingProductionResources") {
            entity
                .providing_production_resources
                .insert(self.resolve_production_resource(target)?);
        }
        Ok(entity)
    }

    fn build_capability(&self, raw: &RawEntity) -> Result<Capability, HydrationError> {
        let mut entity = Capability::new(raw.id.clone());
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        for target in raw.edge("parentCapabilities") {
            entity
                .parent_capabilities
                .insert(self.resolve_capability(target)?);
        }
        for target in raw.edge("childCapabilities") {
            entity
                .child_capabilities
                .insert(self.resolve_capability(target)?);
        }
        for target in raw.edge("processes") {
            entity.processes.insert(self.resolve_process(target)?);
        }
        for target in raw.edge("productionResources") {
            entity
                .production_resources
                .insert(self.resolve_production_resource(target)?);
        }
        for target in raw.edge("properties") {
            entity.properties.insert(self.resolve_property(target)?);
        }
        for target in raw.edge("semanticReferences") {
            entity
                .semantic_references
                .insert(self.resolve_semantic_reference(target)?);
        }
        Ok(entity)
    }

    fn build_product(&self, raw: &RawEntity) -> Result<Product, HydrationError> {
        let mut entity = Product::new(raw.id.clone());
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        for target in raw.edge("productApplications") {
            entity
                .product_applications
                .insert(self.resolve_product_application(target)?);
        }
        for target in raw.edge("productClasses") {
            entity
                .product_classes
                .insert(self.resolve_product_class(target)?);
        }
        for target in raw.edge("semanticReferences") {
            entity
                .semantic_references
                .insert(self.resolve_semantic_reference(target)?);
        }
        for target in raw.edge("factories") {
            entity.factories.insert(self.resolve_factory(target)?);
        }
        for target in raw.edge("enterprises") {
            entity.enterprises.insert(self.resolve_enterprise(target)?);
        }
        for target in raw.edge("supplyChains") {
            entity.supply_chains.insert(self.resolve_supply_chain(target)?);
        }
        if let Some(target) = raw.single_edge("productPassport") {
            entity.product_passport = Some(self.resolve_product_passport(target)?);
        }
        Ok(entity)
    }

    fn build_product_application(
        &self,
        raw: &RawEntity,
    ) -> Result<ProductApplication, HydrationError> {
        let mut entity = ProductApplication::new(raw.id.clone());
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        if let Some(target) = raw.single_edge("product") {
            entity.product = Some(self.resolve_product(target)?);
        }
        if let Some(target) = raw.single_edge("quantity") {
            entity.quantity = Some(self.resolve_property(target)?);
        }
        for target in raw.edge("properties") {
            entity.properties.insert(self.resolve_property(target)?);
        }
        Ok(entity)
    }

    fn build_product_class(&self, raw: &RawEntity) -> Result<ProductClass, HydrationError> {
        let mut entity = ProductClass::new(raw.id.clone());
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        for target in raw.edge("parentClasses") {
            entity.parent_classes.insert(self.resolve_product_class(target)?);
        }
        for target in raw.edge("childClasses") {
            entity.child_classes.insert(self.resolve_product_class(target)?);
        }
        for target in raw.edge("products") {
            entity.products.insert(self.resolve_product(target)?);
        }
        for target in raw.edge("semanticReferences") {
            entity
                .semantic_references
                .insert(self.resolve_semantic_reference(target)?);
        }
        Ok(entity)
    }

    fn build_supply_chain(&self, raw: &RawEntity) -> Result<SupplyChain, HydrationError> {
        let mut entity = SupplyChain::new(raw.id.clone());
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        for target in raw.edge("elements") {
            entity
                .elements
                .insert(self.resolve_supply_chain_element(target)?);
        }
        Ok(entity)
    }

    fn build_supply_chain_element(
        &self,
        raw: &RawEntity,
    ) -> Result<SupplyChainElement, HydrationError> {
        let mut entity = SupplyChainElement::new(raw.id.clone());
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        for target in raw.edge("suppliers") {
            entity
                .suppliers
                .insert(self.resolve_supply_chain_element(target)?);
        }
        if let Some(target) = raw.single_edge("enterprise") {
            entity.enterprise = Some(self.resolve_enterprise(target)?);
        }
        if let Some(target) = raw.single_edge("factory") {
            entity.factory = Some(self.resolve_factory(target)?);
        }
        for target in raw.edge("products") {
            entity.products.insert(self.resolve_product(target)?);
        }
        Ok(entity)
    }

    fn build_property(&self, raw: &RawEntity) -> Result<Property, HydrationError> {
        let mut entity = Property::new(raw.id.clone());
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        entity.value = raw.scalar_text("value");
        for target in raw.edge("semanticReferences") {
            entity
                .semantic_references
                .insert(self.resolve_semantic_reference(target)?);
        }
        Ok(entity)
    }

    fn build_semantic_reference(
        &self,
        raw: &RawEntity,
    ) -> Result<SemanticReference, HydrationError> {
        let mut entity = SemanticReference::new(raw.id.clone());
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        entity.source_uri = raw.scalar_text("sourceUri");
        Ok(entity)
    }

    fn build_location(&self, raw: &RawEntity) -> Result<Location, HydrationError> {
        let mut entity = Location::new(raw.id.clone());
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        entity.street = raw.scalar_text("street");
        entity.zip = raw.scalar_text("zip");
        entity.city = raw.scalar_text("city");
        entity.country = raw.scalar_text("country");
        entity.latitude = raw.scalar_text("latitude");
        entity.longitude = raw.scalar_text("longitude");
        Ok(entity)
    }

    fn build_product_passport(&self, raw: &RawEntity) -> Result<ProductPassport, HydrationError> {
        let mut entity = ProductPassport::new(raw.id.clone());
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        for target in raw.edge("properties") {
            entity.properties.insert(self.resolve_property(target)?);
        }
        Ok(entity)
    }

    fn build_certificate(&self, raw: &RawEntity) -> Result<Certificate, HydrationError> {
        let mut entity = Certificate::new(raw.id.clone());
        entity.source_id = raw.scalar_text("sourceId");
        entity.label = raw.scalar("label").cloned();
        entity.description = raw.scalar("description").cloned();
        for target in raw.edge("semanticReferences") {
            entity
                .semantic_references
                .insert(self.resolve_semantic_reference(target)?);
        }
        Ok(entity)
    }
}
