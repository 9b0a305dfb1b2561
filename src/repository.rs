//! The repository facade consumed by the API layer.
//!
//! One hydration entry point per entity kind, one create/update per kind,
//! kind-agnostic delete and relation operations. Every method resolves the
//! caller's graph scopes first, builds the per-call engines, and performs a
//! sequence of awaited remote calls — nothing is cached between calls.

use std::sync::Arc;

use crate::error::{RepositoryError, Result};
use crate::hydrate::{HydrationEngine, HydrationError};
use crate::input::{
    CapabilityInput, CertificateInput, EnterpriseInput, FactoryInput, HumanResourceInput,
    InputNode, LocationInput, MachineInput, ProcessInput, ProductApplicationInput,
    ProductClassInput, ProductInput, ProductPassportInput, PropertyInput,
    SemanticReferenceInput, SupplyChainElementInput, SupplyChainInput,
};
use crate::model::{
    AnyEntity, Capability, Certificate, Enterprise, EntityId, EntityKind, Factory, Location,
    Process, Product, ProductApplication, ProductClass, ProductPassport, ProductionResource,
    Property, SemanticReference, SupplyChain, SupplyChainElement,
};
use crate::mutate::{MutationEngine, MutationError};
use crate::schema::FetchKind;
use crate::scope::{self, Caller};
use crate::transport::SparqlTransport;

const DEFAULT_MAX_DEPTH: usize = 32;

pub struct GraphRepository<T: SparqlTransport> {
    transport: T,
    max_depth: usize,
}

impl<T: SparqlTransport> GraphRepository<T> {
    pub fn new(transport: T) -> Self {
        GraphRepository {
            transport,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(transport: T, max_depth: usize) -> Self {
        GraphRepository {
            transport,
            max_depth: max_depth.max(1),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn hydration(&self) -> HydrationEngine<'_> {
        HydrationEngine::new(&self.transport, self.max_depth)
    }

    fn mutation(&self) -> MutationEngine<'_> {
        MutationEngine::new(&self.transport, self.max_depth)
    }

    // =========================================================================
    // Kind-agnostic operations
    // =========================================================================

    /// Hydrate any entity by kind and identifier.
    pub async fn get_entity(
        &self,
        caller: &Caller,
        kind: EntityKind,
        id: &EntityId,
    ) -> Result<Option<AnyEntity>> {
        let read = scope::resolve_read_scope(caller)?;
        self.hydration()
            .hydrate(id, FetchKind::Exact(kind), &read)
            .await
    }

    /// Delete with verify-by-read. `Ok(true)` means gone, including the
    /// never-existed case; `Ok(false)` means the store still answers for the
    /// identifier.
    pub async fn delete(
        &self,
        caller: &Caller,
        kind: EntityKind,
        id: &EntityId,
    ) -> Result<bool> {
        let write = scope::resolve_write_scope(caller)?;
        let read = scope::resolve_read_scope(caller)?;
        self.mutation()
            .delete(&write, &read, id, FetchKind::Exact(kind))
            .await
    }

    /// Delete `id` plus everything it owns at one and two hops over the
    /// ownership predicates.
    pub async fn bulk_delete(
        &self,
        caller: &Caller,
        kind: EntityKind,
        id: &EntityId,
    ) -> Result<bool> {
        let write = scope::resolve_write_scope(caller)?;
        let read = scope::resolve_read_scope(caller)?;
        self.mutation()
            .bulk_delete(&write, &read, id, FetchKind::Exact(kind))
            .await
    }

    /// Attach an existing entity to a relation of another existing entity.
    pub async fn link(
        &self,
        caller: &Caller,
        kind: EntityKind,
        entity: &EntityId,
        field: &str,
        target: &EntityId,
    ) -> Result<()> {
        let write = scope::resolve_write_scope(caller)?;
        self.mutation().link(&write, kind, entity, field, target).await
    }

    /// Detach one relation edge, leaving both entities in place.
    pub async fn unlink(
        &self,
        caller: &Caller,
        kind: EntityKind,
        entity: &EntityId,
        field: &str,
        target: &EntityId,
    ) -> Result<()> {
        let write = scope::resolve_write_scope(caller)?;
        self.mutation()
            .unlink(&write, kind, entity, field, target)
            .await
    }

    /// Create a nested input tree and link its root to `entity.field`.
    pub async fn create_linked(
        &self,
        caller: &Caller,
        kind: EntityKind,
        entity: &EntityId,
        field: &str,
        node: InputNode,
    ) -> Result<EntityId> {
        let write = scope::resolve_write_scope(caller)?;
        let created = self.mutation().create(&write, &node).await?;
        self.mutation()
            .link(&write, kind, entity, field, &created)
            .await?;
        Ok(created)
    }

    async fn require<E>(
        &self,
        caller: &Caller,
        id: &EntityId,
        fetch: FetchKind,
        into: fn(AnyEntity) -> Option<Arc<E>>,
        expected: &'static str,
    ) -> Result<Arc<E>> {
        let read = scope::resolve_read_scope(caller)?;
        let entity = self
            .hydration()
            .hydrate(id, fetch, &read)
            .await?
            .ok_or_else(|| {
                RepositoryError::Mutation(MutationError::NotFound { id: id.clone() })
            })?;
        let found = entity.kind();
        into(entity).ok_or_else(|| {
            RepositoryError::Hydration(HydrationError::KindMismatch {
                id: id.clone(),
                expected,
                found,
            })
        })
    }

    // =========================================================================
    // Production resources (abstract entry point)
    // =========================================================================

    /// Hydrate a production resource without knowing the variant up front;
    /// the store's type marker decides machine vs human resource.
    pub async fn get_production_resource_by_id(
        &self,
        caller: &Caller,
        id: &EntityId,
    ) -> Result<Option<Arc<ProductionResource>>> {
        let read = scope::resolve_read_scope(caller)?;
        let entity = self
            .hydration()
            .hydrate(id, FetchKind::Resource, &read)
            .await?;
        Ok(entity.and_then(AnyEntity::into_production_resource))
    }
}

macro_rules! entity_api {
    (
        $get:ident, $create:ident, $update:ident,
        $input:ty, $entity:ty, $kind:expr, $into:ident, $label:literal
    ) => {
        impl<T: SparqlTransport> GraphRepository<T> {
            pub async fn $get(
                &self,
                caller: &Caller,
                id: &EntityId,
            ) -> Result<Option<Arc<$entity>>> {
                let read = scope::resolve_read_scope(caller)?;
                let entity = self.hydration().hydrate(id, $kind, &read).await?;
                Ok(entity.and_then(AnyEntity::$into))
            }

            pub async fn $create(
                &self,
                caller: &Caller,
                input: $input,
            ) -> Result<Arc<$entity>> {
                let write = scope::resolve_write_scope(caller)?;
                let node = input.into_node();
                let id = self.mutation().create(&write, &node).await?;
                self.require(caller, &id, $kind, AnyEntity::$into, $label).await
            }

            pub async fn $update(
                &self,
                caller: &Caller,
                id: &EntityId,
                input: $input,
            ) -> Result<Arc<$entity>> {
                let write = scope::resolve_write_scope(caller)?;
                let read = scope::resolve_read_scope(caller)?;
                let node = input.into_node();
                self.mutation().update(&write, &read, id, &node).await?;
                self.require(caller, id, $kind, AnyEntity::$into, $label).await
            }
        }
    };
}

entity_api!(
    get_enterprise_by_id, create_enterprise, update_enterprise,
    EnterpriseInput, Enterprise,
    FetchKind::Exact(EntityKind::Enterprise), into_enterprise, "enterprise"
);
entity_api!(
    get_factory_by_id, create_factory, update_factory,
    FactoryInput, Factory,
    FetchKind::Exact(EntityKind::Factory), into_factory, "factory"
);
entity_api!(
    get_machine_by_id, create_machine, update_machine,
    MachineInput, ProductionResource,
    FetchKind::Exact(EntityKind::Machine), into_production_resource, "machine"
);
entity_api!(
    get_human_resource_by_id, create_human_resource, update_human_resource,
    HumanResourceInput, ProductionResource,
    FetchKind::Exact(EntityKind::HumanResource), into_production_resource, "human resource"
);
entity_api!(
    get_process_by_id, create_process, update_process,
    ProcessInput, Process,
    FetchKind::Exact(EntityKind::Process), into_process, "process"
);
entity_api!(
    get_capability_by_id, create_capability, update_capability,
    CapabilityInput, Capability,
    FetchKind::Exact(EntityKind::Capability), into_capability, "capability"
);
entity_api!(
    get_product_by_id, create_product, update_product,
    ProductInput, Product,
    FetchKind::Exact(EntityKind::Product), into_product, "product"
);
entity_api!(
    get_product_application_by_id, create_product_application, update_product_application,
    ProductApplicationInput, ProductApplication,
    FetchKind::Exact(EntityKind::ProductApplication), into_product_application,
    "product application"
);
entity_api!(
    get_product_class_by_id, create_product_class, update_product_class,
    ProductClassInput, ProductClass,
    FetchKind::Exact(EntityKind::ProductClass), into_product_class, "product class"
);
entity_api!(
    get_supply_chain_by_id, create_supply_chain, update_supply_chain,
    SupplyChainInput, SupplyChain,
    FetchKind::Exact(EntityKind::SupplyChain), into_supply_chain, "supply chain"
);
entity_api!(
    get_supply_chain_element_by_id, create_supply_chain_element, update_supply_chain_element,
    SupplyChainElementInput, SupplyChainElement,
    FetchKind::Exact(EntityKind::SupplyChainElement), into_supply_chain_element,
    "supply chain element"
);
entity_api!(
    get_property_by_id, create_property, update_property,
    PropertyInput, Property,
    FetchKind::Exact(EntityKind::Property), into_property, "property"
);
entity_api!(
    get_semantic_reference_by_id, create_semantic_reference, update_semantic_reference,
    SemanticReferenceInput, SemanticReference,
    FetchKind::Exact(EntityKind::SemanticReference), into_semantic_reference,
    "semantic reference"
);
entity_api!(
    get_location_by_id, create_location, update_location,
    LocationInput, Location,
    FetchKind::Exact(EntityKind::Location), into_location, "location"
);
entity_api!(
    get_product_passport_by_id, create_product_passport, update_product_passport,
    ProductPassportInput, ProductPassport,
    FetchKind::Exact(EntityKind::ProductPassport), into_product_passport, "product passport"
);
entity_api!(
    get_certificate_by_id, create_certificate, update_certificate,
    CertificateInput, Certificate,
    FetchKind::Exact(EntityKind::Certificate), into_certificate, "certificate"
);

// =============================================================================
// Relation-attach convenience surface
// =============================================================================

impl<T: SparqlTransport> GraphRepository<T> {
    pub async fn add_factory_to_enterprise(
        &self,
        caller: &Caller,
        enterprise: &EntityId,
        factory: &EntityId,
    ) -> Result<()> {
        self.link(caller, EntityKind::Enterprise, enterprise, "factories", factory)
            .await
    }

    pub async fn remove_factory_from_enterprise(
        &self,
        caller: &Caller,
        enterprise: &EntityId,
        factory: &EntityId,
    ) -> Result<()> {
        self.unlink(caller, EntityKind::Enterprise, enterprise, "factories", factory)
            .await
    }

    pub async fn add_parent_capability_to_capability(
        &self,
        caller: &Caller,
        capability: &EntityId,
        parent: &EntityId,
    ) -> Result<()> {
        self.link(
            caller,
            EntityKind::Capability,
            capability,
            "parentCapabilities",
            parent,
        )
        .await
    }

    pub async fn remove_parent_capability_from_capability(
        &self,
        caller: &Caller,
        capability: &EntityId,
        parent: &EntityId,
    ) -> Result<()> {
        self.unlink(
            caller,
            EntityKind::Capability,
            capability,
            "parentCapabilities",
            parent,
        )
        .await
    }

    pub async fn add_child_process_to_process(
        &self,
        caller: &Caller,
        process: &EntityId,
        child: &EntityId,
    ) -> Result<()> {
        self.link(caller, EntityKind::Process, process, "childProcesses", child)
            .await
    }

    pub async fn add_supplier_to_supply_chain_element(
        &self,
        caller: &Caller,
        element: &EntityId,
        supplier: &EntityId,
    ) -> Result<()> {
        self.link(
            caller,
            EntityKind::SupplyChainElement,
            element,
            "suppliers",
            supplier,
        )
        .await
    }

    pub async fn create_process_for_factory(
        &self,
        caller: &Caller,
        factory: &EntityId,
        input: ProcessInput,
    ) -> Result<Arc<Process>> {
        let id = self
            .create_linked(
                caller,
                EntityKind::Factory,
                factory,
                "processes",
                input.into_node(),
            )
            .await?;
        self.require(
            caller,
            &id,
            FetchKind::Exact(EntityKind::Process),
            AnyEntity::into_process,
            "process",
        )
        .await
    }

    pub async fn create_property_for_capability(
        &self,
        caller: &Caller,
        capability: &EntityId,
        input: PropertyInput,
    ) -> Result<Arc<Property>> {
        let id = self
            .create_linked(
                caller,
                EntityKind::Capability,
                capability,
                "properties",
                input.into_node(),
            )
            .await?;
        self.require(
            caller,
            &id,
            FetchKind::Exact(EntityKind::Property),
            AnyEntity::into_property,
            "property",
        )
        .await
    }
}
