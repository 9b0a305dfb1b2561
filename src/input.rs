//! Nested input trees for create and update.
//!
//! The API layer deserializes one typed input struct per entity kind; each
//! lowers into the generic [`InputNode`] the mutation engine walks. Lowering
//! is pure data shuffling — validation happens in the engine, before any
//! remote call.
//!
//! Presence semantics matter: `None` means "field not supplied", which an
//! update must leave untouched; empty relation lists mean "no change", never
//! "unlink everything".

use serde::{Deserialize, Serialize};

use crate::model::{EntityId, EntityKind};

/// Generic input node: one entity to create, reference, or patch.
#[derive(Debug, Clone)]
pub struct InputNode {
    pub kind: EntityKind,
    /// Present id means reference semantics: the node is resolved to the
    /// existing entity and everything else in it is ignored on create.
    pub id: Option<EntityId>,
    pub scalars: Vec<ScalarInput>,
    pub relations: Vec<RelationInput>,
}

/// One supplied scalar. For language-tagged fields the text and the tag
/// arrive independently; either may be present without the other.
#[derive(Debug, Clone)]
pub struct ScalarInput {
    pub field: &'static str,
    pub text: Option<String>,
    pub language: Option<String>,
}

/// One supplied relation family with its nested nodes.
#[derive(Debug, Clone)]
pub struct RelationInput {
    pub field: &'static str,
    pub nodes: Vec<InputNode>,
}

fn scalar(field: &'static str, text: Option<String>, language: Option<String>) -> Option<ScalarInput> {
    if text.is_none() && language.is_none() {
        None
    } else {
        Some(ScalarInput {
            field,
            text,
            language,
        })
    }
}

fn plain(field: &'static str, text: Option<String>) -> Option<ScalarInput> {
    scalar(field, text, None)
}

fn relation(field: &'static str, nodes: Vec<InputNode>) -> Option<RelationInput> {
    if nodes.is_empty() {
        None
    } else {
        Some(RelationInput { field, nodes })
    }
}

/// Scalar fields shared by every input struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommonInput {
    pub id: Option<EntityId>,
    pub source_id: Option<String>,
    pub label: Option<String>,
    pub label_language_code: Option<String>,
    pub description: Option<String>,
    pub description_language_code: Option<String>,
}

impl CommonInput {
    pub fn with_label(label: impl Into<String>, language: impl Into<String>) -> Self {
        CommonInput {
            label: Some(label.into()),
            label_language_code: Some(language.into()),
            ..CommonInput::default()
        }
    }

    pub fn reference(id: EntityId) -> Self {
        CommonInput {
            id: Some(id),
            ..CommonInput::default()
        }
    }

    fn scalars(&self) -> Vec<ScalarInput> {
        let mut scalars = Vec::new();
        scalars.extend(plain("sourceId", self.source_id.clone()));
        scalars.extend(scalar(
            "label",
            self.label.clone(),
            self.label_language_code.clone(),
        ));
        scalars.extend(scalar(
            "description",
            self.description.clone(),
            self.description_language_code.clone(),
        ));
        scalars
    }

    fn node(&self, kind: EntityKind) -> InputNode {
        InputNode {
            kind,
            id: self.id.clone(),
            scalars: self.scalars(),
            relations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnterpriseInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub location: Option<LocationInput>,
    pub factories: Vec<FactoryInput>,
    pub subsidiary_enterprises: Vec<EnterpriseInput>,
    pub products: Vec<ProductInput>,
    pub processes: Vec<ProcessInput>,
    pub production_resources: Vec<ProductionResourceInput>,
    pub supply_chains: Vec<SupplyChainInput>,
    pub certificates: Vec<CertificateInput>,
}

impl EnterpriseInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::Enterprise);
        node.relations.extend(relation(
            "location",
            self.location.into_iter().map(LocationInput::into_node).collect(),
        ));
        node.relations.extend(relation(
            "factories",
            self.factories.into_iter().map(FactoryInput::into_node).collect(),
        ));
        node.relations.extend(relation(
            "subsidiaryEnterprises",
            self.subsidiary_enterprises
                .into_iter()
                .map(EnterpriseInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "products",
            self.products.into_iter().map(ProductInput::into_node).collect(),
        ));
        node.relations.extend(relation(
            "processes",
            self.processes.into_iter().map(ProcessInput::into_node).collect(),
        ));
        node.relations.extend(relation(
            "productionResources",
            self.production_resources
                .into_iter()
                .map(ProductionResourceInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "supplyChains",
            self.supply_chains
                .into_iter()
                .map(SupplyChainInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "certificates",
            self.certificates
                .into_iter()
                .map(CertificateInput::into_node)
                .collect(),
        ));
        node
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FactoryInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub location: Option<LocationInput>,
    pub enterprise: Option<Box<EnterpriseInput>>,
    pub production_resources: Vec<ProductionResourceInput>,
    pub products: Vec<ProductInput>,
    pub processes: Vec<ProcessInput>,
    pub certificates: Vec<CertificateInput>,
}

impl FactoryInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::Factory);
        node.relations.extend(relation(
            "location",
            self.location.into_iter().map(LocationInput::into_node).collect(),
        ));
        node.relations.extend(relation(
            "enterprise",
            self.enterprise
                .into_iter()
                .map(|input| input.into_node())
                .collect(),
        ));
        node.relations.extend(relation(
            "productionResources",
            self.production_resources
                .into_iter()
                .map(ProductionResourceInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "products",
            self.products.into_iter().map(ProductInput::into_node).collect(),
        ));
        node.relations.extend(relation(
            "processes",
            self.processes.into_iter().map(ProcessInput::into_node).collect(),
        ));
        node.relations.extend(relation(
            "certificates",
            self.certificates
                .into_iter()
                .map(CertificateInput::into_node)
                .collect(),
        ));
        node
    }
}

/// A machine or human resource in an input position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProductionResourceInput {
    Machine(MachineInput),
    HumanResource(HumanResourceInput),
}

impl ProductionResourceInput {
    pub fn into_node(self) -> InputNode {
        match self {
            ProductionResourceInput::Machine(input) => input.into_node(),
            ProductionResourceInput::HumanResource(input) => input.into_node(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MachineInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub provided_processes: Vec<ProcessInput>,
    pub using_processes: Vec<ProcessInput>,
    pub provided_capabilities: Vec<CapabilityInput>,
}

impl MachineInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::Machine);
        node.relations.extend(relation(
            "providedProcesses",
            self.provided_processes
                .into_iter()
                .map(ProcessInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "usingProcesses",
            self.using_processes
                .into_iter()
                .map(ProcessInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "providedCapabilities",
            self.provided_capabilities
                .into_iter()
                .map(CapabilityInput::into_node)
                .collect(),
        ));
        node
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HumanResourceInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub provided_processes: Vec<ProcessInput>,
    pub using_processes: Vec<ProcessInput>,
    pub provided_capabilities: Vec<CapabilityInput>,
    pub certificates: Vec<CertificateInput>,
}

impl HumanResourceInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::HumanResource);
        node.relations.extend(relation(
            "providedProcesses",
            self.provided_processes
                .into_iter()
                .map(ProcessInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "usingProcesses",
            self.using_processes
                .into_iter()
                .map(ProcessInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "providedCapabilities",
            self.provided_capabilities
                .into_iter()
                .map(CapabilityInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "certificates",
            self.certificates
                .into_iter()
                .map(CertificateInput::into_node)
                .collect(),
        ));
        node
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub parent_processes: Vec<ProcessInput>,
    pub child_processes: Vec<ProcessInput>,
    pub realized_capabilities: Vec<CapabilityInput>,
    pub required_capabilities: Vec<CapabilityInput>,
    pub raw_materials: Vec<ProductApplicationInput>,
    pub auxiliary_materials: Vec<ProductApplicationInput>,
    pub operating_materials: Vec<ProductApplicationInput>,
    pub preliminary_products: Vec<ProductApplicationInput>,
    pub end_products: Vec<ProductApplicationInput>,
    pub by_products: Vec<ProductApplicationInput>,
    pub waste_products: Vec<ProductApplicationInput>,
    pub used_production_resources: Vec<ProductionResourceInput>,
    pub providing_production_resources: Vec<ProductionResourceInput>,
}

impl ProcessInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::Process);
        node.relations.extend(relation(
            "parentProcesses",
            self.parent_processes
                .into_iter()
                .map(ProcessInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "childProcesses",
            self.child_processes
                .into_iter()
                .map(ProcessInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "realizedCapabilities",
            self.realized_capabilities
                .into_iter()
                .map(CapabilityInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "requiredCapabilities",
            self.required_capabilities
                .into_iter()
                .map(CapabilityInput::into_node)
                .collect(),
        ));
        for (field, applications) in [
            ("rawMaterials", self.raw_materials),
            ("auxiliaryMaterials", self.auxiliary_materials),
            ("operatingMaterials", self.operating_materials),
            ("preliminaryProducts", self.preliminary_products),
            ("endProducts", self.end_products),
            ("byProducts", self.by_products),
            ("wasteProducts", self.waste_products),
        ] {
            node.relations.extend(relation(
                field,
                applications
                    .into_iter()
                    .map(ProductApplicationInput::into_node)
                    .collect(),
            ));
        }
        node.relations.extend(relation(
            "usedProductionResources",
            self.used_production_resources
                .into_iter()
                .map(ProductionResourceInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "providingProductionResources",
            self.providing_production_resources
                .into_iter()
                .map(ProductionResourceInput::into_node)
                .collect(),
        ));
        node
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapabilityInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub parent_capabilities: Vec<CapabilityInput>,
    pub child_capabilities: Vec<CapabilityInput>,
    pub processes: Vec<ProcessInput>,
    pub production_resources: Vec<ProductionResourceInput>,
    pub properties: Vec<PropertyInput>,
    pub semantic_references: Vec<SemanticReferenceInput>,
}

impl CapabilityInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::Capability);
        node.relations.extend(relation(
            "parentCapabilities",
            self.parent_capabilities
                .into_iter()
                .map(CapabilityInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "childCapabilities",
            self.child_capabilities
                .into_iter()
                .map(CapabilityInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "processes",
            self.processes.into_iter().map(ProcessInput::into_node).collect(),
        ));
        node.relations.extend(relation(
            "productionResources",
            self.production_resources
                .into_iter()
                .map(ProductionResourceInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "properties",
            self.properties.into_iter().map(PropertyInput::into_node).collect(),
        ));
        node.relations.extend(relation(
            "semanticReferences",
            self.semantic_references
                .into_iter()
                .map(SemanticReferenceInput::into_node)
                .collect(),
        ));
        node
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub product_applications: Vec<ProductApplicationInput>,
    pub product_classes: Vec<ProductClassInput>,
    pub semantic_references: Vec<SemanticReferenceInput>,
    pub factories: Vec<FactoryInput>,
    pub enterprises: Vec<EnterpriseInput>,
    pub product_passport: Option<ProductPassportInput>,
}

impl ProductInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::Product);
        node.relations.extend(relation(
            "productApplications",
            self.product_applications
                .into_iter()
                .map(ProductApplicationInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "productClasses",
            self.product_classes
                .into_iter()
                .map(ProductClassInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "semanticReferences",
            self.semantic_references
                .into_iter()
                .map(SemanticReferenceInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "factories",
            self.factories.into_iter().map(FactoryInput::into_node).collect(),
        ));
        node.relations.extend(relation(
            "enterprises",
            self.enterprises
                .into_iter()
                .map(EnterpriseInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "productPassport",
            self.product_passport
                .into_iter()
                .map(ProductPassportInput::into_node)
                .collect(),
        ));
        node
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductApplicationInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub product: Option<Box<ProductInput>>,
    pub quantity: Option<PropertyInput>,
    pub properties: Vec<PropertyInput>,
}

impl ProductApplicationInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::ProductApplication);
        node.relations.extend(relation(
            "product",
            self.product.into_iter().map(|input| input.into_node()).collect(),
        ));
        node.relations.extend(relation(
            "quantity",
            self.quantity.into_iter().map(PropertyInput::into_node).collect(),
        ));
        node.relations.extend(relation(
            "properties",
            self.properties.into_iter().map(PropertyInput::into_node).collect(),
        ));
        node
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductClassInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub parent_classes: Vec<ProductClassInput>,
    pub child_classes: Vec<ProductClassInput>,
    pub products: Vec<ProductInput>,
    pub semantic_references: Vec<SemanticReferenceInput>,
}

impl ProductClassInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::ProductClass);
        node.relations.extend(relation(
            "parentClasses",
            self.parent_classes
                .into_iter()
                .map(ProductClassInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "childClasses",
            self.child_classes
                .into_iter()
                .map(ProductClassInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "products",
            self.products.into_iter().map(ProductInput::into_node).collect(),
        ));
        node.relations.extend(relation(
            "semanticReferences",
            self.semantic_references
                .into_iter()
                .map(SemanticReferenceInput::into_node)
                .collect(),
        ));
        node
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplyChainInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub elements: Vec<SupplyChainElementInput>,
}

impl SupplyChainInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::SupplyChain);
        node.relations.extend(relation(
            "elements",
            self.elements
                .into_iter()
                .map(SupplyChainElementInput::into_node)
                .collect(),
        ));
        node
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplyChainElementInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub suppliers: Vec<SupplyChainElementInput>,
    pub enterprise: Option<Box<EnterpriseInput>>,
    pub factory: Option<Box<FactoryInput>>,
    pub products: Vec<ProductInput>,
}

impl SupplyChainElementInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::SupplyChainElement);
        node.relations.extend(relation(
            "suppliers",
            self.suppliers
                .into_iter()
                .map(SupplyChainElementInput::into_node)
                .collect(),
        ));
        node.relations.extend(relation(
            "enterprise",
            self.enterprise
                .into_iter()
                .map(|input| input.into_node())
                .collect(),
        ));
        node.relations.extend(relation(
            "factory",
            self.factory.into_iter().map(|input| input.into_node()).collect(),
        ));
        node.relations.extend(relation(
            "products",
            self.products.into_iter().map(ProductInput::into_node).collect(),
        ));
        node
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub value: Option<String>,
    pub semantic_references: Vec<SemanticReferenceInput>,
}

impl PropertyInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::Property);
        node.scalars.extend(plain("value", self.value));
        node.relations.extend(relation(
            "semanticReferences",
            self.semantic_references
                .into_iter()
                .map(SemanticReferenceInput::into_node)
                .collect(),
        ));
        node
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SemanticReferenceInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub source_uri: Option<String>,
}

impl SemanticReferenceInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::SemanticReference);
        node.scalars.extend(plain("sourceUri", self.source_uri));
        node
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub street: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl LocationInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::Location);
        node.scalars.extend(plain("street", self.street));
        node.scalars.extend(plain("zip", self.zip));
        node.scalars.extend(plain("city", self.city));
        node.scalars.extend(plain("country", self.country));
        node.scalars.extend(plain("latitude", self.latitude));
        node.scalars.extend(plain("longitude", self.longitude));
        node
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPassportInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub properties: Vec<PropertyInput>,
}

impl ProductPassportInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::ProductPassport);
        node.relations.extend(relation(
            "properties",
            self.properties.into_iter().map(PropertyInput::into_node).collect(),
        ));
        node
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateInput {
    #[serde(flatten)]
    pub common: CommonInput,
    pub semantic_references: Vec<SemanticReferenceInput>,
}

impl CertificateInput {
    pub fn into_node(self) -> InputNode {
        let mut node = self.common.node(EntityKind::Certificate);
        node.relations.extend(relation(
            "semanticReferences",
            self.semantic_references
                .into_iter()
                .map(SemanticReferenceInput::into_node)
                .collect(),
        ));
        node
    }
}
