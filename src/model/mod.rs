//! Domain model: identifiers, language-tagged text, typed entities and the
//! stub/full reference type used to break cycles.

mod entities;
mod id;
mod kind;
mod value;

pub use entities::{
    AnyEntity, Capability, Certificate, Enterprise, Factory, HasId, Location, Process, Product,
    ProductApplication, ProductClass, ProductPassport, ProductionResource, Property,
    ResourceVariant, SemanticReference, SupplyChain, SupplyChainElement,
};
pub use id::EntityId;
pub use kind::EntityKind;
pub use value::{LangString, Linked};
