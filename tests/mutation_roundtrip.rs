// =============================================================================
// Create / update round trips through the mutation engine
// =============================================================================

mod common;

use plantgraph::input::{
    CapabilityInput, CommonInput, EnterpriseInput, FactoryInput, LocationInput, MachineInput,
    ProcessInput, ProductApplicationInput, ProductInput, ProductionResourceInput, PropertyInput,
    SemanticReferenceInput,
};
use plantgraph::model::ResourceVariant;
use plantgraph::mutate::MutationError;
use plantgraph::{RepositoryError, SparqlTransport, vocab};

#[tokio::test]
async fn create_then_hydrate_round_trips() {
    let repo = common::repo();
    let caller = common::caller();

    let input = EnterpriseInput {
        common: CommonInput {
            source_id: Some("ERP-7".into()),
            label: Some("Stahlwerk Nord".into()),
            label_language_code: Some("de".into()),
            description: Some("Integriertes Hüttenwerk".into()),
            description_language_code: Some("de".into()),
            ..CommonInput::default()
        },
        location: Some(LocationInput {
            city: Some("Linz".into()),
            country: Some("AT".into()),
            ..LocationInput::default()
        }),
        factories: vec![FactoryInput {
            common: CommonInput::with_label("Walzwerk", "de"),
            production_resources: vec![ProductionResourceInput::Machine(MachineInput {
                common: CommonInput::with_label("Walzgerüst", "de"),
                ..MachineInput::default()
            })],
            ..FactoryInput::default()
        }],
        ..EnterpriseInput::default()
    };

    let enterprise = repo.create_enterprise(&caller, input).await.unwrap();

    assert_eq!(enterprise.source_id.as_deref(), Some("ERP-7"));
    let label = enterprise.label.as_ref().unwrap();
    assert_eq!(label.text, "Stahlwerk Nord");
    assert_eq!(label.language.as_deref(), Some("de"));

    let location = enterprise
        .location
        .as_ref()
        .and_then(|location| location.entity())
        .expect("location hydrated");
    assert_eq!(location.city.as_deref(), Some("Linz"));

    assert_eq!(enterprise.factories.len(), 1);
    let factory = enterprise
        .factories
        .iter()
        .next()
        .unwrap()
        .entity()
        .expect("factory hydrated");
    assert_eq!(factory.label.as_ref().unwrap().text, "Walzwerk");

    assert_eq!(factory.production_resources.len(), 1);
    let resource = factory
        .production_resources
        .iter()
        .next()
        .unwrap()
        .entity()
        .expect("machine hydrated");
    assert!(matches!(resource.variant, ResourceVariant::Machine));
}

// Intent to confirm with the API owners: an input carrying an identifier is
// a pure reference. The reuse check is live — no identifier is allocated, no
// statement issued, and sibling fields on the node are ignored outright.
#[tokio::test]
async fn existing_id_is_reused_verbatim() {
    let repo = common::repo();
    let caller = common::caller();

    let original = repo
        .create_capability(
            &caller,
            CapabilityInput {
                common: CommonInput::with_label("Schweißen", "de"),
                ..CapabilityInput::default()
            },
        )
        .await
        .unwrap();

    let reused = repo
        .create_capability(
            &caller,
            CapabilityInput {
                common: CommonInput {
                    id: Some(original.id.clone()),
                    label: Some("Umbenannt".into()),
                    label_language_code: Some("de".into()),
                    ..CommonInput::default()
                },
                child_capabilities: vec![CapabilityInput {
                    common: CommonInput::with_label("Verloren", "de"),
                    ..CapabilityInput::default()
                }],
                ..CapabilityInput::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(reused.id, original.id);
    assert_eq!(reused.label.as_ref().unwrap().text, "Schweißen");
    assert!(reused.child_capabilities.is_empty());

    let capabilities = repo
        .transport()
        .select(&format!(
            "SELECT ?s WHERE {{ GRAPH ?g {{ ?s <{}> <{}> }} }}",
            vocab::RDF_TYPE,
            vocab::CLASS_CAPABILITY
        ))
        .await
        .unwrap();
    assert_eq!(capabilities.len(), 1, "no second capability was created");
}

#[tokio::test]
async fn nested_reference_is_linked_not_merged() {
    let repo = common::repo();
    let caller = common::caller();

    let product = repo
        .create_product(
            &caller,
            ProductInput {
                common: CommonInput::with_label("Grobblech", "de"),
                ..ProductInput::default()
            },
        )
        .await
        .unwrap();

    let application = repo
        .create_product_application(
            &caller,
            ProductApplicationInput {
                common: CommonInput::with_label("Decklage", "de"),
                product: Some(Box::new(ProductInput {
                    common: CommonInput {
                        id: Some(product.id.clone()),
                        label: Some("Überschrieben".into()),
                        label_language_code: Some("de".into()),
                        ..CommonInput::default()
                    },
                    ..ProductInput::default()
                })),
                ..ProductApplicationInput::default()
            },
        )
        .await
        .unwrap();

    let linked = application
        .product
        .as_ref()
        .expect("application wraps product")
        .entity()
        .expect("product hydrated");
    assert_eq!(linked.id, product.id);
    assert_eq!(
        linked.label.as_ref().unwrap().text,
        "Grobblech",
        "reference semantics: nested data on a referenced node is ignored"
    );
}

#[tokio::test]
async fn validation_failure_leaves_store_untouched() {
    let repo = common::repo();
    let caller = common::caller();

    // A property with only a value violates the semantic/label rule; it sits
    // two levels deep so a partial create would already have hit the store.
    let input = EnterpriseInput {
        common: CommonInput::with_label("Werk", "de"),
        processes: vec![ProcessInput {
            raw_materials: vec![ProductApplicationInput {
                properties: vec![PropertyInput {
                    value: Some("42".into()),
                    ..PropertyInput::default()
                }],
                ..ProductApplicationInput::default()
            }],
            ..ProcessInput::default()
        }],
        ..EnterpriseInput::default()
    };

    let error = repo.create_enterprise(&caller, input).await.unwrap_err();
    assert!(matches!(
        error,
        RepositoryError::Mutation(MutationError::InvalidInput {
            field: "property",
            ..
        })
    ));

    let empty = !repo
        .transport()
        .ask("ASK { GRAPH ?g { ?s ?p ?o } }")
        .await
        .unwrap();
    assert!(empty, "validation failures must precede every statement");
}

#[tokio::test]
async fn hierarchy_links_are_stored_in_both_directions() {
    let repo = common::repo();
    let caller = common::caller();

    let parent = repo
        .create_capability(
            &caller,
            CapabilityInput {
                common: CommonInput::with_label("Fügen", "de"),
                child_capabilities: vec![CapabilityInput {
                    common: CommonInput::with_label("Schweißen", "de"),
                    ..CapabilityInput::default()
                }],
                ..CapabilityInput::default()
            },
        )
        .await
        .unwrap();

    let child = parent
        .child_capabilities
        .iter()
        .next()
        .unwrap()
        .entity()
        .expect("child hydrated");

    let forward = common::ask(
        &repo,
        &common::edge(&parent.id, vocab::REL_GENERALIZES, &child.id),
    )
    .await;
    let inverse = common::ask(
        &repo,
        &common::edge(&child.id, vocab::REL_SPECIALIZES, &parent.id),
    )
    .await;
    assert!(forward && inverse, "paired predicates stay in lockstep");

    assert_eq!(child.parent_capabilities.len(), 1);
}

#[tokio::test]
async fn process_round_trips_typed_product_applications() {
    let repo = common::repo();
    let caller = common::caller();

    let process = repo
        .create_process(
            &caller,
            ProcessInput {
                common: CommonInput::with_label("Warmwalzen", "de"),
                raw_materials: vec![ProductApplicationInput {
                    product: Some(Box::new(ProductInput {
                        common: CommonInput::with_label("Bramme", "de"),
                        ..ProductInput::default()
                    })),
                    ..ProductApplicationInput::default()
                }],
                end_products: vec![ProductApplicationInput {
                    product: Some(Box::new(ProductInput {
                        common: CommonInput::with_label("Warmband", "de"),
                        ..ProductInput::default()
                    })),
                    ..ProductApplicationInput::default()
                }],
                ..ProcessInput::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(process.raw_materials.len(), 1);
    assert_eq!(process.end_products.len(), 1);
    assert!(process.auxiliary_materials.is_empty());

    let raw = process
        .raw_materials
        .iter()
        .next()
        .unwrap()
        .entity()
        .expect("application hydrated");
    let product = raw
        .product
        .as_ref()
        .expect("application wraps product")
        .entity()
        .expect("product hydrated");
    assert_eq!(product.label.as_ref().unwrap().text, "Bramme");
}

#[tokio::test]
async fn create_property_validates_semantic_rule_end_to_end() {
    let repo = common::repo();
    let caller = common::caller();

    let property = repo
        .create_property(
            &caller,
            PropertyInput {
                value: Some("420".into()),
                semantic_references: vec![SemanticReferenceInput {
                    source_uri: Some("https://eclass.eu/0173-1#02-AAH880".into()),
                    ..SemanticReferenceInput::default()
                }],
                ..PropertyInput::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(property.value.as_deref(), Some("420"));
    assert_eq!(property.semantic_references.len(), 1);
}
