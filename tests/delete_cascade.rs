// =============================================================================
// Delete, verify-by-read, and the bounded two-hop cascade
// =============================================================================

mod common;

use plantgraph::model::EntityKind;
use plantgraph::vocab;

#[tokio::test]
async fn deleting_a_missing_identifier_reports_success() {
    let repo = common::repo();
    let caller = common::caller();
    let absent = common::eid("never-existed");

    let gone = repo
        .delete(&caller, EntityKind::Capability, &absent)
        .await
        .unwrap();
    assert!(gone);
}

#[tokio::test]
async fn delete_then_hydrate_returns_not_found() {
    let repo = common::repo();
    let caller = common::caller();
    let c1 = common::eid("c1");

    common::insert(
        &repo,
        &[
            common::class_of(&c1, vocab::CLASS_CAPABILITY),
            common::lit(&c1, vocab::RDFS_LABEL, "Schleifen", Some("de")),
        ],
    )
    .await;

    let gone = repo
        .delete(&caller, EntityKind::Capability, &c1)
        .await
        .unwrap();
    assert!(gone, "delete is verified by re-reading");

    let hydrated = repo.get_capability_by_id(&caller, &c1).await.unwrap();
    assert!(hydrated.is_none());
}

#[tokio::test]
async fn delete_removes_subject_triples_only() {
    let repo = common::repo();
    let caller = common::caller();
    let enterprise = common::eid("e1");
    let factory = common::eid("f1");

    common::insert(
        &repo,
        &[
            common::class_of(&enterprise, vocab::CLASS_ENTERPRISE),
            common::class_of(&factory, vocab::CLASS_FACTORY),
            common::edge(&enterprise, vocab::REL_HAS, &factory),
        ],
    )
    .await;

    let gone = repo
        .delete(&caller, EntityKind::Factory, &factory)
        .await
        .unwrap();
    assert!(gone);

    // The incoming ownership edge dangles by design; with the target's type
    // marker gone it no longer surfaces as a relation.
    let dangling = common::ask(
        &repo,
        &common::edge(&enterprise, vocab::REL_HAS, &factory),
    )
    .await;
    assert!(dangling, "incoming references are not cleaned up");

    let hydrated = repo
        .get_enterprise_by_id(&caller, &enterprise)
        .await
        .unwrap()
        .expect("owner survives");
    assert!(hydrated.factories.is_empty());
}

#[tokio::test]
async fn bulk_delete_cascades_exactly_two_hops() {
    let repo = common::repo();
    let caller = common::caller();
    let enterprise = common::eid("e1");
    let factory = common::eid("f1");
    let machine = common::eid("m1");
    let process = common::eid("proc1");
    let step = common::eid("proc2");

    common::insert(
        &repo,
        &[
            common::class_of(&enterprise, vocab::CLASS_ENTERPRISE),
            common::class_of(&factory, vocab::CLASS_FACTORY),
            common::class_of(&machine, vocab::CLASS_MACHINE),
            common::class_of(&process, vocab::CLASS_PROCESS),
            common::class_of(&step, vocab::CLASS_PROCESS),
            // hop 1
            common::edge(&enterprise, vocab::REL_HAS, &factory),
            // hop 2
            common::edge(&factory, vocab::REL_HAS, &machine),
            common::edge(&factory, vocab::REL_HAS, &process),
            // hop 3, beyond the cascade
            common::edge(&process, vocab::REL_CONTAINS, &step),
            common::edge(&step, vocab::REL_CONTAINED_IN, &process),
        ],
    )
    .await;

    let gone = repo
        .bulk_delete(&caller, EntityKind::Enterprise, &enterprise)
        .await
        .unwrap();
    assert!(gone);

    assert!(repo.get_enterprise_by_id(&caller, &enterprise).await.unwrap().is_none());
    assert!(repo.get_factory_by_id(&caller, &factory).await.unwrap().is_none());
    assert!(repo.get_machine_by_id(&caller, &machine).await.unwrap().is_none());
    assert!(repo.get_process_by_id(&caller, &process).await.unwrap().is_none());

    let survivor = repo
        .get_process_by_id(&caller, &step)
        .await
        .unwrap()
        .expect("third hop is outside the cascade");
    // Its parent edge points at a deleted process; with the target's type
    // marker gone the relation no longer surfaces.
    assert!(survivor.parent_processes.is_empty());
    let dangling = common::ask(
        &repo,
        &common::edge(&step, vocab::REL_CONTAINED_IN, &process),
    )
    .await;
    assert!(dangling, "the dangling edge itself stays in the store");
}

#[tokio::test]
async fn bulk_delete_of_leaf_behaves_like_plain_delete() {
    let repo = common::repo();
    let caller = common::caller();
    let c1 = common::eid("c1");

    common::insert(&repo, &[common::class_of(&c1, vocab::CLASS_CAPABILITY)]).await;

    let gone = repo
        .bulk_delete(&caller, EntityKind::Capability, &c1)
        .await
        .unwrap();
    assert!(gone);
    assert!(repo.get_capability_by_id(&caller, &c1).await.unwrap().is_none());
}
