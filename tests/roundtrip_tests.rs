mod common;

use snapback::snapshot::{
    export_snapshot, ImportState, Importer, ScriptedConfirmation, SnapshotDocument,
};
use snapback::store::Store;

use common::sample_store;

#[test]
fn export_counts_match_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let snap = dir.path().join("snap.json");
    let report = export_snapshot(&sample_store(), &snap).unwrap();

    assert_eq!(report.users, 2);
    assert_eq!(report.groups, 1);
    assert_eq!(report.permissions, 3);
    assert_eq!(report.models, 1);

    let doc = SnapshotDocument::read(&snap).unwrap();
    assert_eq!(doc.users.len(), 2);
    assert_eq!(doc.groups.len(), 1);
    assert_eq!(doc.permissions.len(), 3);
    assert_eq!(doc.openai_models.len(), 1);
}

#[test]
fn export_does_not_mutate_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = sample_store();
    export_snapshot(&store, &dir.path().join("snap.json")).unwrap();
    assert_eq!(store, sample_store());
}

#[test]
fn restore_into_an_empty_store_reproduces_it() {
    let dir = tempfile::tempdir().unwrap();
    let snap = dir.path().join("snap.json");
    let target = dir.path().join("store.json");
    let original = sample_store();
    export_snapshot(&original, &snap).unwrap();

    let mut importer = Importer::new(&target);
    importer
        .run(&snap, &mut ScriptedConfirmation::new(true))
        .unwrap();
    assert_eq!(importer.state(), ImportState::Committed);

    let restored = Store::load(&target).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn restore_preserves_credential_hashes_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let snap = dir.path().join("snap.json");
    let target = dir.path().join("store.json");
    let original = sample_store();
    export_snapshot(&original, &snap).unwrap();

    Importer::new(&target)
        .run(&snap, &mut ScriptedConfirmation::new(true))
        .unwrap();

    let restored = Store::load(&target).unwrap();
    for user in &original.users {
        assert_eq!(
            restored.user_by_username(&user.username).unwrap().password,
            user.password
        );
    }
}

#[test]
fn importing_the_same_snapshot_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let snap = dir.path().join("snap.json");
    let target = dir.path().join("store.json");
    export_snapshot(&sample_store(), &snap).unwrap();

    Importer::new(&target)
        .run(&snap, &mut ScriptedConfirmation::new(true))
        .unwrap();
    let after_first = Store::load(&target).unwrap();

    let report = Importer::new(&target)
        .run(&snap, &mut ScriptedConfirmation::new(true))
        .unwrap();
    let after_second = Store::load(&target).unwrap();

    assert_eq!(after_second, after_first);
    // second pass only updates, never inserts
    assert_eq!(report.stats.users_created, 0);
    assert_eq!(report.stats.users_updated, 2);
    assert_eq!(report.stats.groups_created, 0);
    assert_eq!(report.stats.permissions_created, 0);
    assert_eq!(report.stats.models_created, 0);
}

#[test]
fn re_running_export_produces_independent_documents() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    let store = sample_store();
    export_snapshot(&store, &first).unwrap();
    export_snapshot(&store, &second).unwrap();

    let a = SnapshotDocument::read(&first).unwrap();
    let b = SnapshotDocument::read(&second).unwrap();
    assert_eq!(a.users, b.users);
    assert_eq!(a.permissions, b.permissions);
    // each run gets its own timestamp; the files are independent
    assert!(b.export_date >= a.export_date);
}
