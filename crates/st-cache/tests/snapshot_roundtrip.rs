use st_cache::{
    CacheBuilder, Direction, Extreme, MemoryCacheStore, RecordTarget, ResultKind, ResultRecord,
    SnapshotStore, compute_cache_fingerprint,
};
use st_core::Id;
use st_model::{AnalysisKind, LoadCaseKind, ModelRegistry};

#[test]
fn save_and_load_snapshot() {
    let temp_dir = std::env::temp_dir().join("st_cache_snapshot_test");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let mut reg = ModelRegistry::new();
    let project = Id::from_index(0);
    let rs = reg
        .add_result_set(project, "RunA", AnalysisKind::TimeHistory)
        .unwrap();
    let l1 = reg.add_story(rs, "L1", 0, None).unwrap();
    let l2 = reg.add_story(rs, "L2", 1, None).unwrap();
    reg.intern_load_case(rs, "TH01", LoadCaseKind::TimeHistory);

    let mut store = MemoryCacheStore::new();
    let mut builder = CacheBuilder::new(project, rs, ResultKind::StoryDrift(Extreme::Max));
    for (story, value, row) in [(l1, 0.10, 0), (l2, 0.08, 1)] {
        builder.ingest(
            &reg,
            &ResultRecord {
                target: RecordTarget::Story(story),
                load_case: "TH01".to_string(),
                direction: Some(Direction::X),
                value,
                source_row_order: row,
            },
        );
    }
    builder.commit(&mut store).unwrap();

    let snapshots = SnapshotStore::new(temp_dir.clone()).unwrap();
    let manifest = snapshots.save(&store, project, rs, "RunA").unwrap();
    assert_eq!(manifest.entry_count, 2);
    assert!(snapshots.has_snapshot("RunA"));

    let mut restored = MemoryCacheStore::new();
    let loaded = snapshots.load_into(&mut restored, "RunA").unwrap();
    assert_eq!(loaded, 2);
    assert_eq!(
        compute_cache_fingerprint(&restored, project, rs),
        manifest.fingerprint
    );

    let reloaded = snapshots.load_manifest("RunA").unwrap();
    assert_eq!(reloaded.fingerprint, manifest.fingerprint);
}

#[test]
fn hostile_result_set_name_stays_under_root() {
    let temp_dir = std::env::temp_dir().join("st_cache_snapshot_hostile");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let mut reg = ModelRegistry::new();
    let project = Id::from_index(0);
    let rs = reg
        .add_result_set(project, "../escape", AnalysisKind::TimeHistory)
        .unwrap();
    let l1 = reg.add_story(rs, "L1", 0, None).unwrap();
    reg.intern_load_case(rs, "TH01", LoadCaseKind::TimeHistory);

    let mut store = MemoryCacheStore::new();
    let mut builder = CacheBuilder::new(project, rs, ResultKind::StoryDrift(Extreme::Max));
    builder.ingest(
        &reg,
        &ResultRecord {
            target: RecordTarget::Story(l1),
            load_case: "TH01".to_string(),
            direction: Some(Direction::X),
            value: 0.10,
            source_row_order: 0,
        },
    );
    builder.commit(&mut store).unwrap();

    let snapshots = SnapshotStore::new(temp_dir.clone()).unwrap();
    snapshots.save(&store, project, rs, "../escape").unwrap();

    // Nothing lands beside the root, and the same name reads back.
    assert!(!temp_dir.parent().unwrap().join("escape").exists());
    assert!(snapshots.has_snapshot("../escape"));
    let mut restored = MemoryCacheStore::new();
    assert_eq!(snapshots.load_into(&mut restored, "../escape").unwrap(), 1);
}

#[test]
fn missing_snapshot_is_an_error() {
    let temp_dir = std::env::temp_dir().join("st_cache_snapshot_missing");
    let _ = std::fs::remove_dir_all(&temp_dir);
    let snapshots = SnapshotStore::new(temp_dir).unwrap();
    assert!(snapshots.load_manifest("NoSuchRun").is_err());
}
