use st_cache::{
    CacheBuilder, Direction, Extreme, MemoryCacheStore, RecordTarget, ResultKind, ResultRecord,
    RotationAxis,
};
use st_core::{Id, ProjectId, ResultSetId, StoryId, Tolerances, nearly_equal};
use st_model::{AnalysisKind, ElementKind, LoadCaseKind, ModelRegistry};
use st_results::assemble;

struct Fixture {
    reg: ModelRegistry,
    store: MemoryCacheStore,
    project: ProjectId,
    rs: ResultSetId,
    l1: StoryId,
    l2: StoryId,
}

fn drift_fixture() -> Fixture {
    let mut reg = ModelRegistry::new();
    let project = Id::from_index(0);
    let rs = reg
        .add_result_set(project, "RunA", AnalysisKind::TimeHistory)
        .unwrap();
    let l1 = reg.add_story(rs, "L1", 0, None).unwrap();
    let l2 = reg.add_story(rs, "L2", 1, None).unwrap();
    reg.intern_load_case(rs, "TH01", LoadCaseKind::TimeHistory);
    reg.intern_load_case(rs, "TH02", LoadCaseKind::TimeHistory);

    let mut store = MemoryCacheStore::new();
    let mut builder = CacheBuilder::new(project, rs, ResultKind::StoryDrift(Extreme::Max));
    let values = [
        (l1, "TH01", 0.10, 0),
        (l1, "TH02", 0.12, 0),
        (l2, "TH01", 0.08, 1),
        (l2, "TH02", 0.09, 1),
    ];
    for (story, case, value, row) in values {
        builder.ingest(
            &reg,
            &ResultRecord {
                target: RecordTarget::Story(story),
                load_case: case.to_string(),
                direction: Some(Direction::X),
                value,
                source_row_order: row,
            },
        );
    }
    builder.commit(&mut store).unwrap();

    Fixture {
        reg,
        store,
        project,
        rs,
        l1,
        l2,
    }
}

#[test]
fn drift_dataset_scales_and_averages() {
    let f = drift_fixture();
    let ds = assemble(
        &f.store,
        &f.reg,
        f.project,
        f.rs,
        ResultKind::StoryDrift(Extreme::Max),
        Some(Direction::X),
        None,
    )
    .unwrap()
    .expect("dataset");

    assert_eq!(ds.label_header, "Story");
    assert_eq!(ds.unit, "%");
    // Story kinds display top-first.
    assert_eq!(ds.labels, ["L2", "L1"]);

    let tol = Tolerances::default();
    let th01 = ds.column("TH01").unwrap();
    assert!(nearly_equal(th01.values[1].unwrap(), 10.0, tol));
    assert!(nearly_equal(th01.values[0].unwrap(), 8.0, tol));

    let avg = ds.column("Avg").unwrap();
    assert!(nearly_equal(avg.values[1].unwrap(), 11.0, tol));
    assert!(nearly_equal(avg.values[0].unwrap(), 8.5, tol));
}

#[test]
fn scaling_round_trips_through_inverse_multiplier() {
    let f = drift_fixture();
    let ds = assemble(
        &f.store,
        &f.reg,
        f.project,
        f.rs,
        ResultKind::StoryDrift(Extreme::Max),
        Some(Direction::X),
        None,
    )
    .unwrap()
    .unwrap();

    let rendered = ds.column("TH01").unwrap().values[1].unwrap();
    let recovered = rendered / 100.0;
    assert!(nearly_equal(recovered, 0.10, Tolerances::default()));
}

#[test]
fn no_cache_entries_is_no_data_not_an_error() {
    let f = drift_fixture();
    let ds = assemble(
        &f.store,
        &f.reg,
        f.project,
        f.rs,
        ResultKind::StoryShear(Extreme::Max),
        Some(Direction::X),
        None,
    )
    .unwrap();
    assert!(ds.is_none());
}

#[test]
fn missing_cells_render_as_none() {
    let mut f = drift_fixture();
    // L2 gains a case L1 never saw.
    let mut builder = CacheBuilder::new(f.project, f.rs, ResultKind::StoryDrift(Extreme::Max));
    f.reg.intern_load_case(f.rs, "TH03", LoadCaseKind::TimeHistory);
    for (story, case, value, row) in [
        (f.l1, "TH01", 0.10, 0),
        (f.l2, "TH01", 0.08, 1),
        (f.l2, "TH03", 0.07, 1),
    ] {
        builder.ingest(
            &f.reg,
            &ResultRecord {
                target: RecordTarget::Story(story),
                load_case: case.to_string(),
                direction: Some(Direction::X),
                value,
                source_row_order: row,
            },
        );
    }
    builder.commit(&mut f.store).unwrap();

    let ds = assemble(
        &f.store,
        &f.reg,
        f.project,
        f.rs,
        ResultKind::StoryDrift(Extreme::Max),
        Some(Direction::X),
        None,
    )
    .unwrap()
    .unwrap();

    let th03 = ds.column("TH03").unwrap();
    assert!(th03.values[0].is_some()); // L2 row
    assert!(th03.values[1].is_none()); // L1 row never saw TH03
}

#[test]
fn element_dataset_gets_rowwise_summary_columns() {
    let mut reg = ModelRegistry::new();
    let project = Id::from_index(0);
    let rs = reg
        .add_result_set(project, "RunA", AnalysisKind::TimeHistory)
        .unwrap();
    let l1 = reg.add_story(rs, "L1", 0, None).unwrap();
    let column = reg.add_element(project, "C1", ElementKind::Column).unwrap();
    reg.intern_load_case(rs, "TH01", LoadCaseKind::TimeHistory);
    reg.intern_load_case(rs, "TH02", LoadCaseKind::TimeHistory);

    let kind = ResultKind::ColumnRotation(RotationAxis::R2);
    let mut store = MemoryCacheStore::new();
    let mut builder = CacheBuilder::new(project, rs, kind);
    for (case, value) in [("TH01", 0.004), ("TH02", 0.006)] {
        builder.ingest(
            &reg,
            &ResultRecord {
                target: RecordTarget::Element {
                    element: column,
                    story: l1,
                },
                load_case: case.to_string(),
                direction: None,
                value,
                source_row_order: 0,
            },
        );
    }
    builder.commit(&mut store).unwrap();

    let ds = assemble(&store, &reg, project, rs, kind, None, Some(column))
        .unwrap()
        .unwrap();

    let tol = Tolerances::default();
    let avg = ds.column("Average").unwrap();
    let max = ds.column("Maximum").unwrap();
    let min = ds.column("Minimum").unwrap();
    // Rotations render as percentages.
    assert!(nearly_equal(avg.values[0].unwrap(), 0.5, tol));
    assert!(nearly_equal(max.values[0].unwrap(), 0.6, tol));
    assert!(nearly_equal(min.values[0].unwrap(), 0.4, tol));
}
