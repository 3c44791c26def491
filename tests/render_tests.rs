//! End-to-end renders of the toy dataset in `demos/`.

use std::collections::BTreeSet;
use std::path::PathBuf;

use sv_view::core::types::{JumpCategory, ReadId, SeedId};
use sv_view::render::model::RenderModel;
use sv_view::{
    Dataset, InteractionLinker, JumpId, RenderError, RenderMode, RenderRequest, RunId, Selection,
    Viewport, ViewportAnalyzer,
};

fn toy_dataset() -> Dataset {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/toy.json");
    Dataset::load_from_file(&path).unwrap()
}

fn whole_genome() -> RenderRequest {
    RenderRequest::new(Viewport::new(0, 0, 79, 79), RunId(1)).with_ground_truth(RunId(2))
}

fn render(dataset: &Dataset, request: &RenderRequest) -> RenderModel {
    ViewportAnalyzer::for_dataset(dataset).render(request).unwrap()
}

#[test]
fn test_small_view_renders_in_detail() {
    let dataset = toy_dataset();
    let model = render(&dataset, &whole_genome());
    let view = model.as_detail().expect("detail render");

    assert!(view.complete);
    assert!(view.jumps.swept);
    let ids: Vec<JumpId> = view.jumps.quads.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![JumpId(1), JumpId(2)]);
    assert_eq!(view.jumps.quads[0].category, JumpCategory::SameStrand);
    assert_eq!(view.jumps.quads[1].category, JumpCategory::StrandSwitch);

    // Call 1 is a point, call 2 a 4x4 box with a center marker
    assert_eq!(view.accepted_calls.markers.len(), 2);
    assert_eq!(view.accepted_calls.boxes.len(), 1);
    assert_eq!(view.ground_truth_calls.markers.len(), 1);
    assert!(view.ground_truth_calls.anomalies.is_empty());
}

#[test]
fn test_reads_of_visible_jumps_are_laid_out() {
    let dataset = toy_dataset();
    let model = render(&dataset, &whole_genome());
    let layout = model
        .as_detail()
        .and_then(|v| v.read_layout.as_ref())
        .expect("read layout");

    let reads: BTreeSet<ReadId> = layout.reads.iter().map(|r| r.read_id).collect();
    assert_eq!(reads, BTreeSet::from([ReadId(7), ReadId(8)]));
    assert_eq!(layout.seeds.len(), 4);

    // Every column is either a lane of a read or a gap
    for seed in &layout.seeds {
        assert_eq!(layout.column_labels[seed.column], Some(seed.read_id));
    }
}

#[test]
fn test_sequence_tracks_cover_the_clamped_view() {
    let dataset = toy_dataset();
    let model = render(&dataset, &whole_genome());
    let tracks = model
        .as_detail()
        .and_then(|v| v.sequence_tracks.as_ref())
        .expect("sequence tracks");

    assert_eq!(tracks.horizontal.len(), 80);
    assert_eq!(tracks.vertical.len(), 80);
    assert_eq!(tracks.horizontal[0].symbol, 'A');
    assert_eq!(tracks.horizontal[40].symbol, 'G');
}

#[test]
fn test_dense_view_falls_back_to_overview() {
    let dataset = toy_dataset();
    let request = whole_genome().with_max_num_ele(1);
    let model = render(&dataset, &request);

    assert_eq!(model.mode(), RenderMode::Overview);
    let RenderModel::Overview(view) = &model else {
        panic!("expected overview");
    };
    let total: u64 = view.cells.iter().map(|c| c.count).sum();
    assert_eq!(total, 2);
}

#[test]
fn test_unknown_run_is_not_found() {
    let dataset = toy_dataset();
    let request = RenderRequest::new(Viewport::new(0, 0, 79, 79), RunId(99));
    let err = ViewportAnalyzer::for_dataset(&dataset)
        .render(&request)
        .unwrap_err();
    assert!(matches!(err, RenderError::NotFound(RunId(99))));
}

#[test]
fn test_selected_jump_highlights_its_seeds() {
    let dataset = toy_dataset();
    let model = render(&dataset, &whole_genome());
    let map = InteractionLinker::highlight(&model, &Selection::Jump { id: JumpId(1) });

    assert_eq!(map.highlighted_jumps(), BTreeSet::from([JumpId(1)]));
    assert_eq!(
        map.highlighted_seeds(),
        BTreeSet::from([SeedId::new(ReadId(7), 0), SeedId::new(ReadId(7), 1)])
    );
}

#[test]
fn test_selected_seed_highlights_its_read_and_jumps() {
    let dataset = toy_dataset();
    let model = render(&dataset, &whole_genome());
    let selection = Selection::Seed {
        id: SeedId::new(ReadId(8), 0),
    };
    let map = InteractionLinker::highlight(&model, &selection);

    assert_eq!(map.highlighted_jumps(), BTreeSet::from([JumpId(2)]));
    assert_eq!(
        map.highlighted_seeds(),
        BTreeSet::from([SeedId::new(ReadId(8), 0), SeedId::new(ReadId(8), 1)])
    );
}

#[test]
fn test_renders_are_deterministic() {
    let dataset = toy_dataset();
    let first = serde_json::to_string(&render(&dataset, &whole_genome())).unwrap();
    let second = serde_json::to_string(&render(&dataset, &whole_genome())).unwrap();
    assert_eq!(first, second);
}
