// Backtracing real filled matrices: gapped alignments, candidate filtering
// and the no-shared-cell guarantee between successive traces.

mod common;

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use common::*;
use ferrous_extend::core::alignment::{EditKind, NucBacktracer, Scoring};

fn count(edits: &[ferrous_extend::core::alignment::Edit], kind: EditKind) -> usize {
    edits.iter().filter(|e| e.kind == kind).count()
}

#[test]
fn test_read_with_deletion() {
    let reference = random_reference(300, 41);
    let mut read = reference[100..130].to_vec();
    read.extend_from_slice(&reference[132..162]);
    let window = &reference[80..200];
    let scoring = Scoring::default();
    let matrix = ScalarMatrix::fill(&read, window, &scoring);

    let mut bt = NucBacktracer::new();
    bt.init(&matrix, 60);
    let mut rng = StdRng::seed_from_u64(1);
    let trace = bt.next_trace(&matrix, &scoring, &mut rng).unwrap().unwrap();

    // 60 matches, one gap of two
    assert_eq!(trace.score.value(), Some(120 - 5 - 3 * 2));
    assert_eq!(trace.col_start, 20);
    assert_eq!(trace.read_extent(), 60);
    assert_eq!(trace.ref_extent(), 62);
    assert_eq!(count(&trace.edits, EditKind::ReadGap), 2);
    assert_eq!(count(&trace.edits, EditKind::RefGap), 0);
    assert_eq!(trace.gaps.read, 2);
}

#[test]
fn test_read_with_insertion() {
    let reference = random_reference(300, 42);
    let mut read = reference[100..130].to_vec();
    read.push((reference[130] + 2) % 4);
    read.extend_from_slice(&reference[130..160]);
    let window = &reference[90..180];
    let scoring = Scoring::default();
    let matrix = ScalarMatrix::fill(&read, window, &scoring);

    let mut bt = NucBacktracer::new();
    bt.init(&matrix, 60);
    let mut rng = StdRng::seed_from_u64(2);
    let trace = bt.next_trace(&matrix, &scoring, &mut rng).unwrap().unwrap();

    assert_eq!(trace.score.value(), Some(120 - 5 - 3));
    assert_eq!(trace.read_extent(), 61);
    assert_eq!(trace.ref_extent(), 60);
    assert_eq!(count(&trace.edits, EditKind::RefGap), 1);
    assert_eq!(trace.gaps.reference, 1);
}

#[test]
fn test_successive_traces_share_no_cells() {
    // two copies of the read in one window
    let mut reference = random_reference(400, 43);
    let copy = reference[50..90].to_vec();
    reference[250..290].copy_from_slice(&copy);
    let read = copy.clone();
    let scoring = Scoring::default();
    let matrix = ScalarMatrix::fill(&read, &reference, &scoring);

    let mut bt = NucBacktracer::new();
    bt.init(&matrix, 40);
    let mut rng = StdRng::seed_from_u64(3);
    let mut seen = HashSet::new();
    let mut starts = Vec::new();
    while let Some(trace) = bt.next_trace(&matrix, &scoring, &mut rng).unwrap() {
        for cell in &trace.cells {
            assert!(seen.insert(*cell), "cell {:?} reported twice", cell);
        }
        starts.push(trace.col_start);
    }
    assert!(starts.contains(&50) && starts.contains(&250), "{:?}", starts);
    assert!(bt.done());

    let counts = bt.counts();
    assert!(counts.succeeded >= 2);
    assert!(counts.filtered_start + counts.filtered_dominated > 0);
}

#[test]
fn test_min_score_above_best_yields_nothing() {
    let reference = random_reference(200, 44);
    let read = reference[20..60].to_vec();
    let scoring = Scoring::default();
    let matrix = ScalarMatrix::fill(&read, &reference, &scoring);

    let mut bt = NucBacktracer::new();
    bt.init(&matrix, 81);
    assert!(bt.done());
    let mut rng = StdRng::seed_from_u64(4);
    assert!(bt.next_trace(&matrix, &scoring, &mut rng).unwrap().is_none());
}
