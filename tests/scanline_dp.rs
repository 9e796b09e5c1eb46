use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stereomatch::lowlevel::{Move, ScanlineTables};
use stereomatch::{
    CancelFlag, DisparityAlgorithm, ImageView, ScanlineConfig, ScanlineMatcher, StereoError,
    StereoPair, DEFAULT_OCCLUSION_COST,
};

fn random_row(len: usize, rng: &mut StdRng) -> Vec<u8> {
    (0..len).map(|_| rng.random::<u8>()).collect()
}

fn run_backtrack(tables: &ScanlineTables) -> (Vec<Option<u32>>, Vec<Option<u32>>, usize) {
    let n = tables.width();
    let mut left = vec![None; n];
    let mut right = vec![None; n];
    let steps = tables.backtrack(0, &mut left, &mut right).unwrap();
    (left, right, steps)
}

#[test]
fn border_cells_hold_accumulated_occlusion() {
    let tables = ScanlineTables::build(&[10, 20, 30, 40], &[40, 30, 20, 10], 7).unwrap();
    for i in 0..4 {
        assert_eq!(tables.cost(i, 0), Some(7 * i as u64));
        assert_eq!(tables.cost(0, i), Some(7 * i as u64));
        assert_eq!(tables.step(i, 0), None);
        assert_eq!(tables.step(0, i), None);
    }
    assert_eq!(tables.cost(4, 0), None);
}

#[test]
fn interior_cells_follow_the_recurrence() {
    let mut rng = StdRng::seed_from_u64(7);
    let n = 24;
    let occ = 15u64;
    let left = random_row(n, &mut rng);
    let right = random_row(n, &mut rng);
    let tables = ScanlineTables::build(&left, &right, occ as u32).unwrap();

    for c in 1..n {
        for d in 1..n {
            let diagonal = tables.cost(c - 1, d - 1).unwrap() + u64::from(left[c].abs_diff(right[d]));
            let up = tables.cost(c - 1, d).unwrap() + occ;
            let side = tables.cost(c, d - 1).unwrap() + occ;
            assert_eq!(tables.cost(c, d), Some(diagonal.min(up).min(side)));
            assert!(tables.step(c, d).is_some());
        }
    }
}

#[test]
fn up_wins_tie_with_left() {
    let tables = ScanlineTables::build(&[0, 255], &[0, 0], 20).unwrap();
    assert_eq!(tables.cost(1, 1), Some(40));
    assert_eq!(tables.step(1, 1), Some(Move::Up));
}

#[test]
fn left_chosen_when_strictly_cheapest() {
    let tables = ScanlineTables::build(&[0, 0, 0], &[0, 0, 255], 20).unwrap();
    assert_eq!(tables.step(1, 1), Some(Move::Diagonal));
    assert_eq!(tables.step(1, 2), Some(Move::Left));
    assert_eq!(tables.cost(1, 2), Some(20));
}

#[test]
fn move_codes_are_stable() {
    assert_eq!(Move::Diagonal.code(), 1);
    assert_eq!(Move::Up.code(), 2);
    assert_eq!(Move::Left.code(), 3);
}

#[test]
fn backtrack_terminates_within_bound() {
    let mut rng = StdRng::seed_from_u64(99);
    for n in [2usize, 3, 8, 31, 64] {
        for occ in [0u32, 5, 20, 300] {
            let left = random_row(n, &mut rng);
            let right = random_row(n, &mut rng);
            let tables = ScanlineTables::build(&left, &right, occ).unwrap();
            let (left_out, right_out, steps) = run_backtrack(&tables);
            assert!(steps <= 2 * (n - 1), "n={n} occ={occ} steps={steps}");
            assert_eq!(left_out[0], None);
            assert_eq!(right_out[0], None);
        }
    }
}

#[test]
fn path_cost_matches_final_cell() {
    let mut rng = StdRng::seed_from_u64(1234);
    let n = 40;
    let occ = 20u64;
    let left = random_row(n, &mut rng);
    let right = random_row(n, &mut rng);
    let tables = ScanlineTables::build(&left, &right, occ as u32).unwrap();

    let (mut i, mut j) = (n - 1, n - 1);
    let mut total = 0u64;
    while i != 0 && j != 0 {
        let step = tables.step(i, j).unwrap();
        assert!((1..=3).contains(&step.code()));
        match step {
            Move::Diagonal => {
                total += u64::from(left[i].abs_diff(right[j]));
                i -= 1;
                j -= 1;
            }
            Move::Up => {
                total += occ;
                i -= 1;
            }
            Move::Left => {
                total += occ;
                j -= 1;
            }
        }
    }
    total += tables.cost(i, j).unwrap();
    assert_eq!(tables.cost(n - 1, n - 1), Some(total));
}

#[test]
fn identical_rows_match_at_zero_disparity() {
    let mut rng = StdRng::seed_from_u64(5);
    let row = random_row(16, &mut rng);
    let tables = ScanlineTables::build(&row, &row, DEFAULT_OCCLUSION_COST).unwrap();
    let (left, right, steps) = run_backtrack(&tables);

    assert_eq!(steps, 15);
    assert_eq!(left[0], None);
    assert_eq!(right[0], None);
    assert!(left[1..].iter().all(|&d| d == Some(0)));
    assert!(right[1..].iter().all(|&d| d == Some(0)));
}

#[test]
fn shifted_row_recovers_shift_in_the_middle() {
    let n = 64;
    let shift = 4;
    let mut rng = StdRng::seed_from_u64(2024);
    let right = random_row(n, &mut rng);
    let mut left = random_row(n, &mut rng);
    left[shift..].copy_from_slice(&right[..n - shift]);

    let tables = ScanlineTables::build(&left, &right, DEFAULT_OCCLUSION_COST).unwrap();
    let (left_out, right_out, _) = run_backtrack(&tables);

    let left_middle = &left_out[8..56];
    let hits = left_middle
        .iter()
        .filter(|&&d| d == Some(shift as u32))
        .count();
    assert!(hits * 10 >= left_middle.len() * 9, "left hits={hits}");

    let right_middle = &right_out[4..52];
    let hits = right_middle
        .iter()
        .filter(|&&d| d == Some(shift as u32))
        .count();
    assert!(hits * 10 >= right_middle.len() * 9, "right hits={hits}");
}

#[test]
fn unfilled_tables_report_inconsistent_backtrack() {
    let tables = ScanlineTables::new(3);
    let mut left = vec![None; 3];
    let mut right = vec![None; 3];
    let err = tables.backtrack(6, &mut left, &mut right).unwrap_err();
    assert_eq!(
        err,
        StereoError::BacktrackInconsistent {
            row: 6,
            left: 2,
            right: 2,
        }
    );
}

#[test]
fn backtrack_rejects_short_output_rows() {
    let tables = ScanlineTables::build(&[1, 2, 3], &[1, 2, 3], 20).unwrap();
    let mut left = vec![None; 2];
    let mut right = vec![None; 3];
    assert!(matches!(
        tables.backtrack(0, &mut left, &mut right),
        Err(StereoError::InvalidInput(_))
    ));
}

#[test]
fn huge_occlusion_cost_does_not_overflow() {
    let mut rng = StdRng::seed_from_u64(77);
    let row = random_row(64, &mut rng);
    let tables = ScanlineTables::build(&row, &row, u32::MAX).unwrap();
    assert_eq!(tables.cost(63, 0), Some(63 * u64::from(u32::MAX)));
    let (left, _, _) = run_backtrack(&tables);
    assert!(left[1..].iter().all(|&d| d == Some(0)));
}

#[test]
fn matcher_marks_first_column_unvisited() {
    let (width, height) = (20, 6);
    let mut rng = StdRng::seed_from_u64(3);
    let image = random_row(width * height, &mut rng);
    let view = ImageView::from_slice(&image, width, height).unwrap();
    let pair = StereoPair::new(view, view).unwrap();

    let out = ScanlineMatcher::default().compute(pair).unwrap();
    assert_eq!((out.left.width(), out.left.height()), (width, height));
    assert_eq!(out.left.visited_count(), (width - 1) * height);
    assert_eq!(out.right.visited_count(), (width - 1) * height);
    for y in 0..height {
        assert_eq!(out.left.get(0, y), None);
        assert_eq!(out.left.get(1, y), Some(0));
    }

    let dense = out.left.to_dense(f32::NAN);
    assert!(dense.get(0, 0).unwrap().is_nan());
    assert_eq!(dense.get(5, 2), Some(0.0));
}

#[test]
fn matcher_rows_match_standalone_tables() {
    let (width, height) = (32, 5);
    let mut rng = StdRng::seed_from_u64(8);
    let left = random_row(width * height, &mut rng);
    let right = random_row(width * height, &mut rng);
    let pair = StereoPair::new(
        ImageView::from_slice(&left, width, height).unwrap(),
        ImageView::from_slice(&right, width, height).unwrap(),
    )
    .unwrap();

    let cfg = ScanlineConfig {
        occlusion_cost: 12,
        parallel: false,
    };
    let out = ScanlineMatcher::new(cfg).compute(pair).unwrap();
    for y in 0..height {
        let span = y * width..(y + 1) * width;
        let tables = ScanlineTables::build(&left[span.clone()], &right[span], 12).unwrap();
        let (left_row, right_row, _) = run_backtrack(&tables);
        assert_eq!(out.left.row(y).unwrap(), left_row.as_slice());
        assert_eq!(out.right.row(y).unwrap(), right_row.as_slice());
    }
}

#[test]
fn cancelled_scanline_match_returns_error() {
    let image = [0u8; 12];
    let view = ImageView::from_slice(&image, 4, 3).unwrap();
    let pair = StereoPair::new(view, view).unwrap();
    let flag = CancelFlag::new();
    flag.cancel();
    let err = ScanlineMatcher::default()
        .compute_with(pair, &flag)
        .unwrap_err();
    assert_eq!(err, StereoError::Cancelled);
}
