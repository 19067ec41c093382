use nalgebra::Point2;
use rodfit::shape::CANONICAL_RADIUS;
use rodfit::{
    fit_from_drag, fit_source_frame, FilterKind, FitParams, FitStatus, Frame, FrameSource,
    PipelineParams, RodFitter, VecFrames,
};

const SIZE: usize = 100;
const LOWER: (f64, f64) = (25.0, 70.0);
const UPPER: (f64, f64) = (75.0, 30.0);

fn dist_to_segment(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    let ab = b - a;
    let t = ((p - a).dot(&ab) / ab.norm_squared()).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Bright anti-aliased capsule on a dark background.
fn rod_frame(lower: (f64, f64), upper: (f64, f64)) -> Frame<u8> {
    let a = Point2::new(lower.0, lower.1);
    let b = Point2::new(upper.0, upper.1);
    let radius = (b - a).norm() / 100.0 * CANONICAL_RADIUS;
    let mut data = Vec::with_capacity(SIZE * SIZE);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let d = dist_to_segment(Point2::new(x as f64, y as f64), a, b);
            let cover = (radius + 0.5 - d).clamp(0.0, 1.0);
            data.push((20.0 + 180.0 * cover).round() as u8);
        }
    }
    Frame::gray(SIZE, SIZE, data).expect("frame")
}

fn edge_surface(frames: &VecFrames<u8>) -> Frame<f64> {
    FilterKind::BlurSobel
        .build(frames, &PipelineParams::default())
        .expect("pipeline")
        .get(0)
        .expect("surface")
}

fn endpoint_error(shape: &rodfit::RodShape) -> (f64, f64) {
    (
        (shape.lower_center() - Point2::new(LOWER.0, LOWER.1)).norm(),
        (shape.upper_center() - Point2::new(UPPER.0, UPPER.1)).norm(),
    )
}

#[test]
fn fit_recovers_rod_from_offset_drag() {
    let frames = VecFrames::new(vec![rod_frame(LOWER, UPPER)]);
    let surface = edge_surface(&frames);

    let report = fit_from_drag(&surface, [27.0, 73.0, 73.0, 28.0], &FitParams::default());

    let (lower0, upper0) = endpoint_error(&report.initial);
    let (lower, upper) = endpoint_error(&report.shape);
    assert!(report.improved(), "{report:?}");
    assert!(lower < 3.0, "lower endpoint off by {lower:.2}px");
    assert!(upper < 3.0, "upper endpoint off by {upper:.2}px");
    assert!(lower + upper < lower0 + upper0);
    assert!(report.evaluations > 0);
}

#[test]
fn drag_outside_frame_returns_initial_shape() {
    let frames = VecFrames::new(vec![rod_frame(LOWER, UPPER)]);
    let surface = edge_surface(&frames);

    let report = fit_from_drag(&surface, [500.0, 500.0, 600.0, 550.0], &FitParams::default());

    assert_eq!(report.shape, report.initial);
    assert_eq!(report.initial_objective, 0.0);
    assert_eq!(report.status, FitStatus::Converged);
    assert!(!report.improved());
}

#[test]
fn color_surface_fits_like_gray() {
    let frames = VecFrames::new(vec![rod_frame(LOWER, UPPER)]);
    let gray = edge_surface(&frames);
    let rgb_data: Vec<f64> = gray.data().iter().flat_map(|&v| [v, v, v]).collect();
    let rgb = Frame::from_vec(SIZE, SIZE, 3, rgb_data).expect("rgb");

    let drag = [27.0, 73.0, 73.0, 28.0];
    let params = FitParams::default();
    let a = fit_from_drag(&gray, drag, &params);
    let b = fit_from_drag(&rgb, drag, &params);
    assert_eq!(a.initial, b.initial);
    assert!((a.initial_objective - b.initial_objective).abs() < 1e-9);
    let lower = (a.shape.lower_center() - b.shape.lower_center()).norm();
    let upper = (a.shape.upper_center() - b.shape.upper_center()).norm();
    assert!(lower < 0.5 && upper < 0.5, "{lower:.3} / {upper:.3}");
}

#[test]
fn fit_source_frame_runs_the_named_pipeline() {
    let frames = VecFrames::new(vec![
        rod_frame((20.0, 80.0), (60.0, 20.0)),
        rod_frame(LOWER, UPPER),
    ]);
    let report = fit_source_frame(
        &frames,
        1,
        FilterKind::BlurSobel,
        &PipelineParams::default(),
        [27.0, 73.0, 73.0, 28.0],
        &FitParams::default(),
    )
    .expect("fit");
    let (lower, upper) = endpoint_error(&report.shape);
    assert!(lower < 3.0 && upper < 3.0, "{lower:.2} / {upper:.2}");

    let err = fit_source_frame(
        &frames,
        2,
        FilterKind::BlurSobel,
        &PipelineParams::default(),
        [27.0, 73.0, 73.0, 28.0],
        &FitParams::default(),
    );
    assert!(matches!(
        err,
        Err(rodfit::RodfitError::Frame(rodfit::FrameError::IndexOutOfRange { index: 2, len: 2 }))
    ));
}

#[test]
fn fitter_tracks_the_last_accepted_shape() {
    let frames = VecFrames::new(vec![rod_frame(LOWER, UPPER)]);
    let surface = edge_surface(&frames);
    let mut fitter = RodFitter::new(FitParams::default()).expect("fitter");

    let first = fitter.fit(&surface, rodfit::shape_from_drag([27.0, 73.0, 73.0, 28.0]));
    assert_eq!(fitter.last_accepted(), Some(&first.shape));

    // Refitting from the accepted shape stays put.
    let second = fitter.fit(&surface, first.shape);
    let (lower, upper) = endpoint_error(&second.shape);
    assert!(lower < 3.0 && upper < 3.0);
    assert!(second.final_objective <= first.final_objective + 1e-9);
}

#[test]
fn budget_limited_fits_report_the_limit() {
    let frames = VecFrames::new(vec![rod_frame(LOWER, UPPER)]);
    let surface = edge_surface(&frames);
    let drag = [27.0, 73.0, 73.0, 28.0];

    for max_evaluations in (20..600).step_by(13) {
        let mut params = FitParams::default();
        params.powell.max_evaluations = max_evaluations;
        let report = fit_from_drag(&surface, drag, &params);
        assert!(report.evaluations <= max_evaluations);
        if report.evaluations == max_evaluations {
            assert_eq!(report.status, FitStatus::EvaluationLimit, "budget {max_evaluations}");
            assert!(!report.status.is_converged());
        }
    }
}
