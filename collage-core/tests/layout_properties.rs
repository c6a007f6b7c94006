use collage_core::{
    intersects, layout, normalize_batch, Canvas, LayoutConfig, Polygon, SourceOutline,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A random star-shaped polygon with `n` vertices around `(cx, cy)`.
fn random_polygon(rng: &mut StdRng, cx: f64, cy: f64, n: usize) -> Polygon {
    let pairs: Vec<[f64; 2]> = (0..n)
        .map(|i| {
            let angle = i as f64 / n as f64 * std::f64::consts::TAU;
            let radius = rng.gen_range(5.0..40.0);
            [cx + radius * angle.cos(), cy + radius * angle.sin()]
        })
        .collect();
    Polygon::from_pairs(&pairs)
}

#[test]
fn layouts_never_overlap_and_stay_on_canvas() {
    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = rng.gen_range(2..7);
        let polygons: Vec<Polygon> = (0..count)
            .map(|_| {
                let n = rng.gen_range(3..9);
                random_polygon(&mut rng, 200.0, 150.0, n)
            })
            .collect();

        let result = layout(&polygons, Canvas::new(90, 90), &LayoutConfig::default(), &mut rng)
            .expect("layout converges");

        assert_eq!(result.polygons.len(), polygons.len());
        for (i, a) in result.polygons.iter().enumerate() {
            let bbox = a.bbox().unwrap();
            assert!(bbox.min.x >= 0.0 && bbox.min.y >= 0.0, "seed {seed}");
            assert!(bbox.max.x < result.canvas.width as f64, "seed {seed}");
            assert!(bbox.max.y < result.canvas.height as f64, "seed {seed}");
            for b in &result.polygons[i + 1..] {
                assert!(!intersects(a, b), "seed {seed}: polygons overlap");
            }
        }
    }
}

#[test]
fn canvas_only_grows_by_the_configured_factor() {
    let mut rng = StdRng::seed_from_u64(99);
    let big = Polygon::from_pairs(&[[0.0, 0.0], [300.0, 0.0], [300.0, 120.0], [0.0, 120.0]]);
    let initial = Canvas::new(100, 100);
    let result = layout(&[big], initial, &LayoutConfig::default(), &mut rng).unwrap();

    let mut expected = initial;
    for _ in 0..result.growth_rounds {
        let next = expected.grown(1.2);
        assert!(next.width > expected.width && next.height > expected.height);
        expected = next;
    }
    assert_eq!(result.canvas, expected);
    assert!(result.canvas.width > 300);
}

#[test]
fn same_seed_replays_the_same_layout() {
    let polygons: Vec<Polygon> = {
        let mut rng = StdRng::seed_from_u64(5);
        (0..4).map(|_| random_polygon(&mut rng, 50.0, 50.0, 6)).collect()
    };
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        layout(&polygons, Canvas::new(120, 120), &LayoutConfig::default(), &mut rng).unwrap()
    };
    assert_eq!(run(1234), run(1234));
}

#[test]
fn normalized_batch_lays_out_on_estimated_canvas() {
    let outlines: Vec<SourceOutline> = [(640u32, 480u32), (320, 240), (800, 600)]
        .iter()
        .map(|&(w, h)| SourceOutline {
            polygon: Polygon::from_pairs(&[
                [w as f64 * 0.25, h as f64 * 0.25],
                [w as f64 * 0.5, h as f64 * 0.25],
                [w as f64 * 0.5, h as f64 * 0.5],
                [w as f64 * 0.25, h as f64 * 0.5],
            ]),
            image_width: w,
            image_height: h,
        })
        .collect();

    let (polygons, initial) = normalize_batch(&outlines).unwrap();
    // sqrt(800 * 600 * 3) = 1200
    assert_eq!(initial, Canvas::new(1200, 900));

    let mut rng = StdRng::seed_from_u64(8);
    let result = layout(&polygons, initial, &LayoutConfig::default(), &mut rng).unwrap();
    assert_eq!(result.canvas, initial);
}
