use aucspread_core::{
    evaluate, load_or_init, sample, sweep, AucError, ChartSpec, PopulationSpec, SeedPanel,
    SweepGrid,
};

fn brute_force_auc(labels: &[u8], scores: &[f64]) -> f64 {
    let mut wins = 0.0;
    let mut pairs = 0.0;
    for (i, &li) in labels.iter().enumerate() {
        for (j, &lj) in labels.iter().enumerate() {
            if li == 1 && lj == 0 {
                pairs += 1.0;
                if scores[i] > scores[j] {
                    wins += 1.0;
                } else if scores[i] == scores[j] {
                    wins += 0.5;
                }
            }
        }
    }
    wins / pairs
}

#[test]
fn balanced_draw_with_separation_ten() {
    let drawn = sample(&PopulationSpec::new(1_000, 0.5, 100)).unwrap();
    let result = evaluate(&drawn).unwrap();

    let reference = brute_force_auc(drawn.labels(), drawn.scores());
    assert!((result.auc_roc - reference).abs() < 1e-12);
    // Means two standard deviations apart: population AUC is Phi(sqrt(2)).
    assert!((result.auc_roc - 0.921).abs() < 0.04, "{}", result.auc_roc);
    assert!(result.auc_pr > 0.85);
}

#[test]
fn identical_populations_center_on_chance_and_tighten_with_size() {
    let panel = SeedPanel::reference();
    let small = sweep(10_000, 0.5, &panel, 0.0).unwrap();
    let large = sweep(100_000, 0.5, &panel, 0.0).unwrap();

    for result in [&small, &large] {
        let min = result.roc.min.unwrap();
        assert!(min <= result.roc.max);
        assert!((min - 0.5).abs() < 0.05);
        assert!((result.roc.max - 0.5).abs() < 0.05);
    }

    let spread = |r: &aucspread_core::SweepResult| r.roc.max - r.roc.min.unwrap();
    assert!(spread(&large) < spread(&small));
}

#[test]
#[ignore = "sweeps 20 seeds at a million objects; run with --ignored"]
fn chance_level_spread_shrinks_from_1e5_to_1e6() {
    let panel = SeedPanel::reference();
    let small = sweep(100_000, 0.5, &panel, 0.0).unwrap();
    let large = sweep(1_000_000, 0.5, &panel, 0.0).unwrap();

    for result in [&small, &large] {
        assert!((result.roc.min.unwrap() - 0.5).abs() < 0.02);
        assert!((result.roc.max - 0.5).abs() < 0.02);
    }

    let spread = |r: &aucspread_core::SweepResult| r.roc.max - r.roc.min.unwrap();
    assert!(spread(&large) < spread(&small));
}

#[test]
fn single_class_weights_abort_with_degenerate_labels() {
    for weight in [0.0, 1.0] {
        let err = sweep(1_000, weight, &SeedPanel::reference(), 10.0).unwrap_err();
        assert!(matches!(err, AucError::DegenerateLabelSet { .. }), "{err}");
    }
}

#[test]
fn rare_positives_still_report_both_extremes() {
    let result = sweep(100_000, 0.0005, &SeedPanel::reference(), 10.0).unwrap();
    let chart = ChartSpec::from_sweep(&result);

    assert_eq!(chart.roc.series.len(), 2);
    assert_eq!(chart.pr.series.len(), 2);
    assert!(result.roc.relative_spread_percent().unwrap() >= 0.0);
    assert_ne!(result.min_run.unwrap().seed, result.max_run.unwrap().seed);
}

#[test]
fn grid_config_is_created_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("grid.json");

    let created: SweepGrid = load_or_init(&path, SweepGrid::smoke).unwrap();
    assert_eq!(created, SweepGrid::smoke());
    assert!(path.exists());

    let mut edited = created.clone();
    edited.sizes = vec![5_000];
    std::fs::write(&path, serde_json::to_string(&edited).unwrap()).unwrap();

    let loaded: SweepGrid = load_or_init(&path, SweepGrid::reference).unwrap();
    assert_eq!(loaded, edited);
}

#[test]
fn malformed_config_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = load_or_init::<SweepGrid, _>(&path, SweepGrid::smoke).unwrap_err();
    assert!(err.to_string().contains("grid.json"));
}
