use ndarray::{s, Array2, Array3};
use refclass::{
    InMemoryDataset, InferenceModel, MultiLabelledDataset, ReducedSelector, ReferenceClass,
    SelectionConfig, SelectionError, SerializableParams,
};

/// 100 samples, 3 predictors, 4 features. Predictor 0 errs when feature 0 is
/// positive, predictor 1 errs everywhere, predictor 2 never errs.
fn dataset() -> InMemoryDataset {
    let features = Array2::from_shape_fn((100, 4), |(i, j)| {
        (((i * 37 + j * 11) % 29) as f64 / 14.0) - 1.0
    });
    let labels = Array2::from_shape_fn((100, 3), |(i, p)| match p {
        0 => (features[[i, 0]] > 0.0) as u8 as f64,
        1 => 1.0,
        _ => 0.0,
    });
    InMemoryDataset::new(labels, features).unwrap()
}

fn observations() -> Array3<f64> {
    Array3::from_shape_fn((2, 3, 4), |(o, p, d)| {
        if d == 3 {
            0.0
        } else {
            1.0 + 0.5 * o as f64 - 0.25 * p as f64 + 0.1 * d as f64
        }
    })
}

fn config(fracs: Vec<f64>) -> SelectionConfig {
    SelectionConfig::builder()
        .subset_fracs(fracs)
        .num_iter(10)
        .lr(0.01)
        .seed(5)
        .verbose(false)
        .build()
        .unwrap()
}

#[test]
fn select_with_validation_end_to_end() {
    let ds = dataset();
    let learner = ReferenceClass::new("scenario", &ds, &config(vec![0.6, 0.2])).unwrap();
    assert_eq!(learner.split_sizes(), (60, Some(20), 20));

    let selection = learner.select(observations()).unwrap();
    assert_eq!(selection.min_val.len(), 2);
    assert_eq!(selection.min_ids.len(), 2);
    assert_eq!(selection.model.size(), (2, 4));

    // Predictor 2 has zero error on every sample, whatever a selector accepts,
    // while predictor 1 always has error 1.
    for o in 0..2 {
        assert_eq!(selection.min_val[o], 0.0);
        assert_eq!(selection.min_ids[o], 2);
    }

    // Zero weights stay zero.
    for o in 0..2 {
        assert_eq!(selection.model.weights()[[o, 3]], 0.0);
    }
}

#[test]
fn select_without_validation_end_to_end() {
    let ds = dataset();
    let learner = ReferenceClass::new("scenario", &ds, &config(vec![0.8])).unwrap();
    assert_eq!(learner.split_sizes(), (80, None, 20));

    let selection = learner.select(observations()).unwrap();
    assert!(selection.min_ids.iter().all(|&id| id == 2));

    let probe = ds.all().unwrap().1.slice(s![0..5, ..]).to_owned();
    let accepted = selection.model.predict_batch(&probe).unwrap();
    assert_eq!(accepted.dim(), (2, 5));
}

#[test]
fn repeated_select_calls_are_independent() {
    let ds = dataset();
    let learner = ReferenceClass::new("scenario", &ds, &config(vec![0.6, 0.2])).unwrap();
    let first = learner.select(observations()).unwrap();
    let second = learner.select(observations()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn configuration_errors_surface_before_training() {
    let ds = dataset();
    let mut cfg = SelectionConfig::default();
    cfg.subset_fracs = vec![0.9, 0.2];
    let err = ReferenceClass::new("scenario", &ds, &cfg).unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(err, SelectionError::FractionSumExceeded { .. }));
}

#[test]
fn reduced_selector_persists() {
    let ds = dataset();
    let learner = ReferenceClass::new("scenario", &ds, &config(vec![0.8])).unwrap();
    let selection = learner.select(observations()).unwrap();

    let bytes = selection.model.to_bytes().unwrap();
    assert_eq!(ReducedSelector::from_bytes(&bytes).unwrap(), selection.model);
}
