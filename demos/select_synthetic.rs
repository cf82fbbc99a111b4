//! Reference-class selection on synthetic data
//!
//! Three predictors are simulated over a 4-dimensional feature space:
//! - predictor 0 errs when the first feature is positive
//! - predictor 1 errs when the second feature is positive
//! - predictor 2 errs at random on a third of the samples
//!
//! Each observation starts a selector per predictor, the run picks the
//! predictor with the lowest conditional error and stores its selector.
//!
//! Run with: RUST_LOG=info cargo run --example select_synthetic

use ndarray::{Array2, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use refclass::{
    InMemoryDataset, InferenceModel, ReducedSelector, ReferenceClass, SelectionConfig,
};
use std::error::Error;

const NUM_SAMPLES: usize = 500;
const DIM_FEATURE: usize = 4;
const NUM_PREDICTORS: usize = 3;

fn synthetic_dataset(rng: &mut StdRng) -> Result<InMemoryDataset, Box<dyn Error>> {
    let features = Array2::from_shape_fn((NUM_SAMPLES, DIM_FEATURE), |_| {
        rng.random_range(-1.0..1.0)
    });
    let labels = Array2::from_shape_fn((NUM_SAMPLES, NUM_PREDICTORS), |(i, p)| match p {
        0 => (features[[i, 0]] > 0.0) as u8 as f64,
        1 => (features[[i, 1]] > 0.0) as u8 as f64,
        _ => (i % 3 == 0) as u8 as f64,
    });
    Ok(InMemoryDataset::new(labels, features)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(2024);
    let dataset = synthetic_dataset(&mut rng)?;

    // Observation 0 leans on the first feature, observation 1 on the second.
    let observations = Array3::from_shape_fn((2, NUM_PREDICTORS, DIM_FEATURE), |(o, _, d)| {
        if d == o {
            1.0
        } else if d == DIM_FEATURE - 1 {
            0.0
        } else {
            0.25
        }
    });

    let config = SelectionConfig::builder()
        .subset_fracs(vec![0.6, 0.2])
        .num_iter(200)
        .lr(0.05)
        .seed(7)
        .build()?;
    let learner = ReferenceClass::new("demo -", &dataset, &config)?;
    println!("split sizes: {:?}", learner.split_sizes());

    let selection = learner.select(observations)?;
    for (o, (val, id)) in selection
        .min_val
        .iter()
        .zip(selection.min_ids.iter())
        .enumerate()
    {
        println!(
            "observation {}: predictor {} with conditional error {:.3}",
            o, id, val
        );
    }

    let probe = Array2::from_shape_vec(
        (2, DIM_FEATURE),
        vec![0.5, -0.5, 0.1, 0.0, -0.5, 0.5, 0.1, 0.0],
    )?;
    let accepted = selection.model.predict_batch(&probe)?;
    println!("acceptance on probe samples:\n{}", accepted);

    let path = std::env::temp_dir().join("refclass_selector.json");
    selection.model.save_to_file(&path)?;
    let restored = ReducedSelector::load_from_file(&path)?;
    assert_eq!(restored, selection.model);
    println!("selector saved to {}", path.display());

    Ok(())
}
