use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array2, Array3};
use refclass::{
    InMemoryDataset, LinearModel, NoProgress, PgdTrainer, ProjectedGradientDescent,
    ReferenceClass, SelectionConfig, SelectorModel,
};

fn dataset(n: usize, p: usize, d: usize) -> InMemoryDataset {
    let features =
        Array2::from_shape_fn((n, d), |(i, j)| ((i * 13 + j * 7) % 19) as f64 / 9.0 - 1.0);
    let labels = Array2::from_shape_fn((n, p), |(i, j)| ((i + j) % 3 == 0) as u8 as f64);
    InMemoryDataset::new(labels, features).expect("Failed to create dataset")
}

fn observations(o: usize, p: usize, d: usize) -> Array3<f64> {
    Array3::from_shape_fn((o, p, d), |(a, b, c)| ((a + 2 * b + 3 * c) % 5) as f64 - 2.0)
}

fn bench_proj_grad(c: &mut Criterion) {
    let ds = dataset(1000, 8, 16);
    let labels_t = ds.labels().t().to_owned();

    for num_obs in [1, 8, 32].iter() {
        c.bench_with_input(
            BenchmarkId::new("proj_grad", num_obs),
            num_obs,
            |b, &o| {
                let model =
                    LinearModel::new(observations(o, 8, 16)).expect("Failed to build model");
                b.iter(|| {
                    model
                        .proj_grad(black_box(ds.features().view()), black_box(labels_t.view()))
                        .expect("Failed to compute gradient")
                });
            },
        );
    }
}

fn bench_fit(c: &mut Criterion) {
    let ds = dataset(1000, 4, 8);

    c.bench_function("pgd_fit_50_iter", |b| {
        let trainer = PgdTrainer::builder(ProjectedGradientDescent::new(0.01))
            .num_iter(50)
            .build();
        b.iter(|| {
            let model = LinearModel::new(observations(4, 4, 8)).expect("Failed to build model");
            trainer
                .fit(model, &ds, None, &mut NoProgress)
                .expect("Failed to fit model")
        });
    });
}

fn bench_select(c: &mut Criterion) {
    let ds = dataset(1000, 4, 8);
    let config = SelectionConfig::builder()
        .subset_fracs(vec![0.6, 0.2])
        .num_iter(50)
        .seed(1)
        .verbose(false)
        .build()
        .expect("Failed to build config");
    let learner = ReferenceClass::new("bench", &ds, &config).expect("Failed to split dataset");

    c.bench_function("select_with_validation", |b| {
        b.iter(|| {
            learner
                .select(black_box(observations(4, 4, 8)))
                .expect("Failed to select")
        });
    });
}

criterion_group!(benches, bench_proj_grad, bench_fit, bench_select);
criterion_main!(benches);
