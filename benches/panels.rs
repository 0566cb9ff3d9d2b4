use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use trialview::cache::merge_trials;
use trialview::pareto::classify;
use trialview::slice::transform;
use trialview::{Direction, Trial, TrialState};

const CATEGORIES: [&str; 4] = ["adam", "sgd", "rmsprop", "adagrad"];

/// Build `n` completed two-objective trials with a numeric and a categorical
/// parameter. Values follow a deterministic pseudo-random walk.
fn build_trials(n: usize) -> Vec<Trial> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..n)
        .map(|i| {
            let x = next();
            let y = next();
            Trial::new(i as u64, TrialState::Complete)
                .with_values(vec![x, 1.0 - x + y * 0.2])
                .with_param("lr", format!("{:.6}", 10f64.powf(-4.0 * y)))
                .with_param("opt", CATEGORIES[i % CATEGORIES.len()])
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("pareto_classify");
    let directions = [Direction::Minimize, Direction::Minimize];

    for n in [100, 500, 2000] {
        let trials = build_trials(n);
        group.bench_with_input(BenchmarkId::new("trials", n), &trials, |b, trials| {
            b.iter(|| classify(trials, &directions));
        });
    }
    group.finish();
}

fn bench_slice(c: &mut Criterion) {
    let mut group = c.benchmark_group("slice_transform");

    for n in [100, 1000, 10_000] {
        let trials = build_trials(n);
        group.bench_with_input(BenchmarkId::new("numeric", n), &trials, |b, trials| {
            b.iter(|| transform(trials, 0, Some("lr"), None, false));
        });
        group.bench_with_input(BenchmarkId::new("categorical", n), &trials, |b, trials| {
            b.iter(|| transform(trials, 0, Some("opt"), None, false));
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_trials");

    for n in [1000, 10_000] {
        let cached = build_trials(n);
        let fixed = n - 10;
        let fetched: Vec<Trial> = cached[fixed..].to_vec();
        group.bench_with_input(BenchmarkId::new("cached", n), &cached, |b, cached| {
            b.iter(|| merge_trials(cached, fixed, fetched.clone()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_slice, bench_merge);
criterion_main!(benches);
