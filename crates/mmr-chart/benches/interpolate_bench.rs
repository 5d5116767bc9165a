use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mmr_chart::{Interpolator, RankLadder, Sample, SampleSet};

fn samples(n: usize) -> SampleSet {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    SampleSet::new(
        (0..n)
            .map(|i| Sample::new(t0 + Duration::hours(30 * i as i64), 900.0 + (i % 400) as f64, "", ""))
            .collect(),
    )
}

fn bench_value_at(c: &mut Criterion) {
    let ladder = RankLadder::default();
    let mut group = c.benchmark_group("value_at");
    for &n in &[100usize, 10_000, 100_000] {
        let set = samples(n);
        let interp = Interpolator::new(&set, &ladder, Duration::hours(12));
        let (first, last) = set.time_extent().unwrap();
        let step = (last - first) / 997;
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let mut t = first;
                for _ in 0..997 {
                    black_box(interp.value_at(t));
                    t += step;
                }
            });
        });
    }
    group.finish();
}

fn bench_bucket(c: &mut Criterion) {
    let ladder = RankLadder::default();
    c.bench_function("ladder_bucket", |b| {
        b.iter(|| {
            for v in (0..2200).step_by(7) {
                black_box(ladder.bucket(v as f64));
            }
        });
    });
}

criterion_group!(benches, bench_value_at, bench_bucket);
criterion_main!(benches);
