use factor_core::{rank, ContentCatalog, GameState, ProjectStatus, RankingConfig};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

fn bench_rank(c: &mut Criterion) {
    let catalog = ContentCatalog::builtin();
    let config = RankingConfig::builtin();
    let sample = GameState::builtin_sample();
    let mut group = c.benchmark_group("rank");

    for copies in [1usize, 8, 32, 64] {
        group.bench_with_input(
            BenchmarkId::new("processes", copies),
            &copies,
            |b, &copies| {
                b.iter_batched(
                    || {
                        let mut state = (*sample).clone();
                        let processes = state.processes.clone();
                        let produced = state.produced_by_process.clone();
                        for _ in 1..copies {
                            state.processes.extend(processes.iter().cloned());
                            state.produced_by_process.extend(produced.iter().copied());
                        }
                        for project in &mut state.projects {
                            project.status = ProjectStatus::Active;
                        }
                        state
                    },
                    |state| rank(&state, &catalog, &config),
                    BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(rank_benches, bench_rank);
criterion_main!(rank_benches);
