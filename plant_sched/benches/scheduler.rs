use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use plant_sched::{
    plant_gen::{generate_plant_data, GeneratorOptions},
    run, validate, Algorithm, InputOptions, IterationOptions,
};
use rand::{rngs::StdRng, SeedableRng};

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler");
    group.sample_size(50);
    group.sampling_mode(criterion::SamplingMode::Flat);

    for (equipment_count, party_count) in [(4, 40), (10, 400), (25, 2000)] {
        let options = GeneratorOptions {
            equipment_count,
            nomenclature_count: equipment_count * 2,
            party_count,
            ..GeneratorOptions::default()
        };
        let data = generate_plant_data(&options, &mut StdRng::seed_from_u64(42));
        let input = validate(&data, &InputOptions::default()).unwrap();

        let algorithms = vec![
            Algorithm::Greedy,
            Algorithm::IterativeOptimization(IterationOptions::default()),
        ];

        for algorithm in algorithms {
            group.bench_with_input(
                BenchmarkId::new(
                    format!("scheduler_{}", algorithm.kind()),
                    format!("{equipment_count}x{party_count}"),
                ),
                &algorithm,
                |b, algorithm| b.iter(|| run(algorithm, &input).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
