//! Run with: cargo bench -p handpose-gesture-core --bench sequence_apply

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use handpose_gesture_core::{
    generate_gestures, GeneratorConfig, GestureSet, GestureSequence, ModuleGenerator,
    PerlinRotationSineGenerator, PerlinParams, RecordingRig, SequenceConfig,
};

fn perlin_set(end_frame: u32, octaves: u32) -> GestureSet {
    let params = PerlinParams {
        id: "idle".into(),
        start_frame: 1,
        end_frame,
        period_range: (0.2, 0.8),
        amplitude_range: (0.01, 0.05),
        persistence: 0.5,
        n_octaves_range: (octaves, octaves),
        weight: 1.0,
        priority: 0,
    };
    let modules: Vec<Box<dyn ModuleGenerator>> =
        vec![Box::new(PerlinRotationSineGenerator::new(params).expect("valid params"))];
    let cfg = GeneratorConfig {
        seed: Some(3),
        frame_rate: 24,
    };
    generate_gestures(&modules, &cfg).expect("generate").gestures
}

fn bench_sequence_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence_apply");
    for octaves in [1u32, 4, 8] {
        let set = perlin_set(241, octaves);
        group.bench_with_input(BenchmarkId::new("perlin_sine", octaves), &set, |b, set| {
            b.iter(|| {
                let mut rig = RecordingRig::new();
                let seq = GestureSequence::new(set.clone(), SequenceConfig::default())
                    .expect("valid sequence");
                black_box(seq.apply(&mut rig).expect("apply"))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sequence_apply);
criterion_main!(benches);
