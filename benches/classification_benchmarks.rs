//! Benchmarks for the full classification pipeline and stream helpers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use face_emotion::{
    classifier::{EmotionClassifier, HeuristicClassifier},
    config::Config,
    face_image::FaceImage,
    smoothing::create_filter,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_faces(count: usize) -> Vec<FaceImage> {
    let mut rng = StdRng::seed_from_u64(11);
    (0..count)
        .map(|_| {
            let data: Vec<u8> = (0..48 * 48).map(|_| rng.gen()).collect();
            FaceImage::from_raw(48, 48, &data).unwrap()
        })
        .collect()
}

fn benchmark_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let faces = random_faces(16);

    for (name, config) in [
        ("regional", Config::regional()),
        ("halves", Config::halves()),
        ("global_intensity", Config::global_intensity()),
        ("enhanced", Config::enhanced()),
    ] {
        let classifier = HeuristicClassifier::new(&config).unwrap();

        group.bench_with_input(BenchmarkId::new("single_face", name), &faces[0], |b, face| {
            b.iter(|| black_box(classifier.classify(black_box(face)).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("explain", name), &faces[0], |b, face| {
            b.iter(|| black_box(classifier.explain(black_box(face)).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("sequence_16", name), &faces, |b, faces| {
            b.iter(|| {
                for face in faces {
                    black_box(classifier.classify(face).unwrap());
                }
            });
        });
    }

    group.finish();
}

fn benchmark_smoothed_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("smoothed_stream");
    let classifier = HeuristicClassifier::new(&Config::regional()).unwrap();
    let results: Vec<_> = random_faces(32)
        .iter()
        .map(|face| classifier.classify(face).unwrap())
        .collect();

    for name in ["none", "exponential:0.5", "moving_average:5"] {
        let mut filter = create_filter(name).unwrap();
        group.bench_with_input(BenchmarkId::new("sequence_32", name), &results, |b, results| {
            b.iter(|| {
                filter.reset();
                for result in results {
                    black_box(filter.apply(black_box(result)));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_presets, benchmark_smoothed_stream);
criterion_main!(benches);
