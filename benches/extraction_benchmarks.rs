//! Benchmarks for region partitioning and feature extraction

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use face_emotion::{
    face_image::{FaceImage, FaceSize},
    features::{FeatureExtractor, GradientOperator},
    region::{facial_regions, partition},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_face(rng: &mut StdRng, side: usize) -> FaceImage {
    let data: Vec<u8> = (0..side * side).map(|_| rng.gen()).collect();
    FaceImage::from_raw(side, side, &data).unwrap()
}

fn benchmark_partition(c: &mut Criterion) {
    let specs = facial_regions();
    c.bench_function("partition_facial_regions_48", |b| {
        b.iter(|| black_box(partition(black_box(&specs), FaceSize::square(48)).unwrap()));
    });
}

fn benchmark_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_extraction");
    let mut rng = StdRng::seed_from_u64(7);

    for side in [48, 96, 192] {
        let face = random_face(&mut rng, side);
        let regions = partition(&facial_regions(), FaceSize::square(side)).unwrap();

        for (name, operator) in [
            ("finite_difference", GradientOperator::FiniteDifference),
            ("sobel", GradientOperator::Sobel),
        ] {
            let extractor = FeatureExtractor::new(operator);
            group.bench_with_input(BenchmarkId::new(name, side), &face, |b, face| {
                b.iter(|| black_box(extractor.extract(black_box(face), &regions).unwrap()));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_partition, benchmark_extraction);
criterion_main!(benches);
