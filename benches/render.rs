use blob_poster::PosterConfig;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn config() -> PosterConfig {
    PosterConfig {
        seed: Some(42),
        ..PosterConfig::default()
    }
}

fn bench_synthesize(c: &mut Criterion) {
    let config = config();
    c.bench_function("synthesize_default_poster", |b| {
        b.iter(|| blob_poster::render(black_box(&config)).unwrap())
    });
}

fn bench_rasterize(c: &mut Criterion) {
    let canvas = blob_poster::render(&config()).unwrap();
    c.bench_function("rasterize_default_poster", |b| {
        b.iter(|| black_box(&canvas).rasterize().unwrap())
    });

    let outlined = blob_poster::render(&PosterConfig {
        outline_width: 2.0,
        ..config()
    })
    .unwrap();
    c.bench_function("rasterize_outlined_poster", |b| {
        b.iter(|| black_box(&outlined).rasterize().unwrap())
    });
}

fn bench_encode(c: &mut Criterion) {
    let rbuf = blob_poster::render(&config()).unwrap().rasterize().unwrap();
    c.bench_function("encode_png", |b| {
        b.iter(|| blob_poster::png_bytes(black_box(&rbuf)).unwrap())
    });
}

criterion_group!(benches, bench_synthesize, bench_rasterize, bench_encode);
criterion_main!(benches);
