use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};
use spectrometer_cv::crop::{extract_crop, CropSize};
use spectrometer_cv::histogram::histogram;
use spectrometer_cv::spectrum::reduce;
use spectrometer_cv::Frame;

fn camera_frame() -> Frame {
    Frame::new(RgbaImage::from_fn(1920, 1080, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    }))
    .expect("non-empty frame")
}

fn bench_pipeline(c: &mut Criterion) {
    let frame = camera_frame();
    let region = CropSize::new(0.5, 0.2)
        .and_then(|size| size.region_for(&frame))
        .expect("valid crop");
    let crop = extract_crop(&frame, region).expect("crop inside frame");

    c.bench_function("extract_crop_960x216", |b| {
        b.iter(|| extract_crop(black_box(&frame), black_box(region)))
    });
    c.bench_function("reduce_960x216", |b| b.iter(|| reduce(black_box(&crop))));
    c.bench_function("histogram_1080p", |b| b.iter(|| histogram(black_box(&frame))));
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
