//! Benchmarks for the Photo Trail ingestion stages.
//!
//! Run with: cargo bench -p phototrail-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, ImageFormat, RgbImage};
use phototrail_core::pipeline::metadata::{dms_to_degrees, parse_exif_datetime};
use phototrail_core::pipeline::{DmsComponent, Hasher, MetadataExtractor};
use std::io::Cursor;

fn benchmark_content_hash(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large.bin");
    let data: Vec<u8> = (0..8 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    std::fs::write(&path, &data).unwrap();

    c.bench_function("content_hash_blake3_8mb", |b| {
        b.iter(|| {
            let _ = Hasher::content_hash(black_box(&path));
        })
    });
}

fn benchmark_metadata(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.jpg");
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::new(1920, 1080))
        .write_to(&mut bytes, ImageFormat::Jpeg)
        .unwrap();
    std::fs::write(&path, bytes.into_inner()).unwrap();

    c.bench_function("metadata_extract_1080p", |b| {
        b.iter(|| {
            let _ = MetadataExtractor::extract(black_box(&path));
        })
    });
}

fn benchmark_parsing(c: &mut Criterion) {
    let dms = [
        DmsComponent::Ratio {
            numerator: 40,
            denominator: 1,
        },
        DmsComponent::Ratio {
            numerator: 30,
            denominator: 1,
        },
        DmsComponent::Plain(12.5),
    ];

    c.bench_function("dms_to_degrees", |b| {
        b.iter(|| dms_to_degrees(black_box(&dms)))
    });
    c.bench_function("parse_exif_datetime", |b| {
        b.iter(|| parse_exif_datetime(black_box("2023:07:14 18:02:09")))
    });
}

criterion_group!(
    benches,
    benchmark_content_hash,
    benchmark_metadata,
    benchmark_parsing
);
criterion_main!(benches);
