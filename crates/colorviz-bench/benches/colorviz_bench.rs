//! Benchmarks for colorviz operations.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use colorviz_color::{LabConverter, lab_to_rgb_batch};
use colorviz_gamut::{BooleanOp, GamutMesh, IdGenerator, ParseMode, mesh_boolean, parse_reader};
use colorviz_math::{Illuminant, Vec3};

/// Lab samples over the usual gamut range.
fn lab_grid(n: usize) -> Vec<Vec3> {
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            Vec3::new(100.0 * t, 128.0 * (t * 7.0).sin(), 128.0 * (t * 11.0).cos())
        })
        .collect()
}

/// Latitude/longitude sphere in Lab around L=50.
fn sphere(rings: u32, segments: u32, radius: f32, center: Vec3) -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let mut vertices = vec![center + Vec3::Y * radius];
    for r in 1..rings {
        let theta = std::f32::consts::PI * r as f32 / rings as f32;
        for s in 0..segments {
            let phi = std::f32::consts::TAU * s as f32 / segments as f32;
            let dir = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            vertices.push(center + dir * radius);
        }
    }
    vertices.push(center - Vec3::Y * radius);

    let bottom = vertices.len() as u32 - 1;
    let ring = |r: u32, s: u32| 1 + (r - 1) * segments + s % segments;
    let mut triangles = Vec::new();
    for s in 0..segments {
        triangles.push([0, ring(1, s + 1), ring(1, s)]);
        triangles.push([bottom, ring(rings - 1, s), ring(rings - 1, s + 1)]);
    }
    for r in 1..rings - 1 {
        for s in 0..segments {
            let (a, b) = (ring(r, s), ring(r, s + 1));
            let (c, d) = (ring(r + 1, s), ring(r + 1, s + 1));
            triangles.push([a, b, d]);
            triangles.push([a, d, c]);
        }
    }
    (vertices, triangles)
}

fn gamut_text(vertices: &[Vec3], triangles: &[[u32; 3]]) -> String {
    let mut text = String::from("DESCRIPTOR \"bench\"\nCOLOR_REP LAB\nBEGIN_DATA\n");
    for (i, v) in vertices.iter().enumerate() {
        text.push_str(&format!("{i} {} {} {}\n", v.x, v.y, v.z));
    }
    text.push_str("END_DATA\nBEGIN_DATA\n");
    for [a, b, c] in triangles {
        text.push_str(&format!("{a} {b} {c}\n"));
    }
    text.push_str("END_DATA\n");
    text
}

/// Benchmark Lab to sRGB conversion.
fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("lab_to_rgb");

    for size in [1000, 10000, 100000].iter() {
        let labs = lab_grid(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("scalar", size), &labs, |b, v| {
            let conv = LabConverter::new(Illuminant::D50);
            b.iter(|| v.iter().map(|&x| conv.lab_to_rgb(black_box(x))).collect::<Vec<_>>())
        });

        group.bench_with_input(BenchmarkId::new("batch", size), &labs, |b, v| {
            b.iter(|| lab_to_rgb_batch(black_box(v), Illuminant::D50))
        });
    }

    group.finish();
}

/// Benchmark gamut file parsing.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for rings in [16u32, 64].iter() {
        let (v, t) = sphere(*rings, rings * 2, 40.0, Vec3::new(50.0, 0.0, 0.0));
        let text = gamut_text(&v, &t);
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("sphere", t.len()), &text, |b, text| {
            b.iter(|| parse_reader(black_box(text.as_bytes()), ParseMode::Lenient))
        });
    }

    group.finish();
}

/// Benchmark mesh booleans on overlapping spheres.
fn bench_boolean(c: &mut Criterion) {
    let mut group = c.benchmark_group("boolean");
    group.sample_size(10);

    for rings in [8u32, 16].iter() {
        let mut ids = IdGenerator::new();
        let (va, ta) = sphere(*rings, rings * 2, 40.0, Vec3::new(50.0, 0.0, 0.0));
        let (vb, tb) = sphere(*rings, rings * 2, 40.0, Vec3::new(50.0, 30.0, 10.0));
        let a = GamutMesh::from_parts(ids.next_id(), "a", va, ta, Illuminant::D50)
            .expect("valid sphere");
        let b = GamutMesh::from_parts(ids.next_id(), "b", vb, tb, Illuminant::D50)
            .expect("valid sphere");

        for op in [BooleanOp::Intersection, BooleanOp::Union] {
            group.bench_with_input(
                BenchmarkId::new(op.to_string(), a.triangles().len()),
                &(&a, &b),
                |bench, (a, b)| {
                    bench.iter(|| {
                        let mut ids = IdGenerator::new();
                        mesh_boolean(black_box(a), black_box(b), op, &mut ids)
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_convert, bench_parse, bench_boolean);
criterion_main!(benches);
