//! Benchmarks for the diff engine and checker.

use api_diff::{
    checker::Checker, config::CheckConfig, diff::DiffEngine, loader::parse_document_str,
    model::SourceLocations,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Map, Value};
use std::hint::black_box;

/// A document with `width` paths whose responses share a chain of `depth`
/// schemas; the last link points back to the first.
fn generate_document(width: usize, depth: usize, max_length: u64) -> String {
    let mut schemas = Map::new();
    for level in 0..depth {
        let next = format!("#/components/schemas/Level{}", (level + 1) % depth);
        schemas.insert(
            format!("Level{level}"),
            json!({
                "type": "object",
                "required": ["id"],
                "properties": {
                    "id": {"type": "string", "maxLength": max_length},
                    "tags": {"type": "array", "items": {"type": "string"}},
                    "child": {"$ref": next},
                    "variant": {"oneOf": [
                        {"$ref": next},
                        {"type": "integer", "minimum": 0}
                    ]}
                }
            }),
        );
    }

    let mut paths = Map::new();
    for i in 0..width {
        paths.insert(
            format!("/resources{i}/{{id}}"),
            json!({
                "get": {
                    "operationId": format!("getResource{i}"),
                    "parameters": [
                        {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}},
                        {"name": "filter", "in": "query", "schema": {"type": "string", "maxLength": max_length}}
                    ],
                    "responses": {
                        "200": {
                            "description": "ok",
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Level0"}}}
                        }
                    }
                }
            }),
        );
    }

    let document: Value = json!({
        "openapi": "3.0.3",
        "info": {"title": "bench", "version": "1"},
        "paths": paths,
        "components": {"schemas": schemas}
    });
    serde_json::to_string_pretty(&document).unwrap_or_default()
}

fn bench_diff_and_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_and_check");
    for width in [10usize, 100, 500] {
        let base = parse_document_str(&generate_document(width, 8, 10), None).unwrap();
        let revision = parse_document_str(&generate_document(width, 8, 20), None).unwrap();
        let sources = SourceLocations::new(base.locations.clone(), revision.locations.clone());
        let checker = Checker::new(CheckConfig::default());

        group.bench_with_input(BenchmarkId::new("diff", width), &width, |b, _| {
            b.iter(|| black_box(DiffEngine::new().diff(&base.document, &revision.document)));
        });

        group.bench_with_input(BenchmarkId::new("diff+check", width), &width, |b, _| {
            b.iter(|| {
                let diff = DiffEngine::new().diff(&base.document, &revision.document);
                black_box(checker.run(&diff, &sources))
            });
        });
    }
    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let content = generate_document(200, 8, 10);
    c.bench_function("load_200_paths", |b| {
        b.iter(|| black_box(parse_document_str(black_box(&content), None).unwrap()));
    });
}

criterion_group!(benches, bench_diff_and_check, bench_load);
criterion_main!(benches);
