//! Property-based tests for the diff engine and checker.
//!
//! Generates small but structurally varied documents and checks the
//! invariants every comparison must keep.

use api_diff::{
    changes::{Change, Level},
    checker::Checker,
    config::CheckConfig,
    diff::DiffEngine,
    loader::{parse_document_str, LoadedDocument},
    model::SourceLocations,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn type_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("string"),
        Just("integer"),
        Just("number"),
        Just("boolean"),
    ]
}

/// A leaf schema with a few optional constraints.
fn leaf_schema() -> impl Strategy<Value = Value> {
    (
        type_name(),
        proptest::option::of(0u64..50),
        proptest::option::of(-10i64..10),
        any::<bool>(),
    )
        .prop_map(|(ty, max_length, minimum, nullable)| {
            let mut schema = Map::new();
            schema.insert("type".to_string(), json!(ty));
            if let (Some(max), "string") = (max_length, ty) {
                schema.insert("maxLength".to_string(), json!(max));
            }
            if let (Some(min), "integer" | "number") = (minimum, ty) {
                schema.insert("minimum".to_string(), json!(min));
            }
            if nullable {
                schema.insert("nullable".to_string(), json!(true));
            }
            Value::Object(schema)
        })
}

/// An object schema; `Node` is self-referential so cycles are always present.
fn object_schema() -> impl Strategy<Value = Value> {
    (
        proptest::collection::btree_map("[a-e]", leaf_schema(), 0..4),
        proptest::collection::btree_set("[a-e]", 0..3),
    )
        .prop_map(|(properties, required)| {
            let mut properties: Map<String, Value> = properties.into_iter().collect();
            properties.insert("next".to_string(), json!({"$ref": "#/components/schemas/Node"}));
            let required: Vec<&String> = required.iter().filter(|r| properties.contains_key(*r)).collect();
            json!({"type": "object", "required": required, "properties": properties})
        })
}

fn operation(parameters: Vec<(String, bool, Value)>, deprecated: bool) -> Value {
    let parameters: Vec<Value> = parameters
        .into_iter()
        .map(|(name, required, schema)| {
            json!({"name": name, "in": "query", "required": required, "schema": schema})
        })
        .collect();
    json!({
        "deprecated": deprecated,
        "parameters": parameters,
        "responses": {
            "200": {
                "description": "ok",
                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Node"}}}
            }
        }
    })
}

fn document() -> impl Strategy<Value = String> {
    (
        proptest::collection::btree_map(
            "/[a-c]{1,3}",
            (
                proptest::collection::vec(("[p-s]", any::<bool>(), leaf_schema()), 0..3),
                any::<bool>(),
            ),
            1..4,
        ),
        object_schema(),
    )
        .prop_map(|(paths, node)| {
            let paths: Map<String, Value> = paths
                .into_iter()
                .map(|(path, (parameters, deprecated))| {
                    (path, json!({"get": operation(parameters, deprecated)}))
                })
                .collect();
            json!({
                "openapi": "3.0.3",
                "info": {"title": "generated", "version": "1"},
                "paths": paths,
                "components": {"schemas": {"Node": node}}
            })
            .to_string()
        })
}

fn load(content: &str) -> LoadedDocument {
    parse_document_str(content, None).expect("generated document parses")
}

fn classify(base: &LoadedDocument, revision: &LoadedDocument) -> Vec<Change> {
    let diff = DiffEngine::new().diff(&base.document, &revision.document);
    let sources = SourceLocations::new(base.locations.clone(), revision.locations.clone());
    Checker::new(CheckConfig::default()).run(&diff, &sources)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn self_diff_is_empty(content in document()) {
        let loaded = load(&content);
        let diff = DiffEngine::new().diff(&loaded.document, &loaded.document);
        prop_assert!(diff.is_empty());
        prop_assert!(classify(&loaded, &loaded).is_empty());
    }

    #[test]
    fn classification_is_deterministic(base in document(), revision in document()) {
        let base = load(&base);
        let revision = load(&revision);
        let first = classify(&base, &revision);
        let second = classify(&base, &revision);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn output_is_in_canonical_order(base in document(), revision in document()) {
        let changes = classify(&load(&base), &load(&revision));
        for pair in changes.windows(2) {
            prop_assert_ne!(pair[0].canonical_cmp(&pair[1]), std::cmp::Ordering::Greater);
        }
    }

    #[test]
    fn level_filter_keeps_only_higher(base in document(), revision in document()) {
        let base = load(&base);
        let revision = load(&revision);
        let diff = DiffEngine::new().diff(&base.document, &revision.document);
        let sources = SourceLocations::new(base.locations.clone(), revision.locations.clone());
        let checker = Checker::new(CheckConfig::default());
        let all = checker.run(&diff, &sources);
        let breaking = checker.run_filtered(&diff, &sources, Level::Err);
        prop_assert!(breaking.iter().all(|c| c.level == Level::Err));
        prop_assert_eq!(breaking.len(), all.iter().filter(|c| c.level == Level::Err).count());
    }
}
