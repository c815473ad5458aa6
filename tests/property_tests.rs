//! Property-based tests for kfmd
//!
//! - `__ALL_META__` recovers every constructor-supplied field
//! - wire properties are always string-typed
//! - reserved custom properties never reach the service
//! - Run with ProptestConfig::with_cases(100)

use std::collections::BTreeMap;
use std::sync::Arc;

use kfmd::artifact::{Artifact, DataSet, Metrics, MetricsType, Model, ALL_META_PROPERTY};
use kfmd::service::{MemoryMetadataService, MetadataValue};
use kfmd::{Error, Run, Workspace};
use proptest::prelude::*;

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _./:-]{1,24}"
}

fn arb_labels() -> impl Strategy<Value = BTreeMap<String, String>> {
    proptest::collection::btree_map("[a-z]{1,8}", arb_text(), 0..4)
}

fn arb_metrics_type() -> impl Strategy<Value = MetricsType> {
    prop_oneof![
        Just(MetricsType::Training),
        Just(MetricsType::Validation),
        Just(MetricsType::Testing),
        Just(MetricsType::Production),
    ]
}

fn arb_data_set() -> impl Strategy<Value = DataSet> {
    (
        arb_text(),
        arb_text(),
        proptest::option::of(arb_text()),
        proptest::option::of(arb_text()),
        proptest::option::of(arb_text()),
        arb_labels(),
        proptest::collection::btree_map("x_[a-z]{1,6}", any::<i64>(), 0..3),
    )
        .prop_map(|(name, uri, description, version, query, labels, extra)| {
            let mut builder = DataSet::builder(name, uri).labels(labels);
            if let Some(description) = description {
                builder = builder.description(description);
            }
            if let Some(version) = version {
                builder = builder.version(version);
            }
            if let Some(query) = query {
                builder = builder.query(query);
            }
            for (key, value) in extra {
                builder = builder.property(key, value);
            }
            builder.build()
        })
}

fn arb_model() -> impl Strategy<Value = Model> {
    (
        arb_text(),
        arb_text(),
        proptest::option::of(arb_text()),
        proptest::collection::btree_map("[a-z_]{1,10}", -1.0e6f64..1.0e6, 0..4),
    )
        .prop_map(|(name, uri, model_type, hyperparameters)| {
            let mut builder = Model::builder(name, uri);
            if let Some(model_type) = model_type {
                builder = builder.model_type(model_type);
            }
            for (key, value) in hyperparameters {
                builder = builder.hyperparameter(key, value);
            }
            builder.build()
        })
}

/// Scalar scores, labels, matrices, and per-class maps.
fn arb_metric_value() -> impl Strategy<Value = serde_json::Value> {
    let score = (0.0f64..1.0).prop_map(serde_json::Value::from);
    let count = any::<u32>().prop_map(serde_json::Value::from);
    prop_oneof![
        score.clone(),
        count.clone(),
        arb_text().prop_map(serde_json::Value::from),
        proptest::collection::vec(proptest::collection::vec(count, 0..4), 0..4)
            .prop_map(|rows| serde_json::json!(rows)),
        proptest::collection::btree_map("[a-z]{1,6}", score, 0..4)
            .prop_map(|per_class| serde_json::json!(per_class)),
    ]
}

fn arb_metrics() -> impl Strategy<Value = Metrics> {
    (
        arb_text(),
        arb_text(),
        arb_metrics_type(),
        proptest::collection::btree_map("[a-z_]{1,10}", arb_metric_value(), 0..4),
        proptest::collection::btree_map(
            "s_[a-z]{1,6}",
            prop_oneof![
                Just(f64::NAN),
                Just(f64::INFINITY),
                Just(f64::NEG_INFINITY),
                -1.0e6f64..1.0e6,
            ],
            0..3,
        ),
    )
        .prop_map(|(name, uri, metrics_type, values, scores)| {
            let mut builder = Metrics::builder(name, uri)
                .metrics_type(metrics_type)
                .values(values);
            for (key, score) in scores {
                builder = builder.score(key, score);
            }
            builder.build()
        })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: decoding __ALL_META__ recovers the data set
    #[test]
    fn prop_data_set_all_meta_round_trip(data_set in arb_data_set()) {
        let body = data_set.serialization().unwrap();
        let snapshot = body.string_property(ALL_META_PROPERTY).unwrap();
        prop_assert!(!snapshot.is_empty());
        prop_assert_eq!(DataSet::from_all_meta(snapshot).unwrap(), data_set);
    }

    /// Property: decoding __ALL_META__ recovers the model
    #[test]
    fn prop_model_all_meta_round_trip(model in arb_model()) {
        let body = model.serialization().unwrap();
        let snapshot = body.string_property(ALL_META_PROPERTY).unwrap();
        prop_assert_eq!(Model::from_all_meta(snapshot).unwrap(), model);
    }

    /// Property: decoding __ALL_META__ recovers the metrics
    #[test]
    fn prop_metrics_all_meta_round_trip(metrics in arb_metrics()) {
        let body = metrics.serialization().unwrap();
        let snapshot = body.string_property(ALL_META_PROPERTY).unwrap();
        prop_assert_eq!(Metrics::from_all_meta(snapshot).unwrap(), metrics);
    }

    /// Property: every discrete property is a string value
    #[test]
    fn prop_properties_are_strings(
        data_set in arb_data_set(),
        model in arb_model(),
        metrics in arb_metrics(),
    ) {
        let bodies = [
            data_set.serialization().unwrap(),
            model.serialization().unwrap(),
            metrics.serialization().unwrap(),
        ];
        for body in &bodies {
            for value in body.properties.values() {
                prop_assert!(matches!(value, MetadataValue::StringValue(_)));
            }
        }
    }

    /// Property: the uri is carried at the top level, never as a property
    #[test]
    fn prop_uri_is_top_level(data_set in arb_data_set()) {
        let body = data_set.serialization().unwrap();
        prop_assert_eq!(body.uri.as_str(), data_set.uri());
        prop_assert!(!body.properties.contains_key("uri"));
    }

    /// Property: a logged artifact is tagged with exactly the workspace and
    /// run names plus its own custom properties
    #[test]
    fn prop_log_tags_artifact(
        ws_name in arb_text(),
        run_name in arb_text(),
        extra_custom in proptest::collection::btree_map("[a-z]{1,8}", arb_text(), 0..4),
    ) {
        let service = Arc::new(MemoryMetadataService::new());
        let workspace = Workspace::builder("127.0.0.1:8080", ws_name.clone())
            .service(service.clone())
            .build()
            .unwrap();
        let run = Run::new(&workspace, run_name.clone());

        let mut builder = DataSet::builder("d", "u");
        for (key, value) in &extra_custom {
            builder = builder.custom_property(key.clone(), value.clone());
        }
        let mut data_set = builder.build();
        run.log(&mut data_set).unwrap();
        prop_assert_eq!(data_set.id(), Some("1"));

        let stored = service.artifacts(DataSet::ARTIFACT_TYPE_NAME);
        let custom = stored[0].custom_properties.as_ref().unwrap();
        prop_assert_eq!(custom.len(), extra_custom.len() + 2);
        prop_assert_eq!(custom["__kf_workspace__"].as_str(), Some(ws_name.as_str()));
        prop_assert_eq!(custom["__kf_run__"].as_str(), Some(run_name.as_str()));
        for (key, value) in &extra_custom {
            prop_assert_eq!(custom[key].as_str(), Some(value.as_str()));
        }
    }

    /// Property: reserved custom properties are rejected before any call
    #[test]
    fn prop_reserved_key_never_sent(
        use_run_key in any::<bool>(),
        value in arb_text(),
    ) {
        let service = Arc::new(MemoryMetadataService::new());
        let workspace = Workspace::builder("127.0.0.1:8080", "ws1")
            .service(service.clone())
            .build()
            .unwrap();
        let run = Run::new(&workspace, "run-1");
        let key = if use_run_key { Run::RUN_PROPERTY_NAME } else { Run::WORKSPACE_PROPERTY_NAME };

        let mut model = Model::builder("m", "u").custom_property(key, value).build();
        let result = run.log(&mut model);

        prop_assert!(matches!(result, Err(Error::ReservedProperty(_))));
        prop_assert!(service.is_empty());
        prop_assert!(model.id().is_none());
    }
}
