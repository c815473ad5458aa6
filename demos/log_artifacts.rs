//! Artifact Logging Example
//!
//! Logs a data set, a model, and its evaluation metrics for one run.
//!
//! Run with: cargo run --example log_artifacts [backend_url_prefix]
//!
//! Without a backend URL prefix the artifacts go to an in-memory service.

use std::sync::Arc;

use kfmd::artifact::{Artifact, DataSet, Metrics, MetricsType, Model};
use kfmd::service::MemoryMetadataService;
use kfmd::{Run, Workspace};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== kfmd Artifact Logging ===\n");

    let backend = std::env::args().nth(1);
    let mut builder = Workspace::builder(backend.clone().unwrap_or_else(|| "in-memory".to_string()), "ws1")
        .description("a workspace for testing")
        .label("n1", "v1");
    if backend.is_none() {
        builder = builder.service(Arc::new(MemoryMetadataService::new()));
    }
    let workspace = builder.build()?;
    println!("Workspace: {} ({})", workspace.name(), workspace.backend_url_prefix());

    let run = Run::new(&workspace, "run-1").with_description("a run in ws_1");

    // -------------------------------------------------------------------------
    // 1. Data set
    // -------------------------------------------------------------------------
    let mut data_set = DataSet::builder("mytable-dump", "file://path/to/dataset")
        .description("a test data set")
        .owner("owner@my-company.org")
        .version("v1.0.0")
        .query("SELECT * FROM mytable")
        .build();
    run.log(&mut data_set)?;
    println!("Data set id: {:?}", data_set.id());

    // -------------------------------------------------------------------------
    // 2. Model
    // -------------------------------------------------------------------------
    let mut model = Model::builder("MNIST", "gcs://my-bucket/mnist")
        .description("model to recognize handwritten digits")
        .owner("someone@kubeflow.org")
        .model_type("neural network")
        .training_framework(serde_json::json!({"name": "tensorflow", "version": "v1.0"}))
        .hyperparameter("learning_rate", 0.5)
        .hyperparameter("layers", serde_json::json!([10, 3, 1]))
        .hyperparameter("early_stop", true)
        .version("v0.0.1")
        .label("mylabel", "l1")
        .build();
    run.log(&mut model)?;
    println!("Model id: {:?}", model.id());

    // -------------------------------------------------------------------------
    // 3. Metrics
    // -------------------------------------------------------------------------
    let mut metrics = Metrics::builder("MNIST-evaluation", "gcs://my-bucket/mnist-eval.csv")
        .description("validating the MNIST model to recognize handwritten digits")
        .owner("someone@kubeflow.org")
        .data_set_id(data_set.id().unwrap_or_default())
        .model_id(model.id().unwrap_or_default())
        .metrics_type(MetricsType::Validation)
        .value("accuracy", 0.95)
        .label("mylabel", "l1")
        .build();
    run.log(&mut metrics)?;
    println!("Metrics id: {:?}", metrics.id());

    Ok(())
}
