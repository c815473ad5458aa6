//! # kfmd: Kubeflow Metadata Client
//!
//! Logs metadata of machine learning workflows (data sets, models,
//! evaluation metrics) to a Kubeflow metadata service.
//!
//! ## Schema Overview
//!
//! ```text
//! Workspace (1) ──< Run (N)
//!                     │
//!                     └── log(&mut artifact) ──> MetadataService::create_artifact
//!                                                  (DataSet | Model | Metrics)
//! ```
//!
//! Every logged artifact carries the workspace and run names as the
//! `__kf_workspace__` / `__kf_run__` custom properties.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use kfmd::artifact::{Artifact, DataSet};
//! use kfmd::service::MemoryMetadataService;
//! use kfmd::{Run, Workspace};
//!
//! let workspace = Workspace::builder("127.0.0.1:8080", "ws1")
//!     .description("a workspace for testing")
//!     .service(Arc::new(MemoryMetadataService::new()))
//!     .build()?;
//! let run = Run::new(&workspace, "run-1");
//!
//! let mut data_set = DataSet::builder("mytable-dump", "file://path/to/dataset")
//!     .owner("owner@my-company.org")
//!     .version("v1.0.0")
//!     .query("SELECT * FROM mytable")
//!     .build();
//! run.log(&mut data_set)?;
//! assert_eq!(data_set.id(), Some("1"));
//! # Ok::<(), kfmd::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod artifact;
pub mod error;
pub mod run;
pub mod service;
pub mod time;
pub mod workspace;

pub use artifact::{Artifact, DataSet, Metrics, MetricsType, Model};
pub use error::{Error, Result};
pub use run::Run;
pub use workspace::{Workspace, WorkspaceBuilder};
