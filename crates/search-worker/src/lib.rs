//! Search job worker.
//!
//! Reads search jobs as JSON, one per line, runs the engine on each and
//! answers with the chosen move, `null` when there is none, or an error
//! description. Nothing a job contains can make the worker fail: malformed
//! input, invalid positions and panics inside the engine all become error
//! responses.
//!
//! # Example
//!
//! ```
//! use search_worker::{JobResponse, Worker, WorkerConfig};
//!
//! let config = WorkerConfig { seed: Some(1), ..WorkerConfig::default() };
//! let mut worker = Worker::from_config(config);
//! let response = worker.handle_line(r#"{"message":"search"}"#);
//! assert!(matches!(response, JobResponse::Error { .. }));
//! ```

pub mod config;
pub mod job;

pub use config::{ConfigError, WorkerConfig, CONFIG_FILE};
pub use job::{
    JobError, JobRequest, JobResponse, Layout, Mask, PositionSnapshot, Side, SnapshotMasks,
    WireMove, Worker, SEARCH_MESSAGE,
};
