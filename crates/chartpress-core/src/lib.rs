//! Chartpress Core - Chart staging, preparation and publishing
//!
//! This crate provides the chart pipeline driven by a release:
//! - `StagingArea`: working copy of the chart source and chart discovery
//! - `ChartPreparer`: version stamping, dependency resolution and packaging
//! - `ChartPublisher`: pushing packaged archives to a chart registry
//! - `CommandRunner`: the seam every external tool is invoked through

pub mod error;
pub mod exec;
pub mod preparer;
pub mod publisher;
pub mod rewrite;
pub mod staging;
pub mod tools;

pub use error::{ChartError, Result};
pub use exec::{CommandOutput, CommandRunner, Invocation, MockResponse, MockRunner, SystemRunner};
pub use preparer::{ChartPreparer, DEFAULT_VERSION_TOKEN, PrepOptions, PreparerSettings};
pub use publisher::{ChartPublisher, find_archives};
pub use staging::{StagingArea, discover_chart_dirs};
