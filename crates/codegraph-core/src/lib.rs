//! Shared graph data model for codegraph's extraction pipeline.
//!
//! - [`model`] — node/edge kinds and the `Node`/`Edge` records extractors emit
//! - [`id`] — deterministic content hashing used to build stable node/edge IDs
//! - [`error`] — the error taxonomy extractors and the classifier report
//! - [`properties`] — comma-joined property string helpers shared by every
//!   extractor and by the classifier

pub mod error;
pub mod id;
pub mod model;
pub mod properties;
