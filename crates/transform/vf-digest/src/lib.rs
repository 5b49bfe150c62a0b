//! vf-digest - flow record summaries for vpcflow-stream.
//!
//! Consumes the text of VPC flow log version 2 records, such as the stream
//! produced by `vf_prefetch::BucketReader`, and provides:
//!
//! - [`Digester`]: groups records by their stable fields and sums the
//!   traffic counters of each group
//! - [`DotGraph`]: renders records as a directed Graphviz graph
//!
//! Both skip records of other versions and records whose log status is not
//! `OK` (header lines, `NODATA`, `SKIPDATA`).

mod digester;
mod dot;
mod record;

pub use digester::{Digest, Digester, digest};
pub use dot::{DotGraph, to_dot};
pub use record::{FIELD_COUNT, FlowRecord, KEY_FIELDS};
