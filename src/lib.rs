//! traffic-report core library.
//!
//! Aggregates the results of an API traffic validation run (per-operation
//! validation issues and per-spec coverage) into a single rendered report.
//!
//! High-level modules:
//! - `catalog`: Error catalog loading behind the `ContentLoader` seam.
//! - `links`: Payload/spec link rewriting under configurable prefixes.
//! - `aggregate`: Sorting, enrichment, grouping, and report metrics.
//! - `render`: Mustache rendering and report persistence.
//! - `config`: Discovery and report options resolution.
//! - `models`: Input records, catalog schema, and rendering views.
//! - `naming`: Conventional artifact paths for scenario runs.
//! - `cli` / `output`: Argument parsing and summary printers for the binary.
//! - `error`: Shared error type.
pub mod aggregate;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod links;
pub mod models;
pub mod naming;
pub mod output;
pub mod render;
