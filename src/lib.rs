//! Energy consumption tracker: buildings, meters and their readings,
//! loaded from CSV uploads and charted as daily consumption per building.
//!
//! This library exposes the core modules for testing and reuse.

pub mod common;
pub mod config;
pub mod entity;
pub mod error;
pub mod ingest;
pub mod reports;
pub mod routes;
pub mod services;
