//! # anylink-core
//!
//! Core types shared across all anylink crates:
//! - Entity structs for the discovery, auth and search data model
//! - Layout, reference-kind and selection-policy enums

pub mod entities;
pub mod enums;
