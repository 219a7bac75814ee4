//! # anylink-search
//!
//! Everything built on top of an authenticated session:
//! - [`SearchFacade`]: one full-text call, retried on transient failures
//! - [`ExactNameResolver`] for references, [`FuzzyTypeResolver`] for the
//!   type picker
//! - Token grammars for `[[Name]]` and `#tag` references
//! - [`LinkGraphExtractor`] and the [`LinkGraph`] it accumulates

pub mod error;
pub mod extractor;
pub mod facade;
pub mod graph;
pub mod resolver;
pub mod tokens;

pub use error::SearchError;
pub use extractor::{LinkGraphExtractor, SweepStats};
pub use facade::SearchFacade;
pub use graph::{LinkGraph, LinkReport, LinkedObject};
pub use resolver::{ExactNameResolver, FuzzyTypeResolver, TypeCandidate};
