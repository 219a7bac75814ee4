//! Entity structs for the anylink data model.

pub mod credential;
pub mod edge;
pub mod endpoint;
pub mod search;

pub use credential::{Credential, SessionToken};
pub use edge::ReferenceEdge;
pub use endpoint::ListeningEndpoint;
pub use search::{SearchQuery, SearchResult};
