use serde::{Deserialize, Serialize};

use crate::enums::ReferenceKind;

/// A directed reference from a source object to a resolved target object,
/// inferred from a highlight snippet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ReferenceEdge {
    pub source_object_id: String,
    pub source_name: String,
    pub target_object_id: String,
    pub target_name: String,
    /// Highlight snippet the reference token was found in.
    pub evidence: String,
    pub kind: ReferenceKind,
}
