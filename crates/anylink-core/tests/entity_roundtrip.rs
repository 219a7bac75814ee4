//! Serde roundtrip tests for entities that cross crate or process boundaries.

use std::collections::BTreeMap;

use anylink_core::entities::{Credential, ListeningEndpoint, ReferenceEdge, SearchResult};
use anylink_core::enums::{LayoutKind, ReferenceKind};
use pretty_assertions::assert_eq;

macro_rules! roundtrip {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );
        }
    };
}

roundtrip!(
    endpoint_roundtrip,
    ListeningEndpoint,
    ListeningEndpoint {
        pid: 4242,
        process_name: "anytypeHelper".into(),
        port: 31007,
        ordinal: Some(918_273),
    }
);

roundtrip!(
    credential_roundtrip,
    Credential,
    Credential {
        app_key: Some("k1".into()),
        default_type_key: None,
    }
);

roundtrip!(
    edge_roundtrip,
    ReferenceEdge,
    ReferenceEdge {
        source_object_id: "obj-1".into(),
        source_name: "Daily".into(),
        target_object_id: "obj-2".into(),
        target_name: "Alpha".into(),
        evidence: "See [[Alpha]]".into(),
        kind: ReferenceKind::Bracket,
    }
);

roundtrip!(
    search_result_with_unknown_layout_roundtrip,
    SearchResult,
    SearchResult {
        object_id: "obj-3".into(),
        space_id: Some("space-a".into()),
        name: "Gamma".into(),
        type_id: None,
        layout: LayoutKind::Other(42),
        fields: BTreeMap::new(),
        highlights: vec!["#gamma".into()],
    }
);
