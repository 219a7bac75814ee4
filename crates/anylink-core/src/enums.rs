//! Layout kinds, reference kinds and endpoint selection policies.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// LayoutKind
// ---------------------------------------------------------------------------

/// Object layout as reported by the remote `layout` detail.
///
/// Numeric values follow the application's object-type layout enumeration.
/// Unknown values are preserved in [`LayoutKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    #[default]
    Basic,
    Profile,
    Todo,
    Set,
    ObjectType,
    Relation,
    File,
    Dashboard,
    Image,
    Note,
    Space,
    Bookmark,
    RelationOptionsList,
    RelationOption,
    Collection,
    Audio,
    Video,
    Date,
    SpaceView,
    Participant,
    Pdf,
    Other(i64),
}

impl LayoutKind {
    /// Map the remote numeric layout code.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Basic,
            1 => Self::Profile,
            2 => Self::Todo,
            3 => Self::Set,
            4 => Self::ObjectType,
            5 => Self::Relation,
            6 => Self::File,
            7 => Self::Dashboard,
            8 => Self::Image,
            9 => Self::Note,
            10 => Self::Space,
            11 => Self::Bookmark,
            12 => Self::RelationOptionsList,
            13 => Self::RelationOption,
            14 => Self::Collection,
            15 => Self::Audio,
            16 => Self::Video,
            17 => Self::Date,
            18 => Self::SpaceView,
            19 => Self::Participant,
            20 => Self::Pdf,
            other => Self::Other(other),
        }
    }

    /// Return the snake_case name used in output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Profile => "profile",
            Self::Todo => "todo",
            Self::Set => "set",
            Self::ObjectType => "object_type",
            Self::Relation => "relation",
            Self::File => "file",
            Self::Dashboard => "dashboard",
            Self::Image => "image",
            Self::Note => "note",
            Self::Space => "space",
            Self::Bookmark => "bookmark",
            Self::RelationOptionsList => "relation_options_list",
            Self::RelationOption => "relation_option",
            Self::Collection => "collection",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Date => "date",
            Self::SpaceView => "space_view",
            Self::Participant => "participant",
            Self::Pdf => "pdf",
            Self::Other(_) => "other",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(code) => write!(f, "other({code})"),
            _ => f.write_str(self.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// ReferenceKind
// ---------------------------------------------------------------------------

/// Which in-text grammar produced a reference edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// `[[Name]]` or `#[[Name]]`.
    Bracket,
    /// `#word`.
    Hashtag,
}

impl ReferenceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bracket => "bracket",
            Self::Hashtag => "hashtag",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SelectionPolicy
// ---------------------------------------------------------------------------

/// How the primary port is picked among candidate listening endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Numerically smallest port.
    #[default]
    LowestPort,
    /// Highest OS socket ordinal, as a proxy for the most recently opened
    /// listener. Heuristic only: ordinals carry no ordering guarantee across
    /// OS versions.
    MostRecent,
}

impl SelectionPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LowestPort => "lowest_port",
            Self::MostRecent => "most_recent",
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
