use serde::{Deserialize, Serialize};

/// A single moderation finding for an image
///
/// `confidence` is a percentage in [0, 100]. `parent_name` places the label
/// in the backend's category hierarchy, when the backend has one. The
/// `timestamp` only applies to labels derived from a frame-sequenced source
/// (video); for single images it is always absent. Serialization omits
/// absent fields so rendered labels carry only what was detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationLabel {
    pub name: String,

    pub confidence: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}
