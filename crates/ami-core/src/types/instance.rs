use serde::{Deserialize, Serialize};

/// A compute instance observed during one scan pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance identifier (e.g. `i-0123456789abcdef0`)
    pub instance_id: String,

    /// Region the instance was listed in
    pub region: String,

    /// Image the instance was launched from, if the API reported one
    #[serde(default)]
    pub image_id: Option<String>,
}

impl Instance {
    /// Create an instance observation
    #[must_use]
    pub fn new(
        instance_id: impl Into<String>,
        region: impl Into<String>,
        image_id: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            region: region.into(),
            image_id: Some(image_id.into()),
        }
    }
}
