use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
}

impl Address {
    pub fn new(line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            line1: line1.into(),
            line2: line2.into(),
        }
    }

    /// Form fields carry the address as a JSON-encoded object.
    pub fn from_json_field(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
