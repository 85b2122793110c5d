use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseTables {
    pub tables: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DefaultMessage {
    pub message: String,
}

impl DefaultMessage {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SetupParams {
    #[serde(default, deserialize_with = "crate::extract::flag")]
    pub reset: bool,
}
