// Fleet control models (POST /add-miner, /delete-miner, /ai-assist)

use serde::{Deserialize, Serialize};

/// Body for `POST /add-miner`; `/delete-miner` takes the same shape with the
/// ip left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionResponse {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ActionResponse {
    /// Text to surface for this outcome, matching how the panel reports it.
    pub fn display(&self) -> &str {
        if self.success {
            self.message.as_deref().unwrap_or("OK")
        } else {
            self.error.as_deref().unwrap_or("Action failed")
        }
    }
}

/// Body for `POST /ai-assist`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistRequest {
    pub provider: String,
    pub question: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistResponse {
    pub success: bool,
    pub response: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl AssistResponse {
    pub fn display(&self) -> &str {
        if self.success {
            self.response.as_deref().unwrap_or("")
        } else {
            self.error
                .as_deref()
                .or(self.message.as_deref())
                .unwrap_or("Relay failed")
        }
    }
}
