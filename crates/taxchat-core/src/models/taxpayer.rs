use serde::{Deserialize, Serialize};

/// A taxpayer record served by the backend.
///
/// Read-only on the client side — the backend owns these, including the id,
/// which is an opaque string rather than a UUID we mint ourselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taxpayer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
    pub created_at: jiff::Timestamp,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_login_at: Option<jiff::Timestamp>,
}

impl Taxpayer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
