//! PocketBase wire types.

use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(crate) struct AuthWithPasswordRequest<'a> {
    pub identity: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct AuthWithPasswordResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// One page of a list request.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListResponse<T> {
    #[serde(default)]
    pub total_items: Option<i64>,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Error body returned by every endpoint.
#[derive(Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ErrorResponse {
    /// Message plus the field errors, e.g.
    /// `Failed to create record. (sessionUrl: Cannot be blank.)`.
    pub fn describe(&self) -> String {
        let details: Vec<String> = self
            .data
            .as_object()
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|(field, detail)| {
                        detail
                            .get("message")
                            .and_then(|m| m.as_str())
                            .map(|m| format!("{}: {}", field, m))
                    })
                    .collect()
            })
            .unwrap_or_default();

        if details.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({})", self.message, details.join(", "))
        }
    }
}
