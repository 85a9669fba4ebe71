//! API response types and wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level `status` field of every JSON response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Fail,
    Error,
}

impl ResponseStatus {
    /// `fail` for 4xx, `error` for everything else that is not a success
    pub fn for_status_code(code: u16) -> Self {
        match code {
            200..=399 => ResponseStatus::Success,
            400..=499 => ResponseStatus::Fail,
            _ => ResponseStatus::Error,
        }
    }
}

/// `{"data": ...}` wrapper used inside the `data` field of document responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,

    /// Time the request entered the server (list endpoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_at: Option<DateTime<Utc>>,

    /// Number of documents returned (list endpoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,

    /// Session token (auth endpoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response carrying `data`
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            requested_at: None,
            results: None,
            token: None,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_results(mut self, results: usize) -> Self {
        self.results = Some(results);
        self
    }

    pub fn with_requested_at(mut self, requested_at: DateTime<Utc>) -> Self {
        self.requested_at = Some(requested_at);
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Extract the data, consuming the response
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl<T> ApiResponse<DataEnvelope<T>> {
    /// `{"status":"success","data":{"data":...}}`
    pub fn document(data: T) -> Self {
        Self::success(DataEnvelope { data })
    }
}

impl<T> ApiResponse<DataEnvelope<Vec<T>>> {
    /// List response with `results` and `requestedAt`
    pub fn list(items: Vec<T>, requested_at: DateTime<Utc>) -> Self {
        let results = items.len();
        Self::success(DataEnvelope { data: items })
            .with_results(results)
            .with_requested_at(requested_at)
    }
}

impl ApiResponse<()> {
    /// Success response without data
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            requested_at: None,
            results: None,
            token: None,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_response_shape() {
        let now = Utc::now();
        let response = ApiResponse::list(vec![json!({"name": "a"}), json!({"name": "b"})], now);
        let body = serde_json::to_value(&response).unwrap();

        assert_eq!(body["status"], "success");
        assert_eq!(body["results"], 2);
        assert!(body["requestedAt"].is_string());
        assert_eq!(body["data"]["data"][1]["name"], "b");
        assert!(body.get("token").is_none());
    }

    #[test]
    fn test_message_response_has_no_data() {
        let body = serde_json::to_value(ApiResponse::message("Token sent to email!")).unwrap();
        assert_eq!(body["message"], "Token sent to email!");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn test_status_for_codes() {
        assert_eq!(ResponseStatus::for_status_code(201), ResponseStatus::Success);
        assert_eq!(ResponseStatus::for_status_code(429), ResponseStatus::Fail);
        assert_eq!(ResponseStatus::for_status_code(503), ResponseStatus::Error);
    }
}
