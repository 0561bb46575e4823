use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::errors::ApiError;
use crate::http::HttpResponse;

/// Successful response envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Decode the body of a 2xx response into `T`.
    ///
    /// The envelope message is the body's top-level string `message`, if any.
    pub fn from_http(response: HttpResponse) -> Result<Self, ApiError> {
        let status = response.status.as_u16();
        let message = match &response.body {
            Value::Object(map) => map.get("message").and_then(Value::as_str).map(str::to_string),
            _ => None,
        };

        let data = serde_json::from_value(response.body)
            .map_err(|err| ApiError::Decode { status, message: err.to_string() })?;

        Ok(Self { data, status, success: true, message })
    }
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        self.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse { data: f(self.data), status: self.status, success: self.success, message: self.message }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ack {
        id: String,
    }

    #[test]
    fn decodes_typed_data_and_message() {
        let response = HttpResponse {
            status: StatusCode::CREATED,
            body: json!({"id": "u1", "message": "User created"}),
        };
        let envelope: ApiResponse<Ack> = ApiResponse::from_http(response).unwrap();
        assert_eq!(envelope.data, Ack { id: "u1".into() });
        assert_eq!(envelope.status, 201);
        assert!(envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("User created"));
    }

    #[test]
    fn empty_body_decodes_into_unit() {
        let response = HttpResponse { status: StatusCode::NO_CONTENT, body: Value::Null };
        let envelope: ApiResponse<()> = ApiResponse::from_http(response).unwrap();
        assert_eq!(envelope.status, 204);
    }

    #[test]
    fn shape_mismatch_is_a_decode_error() {
        let response = HttpResponse { status: StatusCode::OK, body: json!({"unexpected": true}) };
        let err = ApiResponse::<Ack>::from_http(response).unwrap_err();
        assert!(matches!(err, ApiError::Decode { status: 200, .. }));
    }
}
