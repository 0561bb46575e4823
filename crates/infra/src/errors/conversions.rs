//! Conversions from external infrastructure errors into API errors.

use opsdeck_domain::OpsDeckError;
use reqwest::Error as HttpError;

use crate::api::errors::ApiError;

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        if err.is_builder() {
            return ApiError::Config(format!("invalid HTTP request: {err}"));
        }

        if err.is_decode() {
            let status = err.status().map_or(0, |s| s.as_u16());
            return ApiError::Decode { status, message: err.to_string() };
        }

        // Connect, request and body failures all mean no usable response.
        ApiError::Network(describe(&err))
    }
}

fn describe(err: &HttpError) -> String {
    let kind = if err.is_connect() {
        "connection failed"
    } else if err.is_body() {
        "failed to read HTTP body"
    } else {
        "HTTP request failed"
    };

    match err.url() {
        Some(url) => format!("{kind} for {url}: {err}"),
        None => format!("{kind}: {err}"),
    }
}

/* -------------------------------------------------------------------------- */
/* OpsDeckError ↔ ApiError */
/* -------------------------------------------------------------------------- */

impl From<OpsDeckError> for ApiError {
    fn from(err: OpsDeckError) -> Self {
        match err {
            OpsDeckError::Config(msg) => ApiError::Config(msg),
            OpsDeckError::Storage(msg) => ApiError::Storage(msg),
            OpsDeckError::Serialization(msg) => ApiError::Encode(msg),
            OpsDeckError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            OpsDeckError::Internal(msg) => ApiError::Storage(msg),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Encode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    #[test]
    fn domain_errors_keep_their_kind() {
        assert!(matches!(
            ApiError::from(OpsDeckError::Storage("disk full".into())),
            ApiError::Storage(msg) if msg == "disk full"
        ));
        assert!(matches!(
            ApiError::from(OpsDeckError::InvalidInput("bad".into())),
            ApiError::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn refused_connection_maps_to_network() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = reqwest::Client::new()
            .get(format!("http://{addr}"))
            .send()
            .await
            .expect_err("connection should be refused");

        let mapped = ApiError::from(err);
        assert!(matches!(mapped, ApiError::Network(ref msg) if msg.contains("connection failed")));
        assert_eq!(mapped.status(), 0);
    }

    #[test]
    fn invalid_url_is_a_config_error() {
        let err = reqwest::Client::new().get("not a url").build().expect_err("builder error");
        assert!(matches!(ApiError::from(err), ApiError::Config(_)));
    }
}
