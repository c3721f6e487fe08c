//! Wire formatting of batch results

use axum::{
    http::{
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use steamfilter_common::{GameRecord, Result};
use tracing::warn;

/// Serialize records as a JSON array; an empty batch is `[]`, never `null`
pub fn format_records(records: &[GameRecord]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

/// Build a response carrying the headers every endpoint returns
pub fn api_response(status: StatusCode, body: String, origin: &str) -> Response {
    let mut response = (status, body).into_response();
    let headers = response.headers_mut();

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    match HeaderValue::from_str(origin) {
        Ok(value) => {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        Err(_) => warn!("Dropping unusable origin header: {:?}", origin),
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch_is_empty_array() {
        assert_eq!(format_records(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_records_serialize_as_array() {
        let records = vec![GameRecord {
            app_id: 10,
            name: "Counter-Strike".to_string(),
            ..Default::default()
        }];
        let json: serde_json::Value =
            serde_json::from_str(&format_records(&records).unwrap()).unwrap();
        assert_eq!(json[0]["AppId"], 10);
        assert_eq!(json[0]["Name"], "Counter-Strike");
    }

    #[test]
    fn test_api_response_headers() {
        let response = api_response(StatusCode::OK, "[]".to_string(), "https://app.example");
        let headers = response.headers();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "https://app.example");
    }
}
