use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Serialize;

/// JSON response with the permissive CORS header every handler sets.
pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(value)?.into())
        .map_err(Box::new)?)
}

/// `{"error": message}` with the given status.
pub fn error(status: StatusCode, message: impl AsRef<str>) -> Result<Response<Body>, Error> {
    json(status, &serde_json::json!({ "error": message.as_ref() }))
}

/// `{"message": message}` with 200.
pub fn message(message: impl AsRef<str>) -> Result<Response<Body>, Error> {
    json(StatusCode::OK, &serde_json::json!({ "message": message.as_ref() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_is_wrapped() {
        let resp = error(StatusCode::BAD_REQUEST, "Missing parameters").unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["error"], "Missing parameters");
    }

    #[test]
    fn message_is_ok() {
        let resp = message("Photo deleted successfully").unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["message"], "Photo deleted successfully");
    }
}
