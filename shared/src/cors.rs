use lambda_http::http::header::{HeaderValue, VARY};
use lambda_http::{Body, Response};

pub const ALLOWED_METHODS: &str = "GET,POST,PATCH,DELETE,OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type,Authorization";

/// Echo the request origin when allowed, otherwise the first allowed origin
pub fn get_cors_origin<'a>(request_origin: Option<&'a str>, allowed: &'a [String]) -> &'a str {
    match request_origin {
        Some(origin) if allowed.iter().any(|a| a == origin) => origin,
        _ => allowed.first().map(String::as_str).unwrap_or("*"),
    }
}

pub fn with_cors_headers(
    mut resp: Response<Body>,
    request_origin: Option<&str>,
    allowed: &[String],
) -> Response<Body> {
    let cors_origin = get_cors_origin(request_origin, allowed);

    let headers = resp.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_str(cors_origin).unwrap_or_else(|_| HeaderValue::from_static("*")),
    );
    headers.insert("Access-Control-Allow-Methods", HeaderValue::from_static(ALLOWED_METHODS));
    headers.insert("Access-Control-Allow-Headers", HeaderValue::from_static(ALLOWED_HEADERS));
    headers.append(VARY, HeaderValue::from_static("Origin"));

    resp
}
