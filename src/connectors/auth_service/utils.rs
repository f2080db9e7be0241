use actix_web::http::header;
use actix_web::HttpRequest;

/// Pull the bearer token out of the Authorization header, if any
pub fn extract_bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
