use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

/// Checks `Authorization: Bearer <token>`. No configured token means the
/// endpoint is open.
pub(super) fn verify_bearer(headers: &HeaderMap, expected: Option<&str>) -> Result<(), &'static str> {
    let Some(token) = expected.filter(|value| !value.trim().is_empty()) else {
        return Ok(());
    };
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or("missing_token")?;
    let provided = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or("invalid_token")?;
    if provided != token.trim() {
        return Err("invalid_token");
    }
    Ok(())
}
