//! Request-body sanitization.
//!
//! Runs before authentication: JSON bodies are screened field by field.
//! String fields matching a known injection signature reject the whole
//! request with a 400 naming the field; safe strings are rewritten
//! HTML-entity-escaped before the handler deserializes the body. Credential
//! fields (any key containing "password" or "token", case-insensitive) and
//! non-string values pass through untouched.
//!
//! This is a best-effort denylist, not a parser-based defense. The storage
//! layer is protected independently by parameter binding.

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use crate::utils::errors::AppError;

const MAX_BODY_BYTES: usize = 1024 * 1024;

const INJECTION_SIGNATURES: &[(&str, &str)] = &[
    ("<script", "contains a script tag"),
    ("</script", "contains a script tag"),
    ("<iframe", "contains an iframe tag"),
    ("javascript:", "contains a javascript: URL"),
    ("onerror=", "contains an inline event handler"),
    ("onload=", "contains an inline event handler"),
    ("union select", "contains a SQL meta sequence"),
    ("drop table", "contains a SQL meta sequence"),
    ("insert into", "contains a SQL meta sequence"),
    ("delete from", "contains a SQL meta sequence"),
    ("' or '", "contains a SQL meta sequence"),
    ("\" or \"", "contains a SQL meta sequence"),
    ("or 1=1", "contains a SQL meta sequence"),
    ("; --", "contains a SQL meta sequence"),
    ("xp_cmdshell", "contains a SQL meta sequence"),
];

/// Middleware that screens and normalizes string fields in JSON bodies.
pub async fn sanitize_request(req: Request, next: Next) -> Result<Response, AppError> {
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    if !is_json {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();
    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| AppError::bad_request("Request body too large"))?;

    let rebuilt = match serde_json::from_slice::<Value>(&bytes) {
        Ok(mut value) => {
            sanitize_value(&mut value)?;
            serde_json::to_vec(&value).map_err(AppError::internal)?
        }
        // Malformed JSON is left for the body extractor to report.
        Err(_) => bytes.to_vec(),
    };

    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(rebuilt.len()));

    Ok(next.run(Request::from_parts(parts, Body::from(rebuilt))).await)
}

fn is_credential_field(name: &str) -> bool {
    let lowered = name.to_lowercase();
    lowered.contains("password") || lowered.contains("token")
}

fn unsafe_reason(value: &str) -> Option<&'static str> {
    let lowered = value.to_lowercase();
    INJECTION_SIGNATURES
        .iter()
        .find(|(signature, _)| lowered.contains(signature))
        .map(|(_, reason)| *reason)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Walks the body, rejecting on the first unsafe string field and escaping
/// the rest in place. Rejection aborts the whole request; there is no
/// partial sanitization.
fn sanitize_value(value: &mut Value) -> Result<(), AppError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                match child {
                    Value::String(text) => {
                        if is_credential_field(key) {
                            continue;
                        }
                        if let Some(reason) = unsafe_reason(text) {
                            return Err(AppError::validation(key.clone(), reason));
                        }
                        *text = escape_html(text);
                    }
                    _ => sanitize_value(child)?,
                }
            }
            Ok(())
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                sanitize_value(item)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
