//! OAuth 1.0a request signing
//!
//! The posting API authenticates user-context requests with an OAuth 1.0a
//! `Authorization` header. The signature base string covers the HTTP method,
//! the bare request URL, and the `oauth_*` parameters; JSON request bodies
//! are not part of the base string.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::{distributions::Alphanumeric, Rng};
use secrecy::ExposeSecret;
use sha1::Sha1;

use crate::config::XCredentials;
use crate::error::{PublishError, Result};

type HmacSha1 = Hmac<Sha1>;

// RFC 3986 unreserved characters stay literal; everything else is escaped.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Random 32-character alphanumeric request nonce
pub fn nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Build the `Authorization: OAuth ...` header value for a request
pub fn authorization_header(
    credentials: &XCredentials,
    method: &str,
    url: &str,
    timestamp: i64,
    nonce: &str,
) -> Result<String> {
    let timestamp = timestamp.to_string();

    // Alphabetical by key, as the signature base string requires
    let params: [(&str, &str); 6] = [
        ("oauth_consumer_key", credentials.api_key.expose_secret()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", &timestamp),
        ("oauth_token", credentials.access_token.expose_secret()),
        ("oauth_version", "1.0"),
    ];

    let param_string = params
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    );

    let signing_key = format!(
        "{}&{}",
        percent_encode(credentials.api_secret.expose_secret()),
        percent_encode(credentials.access_token_secret.expose_secret())
    );

    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .map_err(|e| PublishError::Signing(e.to_string()))?;
    mac.update(base_string.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    let header_params = params
        .iter()
        .map(|(key, value)| (*key, (*value).to_string()))
        .chain(std::iter::once(("oauth_signature", signature)))
        .map(|(key, value)| format!("{}=\"{}\"", percent_encode(key), percent_encode(&value)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("OAuth {}", header_params))
}
