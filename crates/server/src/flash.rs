//! One-time-read status messages carried across a redirect in a short-lived
//! cookie. The value is base64-encoded so arbitrary text survives cookie
//! syntax; reading the message on the next render clears the cookie.

use axum::http::{header, HeaderMap, HeaderValue};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

const COOKIE_NAME: &str = "flash";
const EMPTY_COOKIE: &str = "flash=; Path=/; Max-Age=0; HttpOnly";

pub fn set_cookie(message: &str) -> HeaderValue {
    let encoded = URL_SAFE_NO_PAD.encode(message.as_bytes());
    HeaderValue::from_str(&format!(
        "{COOKIE_NAME}={encoded}; Path=/; Max-Age=60; HttpOnly"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static(EMPTY_COOKIE))
}

pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static(EMPTY_COOKIE)
}

/// Pending flash message from the request's cookies, if any.
pub fn peek_message(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    let encoded = cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == COOKIE_NAME && !value.is_empty()).then_some(value)
    })?;
    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_headers(cookie: &HeaderValue) -> HeaderMap {
        // Simulate the browser echoing the Set-Cookie pair back.
        let pair = cookie
            .to_str()
            .expect("cookie text")
            .split(';')
            .next()
            .expect("cookie pair")
            .to_string();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(&pair).expect("pair"));
        headers
    }

    #[test]
    fn message_round_trips_through_the_cookie() {
        let cookie = set_cookie("Palette \"Sunset\" saved successfully!");
        let headers = request_headers(&cookie);
        assert_eq!(
            peek_message(&headers).as_deref(),
            Some("Palette \"Sunset\" saved successfully!")
        );
    }

    #[test]
    fn cleared_cookie_yields_no_message() {
        let headers = request_headers(&clear_cookie());
        assert_eq!(peek_message(&headers), None);
    }

    #[test]
    fn absent_cookie_header_yields_no_message() {
        assert_eq!(peek_message(&HeaderMap::new()), None);
    }

    #[test]
    fn garbage_cookie_value_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("flash=%%not-base64%%"),
        );
        assert_eq!(peek_message(&headers), None);
    }
}
