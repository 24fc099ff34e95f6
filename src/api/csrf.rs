//! CSRF token extraction from browser-style cookie strings.
//!
//! Deployments that front the backend with session auth hand the widget
//! a raw `Cookie` header value. The anti-forgery token travels in the
//! `csrftoken` cookie, percent-encoded.

/// Name of the cookie carrying the anti-forgery token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Mines the CSRF token out of a cookie string like
/// `"sessionid=xyz; csrftoken=abc%3D%3D"`.
///
/// Returns the decoded value of the first `csrftoken` cookie, or None
/// when the cookie is absent or empty.
pub fn token_from_cookies(cookies: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| {
            cookie
                .strip_prefix(CSRF_COOKIE)?
                .strip_prefix('=')
                .map(percent_decode)
        })
        .filter(|token| !token.is_empty())
}

/// Lenient percent-decoding. `%XX` with two hex digits becomes a byte,
/// anything else passes through literally, and `+` stays `+` (cookie
/// values are not form data).
fn percent_decode(encoded: &str) -> String {
    let bytes = encoded.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2]))
        {
            decoded.push(hi << 4 | lo);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_token() {
        assert_eq!(
            token_from_cookies("csrftoken=abc123").as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn test_token_among_other_cookies() {
        let cookies = "sessionid=xyz; theme=dark; csrftoken=tok; lang=en";
        assert_eq!(token_from_cookies(cookies).as_deref(), Some("tok"));
    }

    #[test]
    fn test_whitespace_around_pairs_is_tolerated() {
        assert_eq!(
            token_from_cookies("  csrftoken=tok ;other=1").as_deref(),
            Some("tok")
        );
    }

    #[test]
    fn test_absent_cookie_yields_none() {
        assert_eq!(token_from_cookies("sessionid=xyz; theme=dark"), None);
        assert_eq!(token_from_cookies(""), None);
    }

    #[test]
    fn test_empty_value_yields_none() {
        assert_eq!(token_from_cookies("csrftoken="), None);
    }

    #[test]
    fn test_cookie_name_must_match_exactly() {
        assert_eq!(token_from_cookies("xcsrftoken=nope"), None);
        assert_eq!(token_from_cookies("csrftoken2=nope"), None);
    }

    #[test]
    fn test_first_match_wins() {
        let cookies = "csrftoken=first; csrftoken=second";
        assert_eq!(token_from_cookies(cookies).as_deref(), Some("first"));
    }

    #[test]
    fn test_percent_escapes_decode() {
        assert_eq!(
            token_from_cookies("csrftoken=a%20b%3D%3D").as_deref(),
            Some("a b==")
        );
    }

    #[test]
    fn test_multibyte_escapes_decode() {
        assert_eq!(
            token_from_cookies("csrftoken=%E2%9C%93ok").as_deref(),
            Some("✓ok")
        );
    }

    #[test]
    fn test_invalid_escapes_pass_through() {
        assert_eq!(token_from_cookies("csrftoken=%zz").as_deref(), Some("%zz"));
        assert_eq!(token_from_cookies("csrftoken=100%").as_deref(), Some("100%"));
        assert_eq!(token_from_cookies("csrftoken=%4").as_deref(), Some("%4"));
    }

    #[test]
    fn test_plus_is_not_a_space() {
        assert_eq!(token_from_cookies("csrftoken=a+b").as_deref(), Some("a+b"));
    }

    #[test]
    fn test_value_may_contain_equals() {
        // Only the first '=' splits name from value
        assert_eq!(
            token_from_cookies("csrftoken=a=b").as_deref(),
            Some("a=b")
        );
    }
}
