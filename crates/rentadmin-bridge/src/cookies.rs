use axum::http::{HeaderMap, header::COOKIE};
use chrono::Duration;

use rentadmin_core::credentials::{CredentialError, CredentialStore, parse_cookie_header};
use rentadmin_core::secrets::SessionToken;

/// The cookies a client sent with one request.
///
/// Writes are answered with `Set-Cookie` headers instead, so `set` and `clear`
/// always fail with [`CredentialError::ReadOnly`].
#[derive(Clone)]
pub struct RequestCookies {
    cookie_name: String,
    header: Result<Option<String>, String>,
}

impl RequestCookies {
    /// Capture the `Cookie` headers of a request.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Self {
        let mut values = Vec::new();
        let mut header = Ok(None);

        for value in headers.get_all(COOKIE) {
            match value.to_str() {
                Ok(v) => values.push(v.to_string()),
                Err(e) => {
                    header = Err(e.to_string());
                    break;
                }
            }
        }

        if header.is_ok() && !values.is_empty() {
            header = Ok(Some(values.join("; ")));
        }

        Self {
            cookie_name: cookie_name.to_string(),
            header,
        }
    }
}

impl std::fmt::Debug for RequestCookies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCookies")
            .field("cookie_name", &self.cookie_name)
            .field("present", &matches!(self.header, Ok(Some(_))))
            .finish()
    }
}

impl CredentialStore for RequestCookies {
    fn get(&self) -> Result<Option<SessionToken>, CredentialError> {
        match &self.header {
            Ok(Some(header)) => Ok(parse_cookie_header(header, &self.cookie_name).map(SessionToken::new)),
            Ok(None) => Ok(None),
            Err(e) => Err(CredentialError::Malformed(e.clone())),
        }
    }

    fn set_with_ttl(&self, _token: &SessionToken, _ttl: Duration) -> Result<(), CredentialError> {
        Err(CredentialError::ReadOnly)
    }

    fn clear(&self) -> Result<(), CredentialError> {
        Err(CredentialError::ReadOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_reads_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; accessToken=tok123"));

        let cookies = RequestCookies::from_headers(&headers, "accessToken");
        assert_eq!(cookies.get().unwrap().unwrap().expose(), "tok123");
    }

    #[test]
    fn test_multiple_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("accessToken=tok123"));

        let cookies = RequestCookies::from_headers(&headers, "accessToken");
        assert_eq!(cookies.get().unwrap().unwrap().expose(), "tok123");
    }

    #[test]
    fn test_missing_cookie() {
        let cookies = RequestCookies::from_headers(&HeaderMap::new(), "accessToken");
        assert!(cookies.get().unwrap().is_none());
    }

    #[test]
    fn test_opaque_header_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_bytes(b"accessToken=\xff\xfe").unwrap());

        let cookies = RequestCookies::from_headers(&headers, "accessToken");
        assert!(matches!(cookies.get(), Err(CredentialError::Malformed(_))));
    }

    #[test]
    fn test_writes_rejected() {
        let cookies = RequestCookies::from_headers(&HeaderMap::new(), "accessToken");
        assert!(matches!(
            cookies.set(&SessionToken::new("x")),
            Err(CredentialError::ReadOnly)
        ));
        assert!(matches!(cookies.clear(), Err(CredentialError::ReadOnly)));
    }
}
