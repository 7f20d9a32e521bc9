use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL is empty")]
    Empty,

    #[error("Invalid URL: {0}")]
    Parse(#[from] url::ParseError),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("URL has no host")]
    MissingHost,
}

/// Check a link before passing it to the system browser.
///
/// Only `http` and `https` URLs with a host are accepted, so a malformed or
/// hostile payload cannot make the opener launch `file:` or custom-scheme
/// handlers.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let trimmed = url_str.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url = Url::parse(trimmed)?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_channel_url() {
        let url = validate_url_for_open("https://www.youtube.com/channel/UC123").unwrap();
        assert_eq!(url.path(), "/channel/UC123");
    }

    #[test]
    fn test_accepts_local_backend() {
        assert!(validate_url_for_open("http://localhost:8080/api/auth/start").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_url_for_open("  "), Err(UrlValidationError::Empty));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(
            validate_url_for_open("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme("file".to_string()))
        );
        assert!(matches!(
            validate_url_for_open("javascript:alert(1)"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            validate_url_for_open("not a url"),
            Err(UrlValidationError::Parse(_))
        ));
    }
}
