use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
    #[error("URLs with embedded credentials are not opened")]
    EmbeddedCredentials,
}

/// Validate a server-supplied link before handing it to the system browser.
///
/// Only `http`/`https` URLs with a host are accepted, so a crafted status
/// cannot make the opener launch `file://` or custom-scheme handlers.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
    if url.host_str().unwrap_or_default().is_empty() {
        return Err(UrlValidationError::MissingHost);
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(UrlValidationError::EmbeddedCredentials);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_urls_accepted() {
        assert!(validate_url_for_open("https://example.social/@alice/109").is_ok());
        assert!(validate_url_for_open("http://example.social/tags/rust").is_ok());
    }

    #[test]
    fn test_other_schemes_rejected() {
        assert!(matches!(
            validate_url_for_open("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(validate_url_for_open("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_credentials_rejected() {
        assert!(matches!(
            validate_url_for_open("https://user:pw@example.social/"),
            Err(UrlValidationError::EmbeddedCredentials)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            validate_url_for_open("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }
}
