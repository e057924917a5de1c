//! Bundle spec loading from files, strings, and HTTP URLs.

use std::path::Path;

use crate::error::LoadError;
use crate::types::BundleSpec;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a bundle spec from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't a valid spec.
pub fn load_spec(path: &Path) -> Result<BundleSpec, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_spec_str(&content)
}

/// Load a bundle spec from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't a valid spec.
pub fn load_spec_str(content: &str) -> Result<BundleSpec, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a bundle spec from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails or the body
/// isn't a valid spec.
#[cfg(feature = "remote")]
pub fn load_spec_url(url: &str) -> Result<BundleSpec, LoadError> {
    let network_error = |source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(network_error)?
        .json()
        .map_err(network_error)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load from a URL or a file path, depending on the source's shape.
///
/// # Errors
///
/// Returns any error of [`load_spec`] or [`load_spec_url`].
pub fn load_spec_auto(source: &str) -> Result<BundleSpec, LoadError> {
    #[cfg(feature = "remote")]
    {
        if is_url(source) {
            return load_spec_url(source);
        }
    }

    load_spec(Path::new(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apb.json");
        fs::write(
            &path,
            r#"{"name": "hello-apb", "plans": [{"name": "default", "parameters": [{"name": "a", "type": "string"}]}]}"#,
        )
        .unwrap();

        let spec = load_spec(&path).unwrap();
        assert_eq!(spec.name, "hello-apb");
        assert_eq!(spec.plans[0].parameters[0].name, "a");
    }

    #[test]
    fn missing_file() {
        let result = load_spec(Path::new("/nonexistent/apb.json"));
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn invalid_json() {
        let result = load_spec_str("{ not json");
        assert!(matches!(result, Err(LoadError::InvalidJson { .. })));
    }

    #[test]
    fn wrong_shape_is_invalid() {
        let result = load_spec_str(r#"{"plans": "none"}"#);
        assert!(matches!(result, Err(LoadError::InvalidJson { .. })));
    }

    #[test]
    fn url_detection() {
        assert!(is_url("http://example.com/apb.json"));
        assert!(is_url("https://example.com/apb.json"));
        assert!(!is_url("apb.json"));
        assert!(!is_url("/abs/apb.json"));
    }

    #[cfg(feature = "remote")]
    #[test]
    fn load_from_url() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/apb.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "remote-apb", "plans": []}"#)
            .create();

        let spec = load_spec_auto(&format!("{}/apb.json", server.url())).unwrap();
        assert_eq!(spec.name, "remote-apb");
        mock.assert();
    }

    #[cfg(feature = "remote")]
    #[test]
    fn url_http_error() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/missing.json").with_status(404).create();

        let result = load_spec_url(&format!("{}/missing.json", server.url()));
        assert!(matches!(result, Err(LoadError::NetworkError { .. })));
    }
}
