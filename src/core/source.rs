use crate::utils::error::{MapError, Result};
use crate::utils::validation;
use reqwest::Client;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const USGS_ALL_WEEK: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// Where a GeoJSON document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Remote(Url),
    Local(PathBuf),
}

impl FeedSource {
    pub fn parse(source: &str) -> Result<Self> {
        Self::parse_field("source", source)
    }

    /// Anything with a scheme is a URL and must be http(s); everything else
    /// is a local path.
    pub fn parse_field(field_name: &str, source: &str) -> Result<Self> {
        if source.contains("://") {
            Ok(FeedSource::Remote(validation::validate_url(field_name, source)?))
        } else {
            validation::validate_path(field_name, source)?;
            Ok(FeedSource::Local(PathBuf::from(source)))
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Remote(url) => write!(f, "{}", url),
            FeedSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub timeout: Option<Duration>,
    pub headers: HashMap<String, String>,
}

/// Reads the raw bytes of a feed.
pub async fn fetch(client: &Client, source: &FeedSource, options: &FetchOptions) -> Result<Vec<u8>> {
    match source {
        FeedSource::Remote(url) => {
            let mut request = client.get(url.clone());
            for (key, value) in &options.headers {
                request = request.header(key, value);
            }
            if let Some(timeout) = options.timeout {
                request = request.timeout(timeout);
            }

            tracing::debug!("Making API request to: {}", url);
            let response = request.send().await?;
            tracing::debug!("API response status: {}", response.status());

            if !response.status().is_success() {
                return Err(MapError::HttpStatus {
                    status: response.status().as_u16(),
                    url: url.to_string(),
                });
            }

            Ok(response.bytes().await?.to_vec())
        }
        FeedSource::Local(path) => {
            tracing::debug!("Reading local feed: {}", path.display());
            tokio::fs::read(path)
                .await
                .map_err(|error| MapError::FeedRead {
                    source_path: path.display().to_string(),
                    error,
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_source_kinds() {
        assert!(matches!(
            FeedSource::parse(USGS_ALL_WEEK).unwrap(),
            FeedSource::Remote(_)
        ));
        assert_eq!(
            FeedSource::parse("./data/PB2002_plates.json").unwrap(),
            FeedSource::Local(PathBuf::from("./data/PB2002_plates.json"))
        );
        assert!(FeedSource::parse("https://").is_err());
        assert!(FeedSource::parse("ftp://example.com/feed").is_err());
        assert!(FeedSource::parse("").is_err());
    }

    #[test]
    fn test_uppercase_scheme_is_remote() {
        let source = "HTTPS://earthquake.usgs.gov/feed.geojson";
        assert!(validation::validate_source("quake_endpoint", source).is_ok());
        match FeedSource::parse(source).unwrap() {
            FeedSource::Remote(url) => {
                assert_eq!(url.scheme(), "https");
                assert_eq!(url.host_str(), Some("earthquake.usgs.gov"));
            }
            other => panic!("expected a remote source, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_remote_sends_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/feed.geojson")
                .header("User-Agent", "quakemap-test");
            then.status(200).body(r#"{"features": []}"#);
        });

        let source = FeedSource::parse(&server.url("/feed.geojson")).unwrap();
        let options = FetchOptions {
            timeout: Some(Duration::from_secs(5)),
            headers: HashMap::from([("User-Agent".to_string(), "quakemap-test".to_string())]),
        };

        let bytes = fetch(&Client::new(), &source, &options).await.unwrap();
        mock.assert();
        assert_eq!(bytes, br#"{"features": []}"#);
    }

    #[tokio::test]
    async fn test_fetch_remote_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/down");
            then.status(503);
        });

        let source = FeedSource::parse(&server.url("/down")).unwrap();
        let err = fetch(&Client::new(), &source, &FetchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MapError::HttpStatus { status: 503, .. }));
    }

    #[test]
    fn test_fetch_local_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"features\": []}").unwrap();

        let source = FeedSource::Local(file.path().to_path_buf());
        let bytes = tokio_test::block_on(fetch(&Client::new(), &source, &FetchOptions::default()))
            .unwrap();
        assert_eq!(bytes, b"{\"features\": []}");
    }

    #[tokio::test]
    async fn test_fetch_missing_local_file() {
        let source = FeedSource::Local(PathBuf::from("/definitely/not/here.json"));
        let err = fetch(&Client::new(), &source, &FetchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MapError::FeedRead { ref source_path, .. } if source_path == "/definitely/not/here.json"
        ));
        assert_eq!(err.category(), crate::utils::error::ErrorCategory::Input);
    }
}
