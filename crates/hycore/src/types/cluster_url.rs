//! Cluster URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated cluster API base URL.
///
/// This type ensures the URL is absolute, uses HTTPS (or HTTP for
/// localhost), and is properly normalized for REST endpoint construction.
///
/// # Example
///
/// ```
/// use hycore::ClusterUrl;
///
/// let cluster = ClusterUrl::new("https://cluster.lab.local").unwrap();
/// assert_eq!(cluster.endpoint("VirDomain"),
///            "https://cluster.lab.local/rest/v1/VirDomain");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClusterUrl(Url);

impl ClusterUrl {
    /// Create a new cluster URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ClusterUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        // Keep the stored form free of a trailing root slash
        let normalized = if url.path() == "/" {
            let mut u = url.clone();
            u.set_path("");
            u
        } else {
            url
        };

        Ok(Self(normalized))
    }

    /// Returns the REST endpoint URL for a given collection path.
    pub fn endpoint(&self, path: &str) -> String {
        // A root path renders as "https://host/"; trim so the prefix
        // never produces a double slash.
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/rest/v1/{}", base, path)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        // Must be absolute
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::ClusterUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        // Must be HTTPS (or HTTP for localhost)
        let scheme = url.scheme();
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "::1");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidInputError::ClusterUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        // Must have a host
        if url.host_str().is_none() {
            return Err(InvalidInputError::ClusterUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for ClusterUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClusterUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ClusterUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ClusterUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ClusterUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ClusterUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let cluster = ClusterUrl::new("https://cluster.lab.local").unwrap();
        assert_eq!(cluster.host(), Some("cluster.lab.local"));
    }

    #[test]
    fn valid_localhost_http() {
        let cluster = ClusterUrl::new("http://localhost:8080").unwrap();
        assert_eq!(cluster.host(), Some("localhost"));
    }

    #[test]
    fn endpoint_construction() {
        let cluster = ClusterUrl::new("https://cluster.lab.local").unwrap();
        assert_eq!(
            cluster.endpoint("VirDomain"),
            "https://cluster.lab.local/rest/v1/VirDomain"
        );
        assert_eq!(
            cluster.endpoint("TaskTag/1234"),
            "https://cluster.lab.local/rest/v1/TaskTag/1234"
        );
    }

    #[test]
    fn normalizes_trailing_slash_in_endpoint() {
        let cluster = ClusterUrl::new("https://cluster.lab.local/").unwrap();
        assert_eq!(
            cluster.endpoint("Node"),
            "https://cluster.lab.local/rest/v1/Node"
        );
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(ClusterUrl::new("http://cluster.lab.local").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(ClusterUrl::new("/rest/v1/VirDomain").is_err());
    }
}
