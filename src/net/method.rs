//! HTTP method map

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported HTTP methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    /// Uppercase wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }

    /// Whether a payload travels as query parameters instead of a body.
    pub fn sends_query(&self) -> bool {
        matches!(self, Self::Get | Self::Head)
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_get() {
        assert_eq!(HttpMethod::default(), HttpMethod::Get);
    }

    #[test]
    fn test_query_methods() {
        assert!(HttpMethod::Get.sends_query());
        assert!(HttpMethod::Head.sends_query());
        assert!(!HttpMethod::Post.sends_query());
        assert!(!HttpMethod::Put.sends_query());
        assert!(!HttpMethod::Patch.sends_query());
        assert!(!HttpMethod::Delete.sends_query());
    }

    #[test]
    fn test_serde_uppercase() {
        let json = serde_json::to_string(&HttpMethod::Patch).unwrap();
        assert_eq!(json, "\"PATCH\"");
        let back: HttpMethod = serde_json::from_str("\"DELETE\"").unwrap();
        assert_eq!(back, HttpMethod::Delete);
    }
}
