//! Transport-independent HTTP reply.

use crate::utils::mime::types::{HTML, PLAIN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// `Location` header for redirects.
    pub location: Option<String>,
}

impl Reply {
    pub fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
            location: None,
        }
    }

    pub fn ok(content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, content_type, body)
    }

    pub fn html(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, HTML, body)
    }

    pub fn no_content() -> Self {
        Self::new(204, PLAIN, Vec::new())
    }

    pub fn internal_error() -> Self {
        Self::new(500, PLAIN, "Internal Server Error")
    }

    pub fn see_other(location: &str) -> Self {
        Self {
            location: Some(location.to_owned()),
            ..Self::new(303, PLAIN, Vec::new())
        }
    }

    pub fn is_html(&self) -> bool {
        self.content_type == HTML
    }

    pub fn body_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
