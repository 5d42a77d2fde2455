/// A single request header.
///
/// Headers are kept in the order they appear on the wire and are not
/// deduplicated; a folded continuation line extends the value of the header
/// it follows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// Header name as received (e.g., "Host")
    pub name: String,
    /// Header value, with any folded continuation appended
    pub value: String,
}

/// A request received from a client.
///
/// Built field-by-field by the parser as bytes arrive. Once the parser
/// reports a complete request the contents are no longer modified. Owned
/// exclusively by the connection that is reading it.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// The HTTP method (e.g., "GET")
    pub method: String,
    /// The request URI as received, including any query string
    pub uri: String,
    /// Major version number from the request line
    pub version_major: u16,
    /// Minor version number from the request line
    pub version_minor: u16,
    /// Request headers in wire order
    pub headers: Vec<Header>,
}

impl Request {
    /// Retrieves the value of the first header with the given name.
    ///
    /// Header names are compared case-insensitively, as HTTP requires.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}
