use std::fs::File;
use std::io;

use bytes::BytesMut;
use memmap2::MmapOptions;

use crate::http::request::Header;

/// Largest number of file bytes held in memory at once during a transfer.
///
/// Replies backed by a file are sent in chunks of at most this many bytes;
/// each chunk replaces the previous one in the reply's content buffer.
pub const CACHE_LIMIT: u64 = 1024 * 1024;

/// Status codes a reply can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 202 Accepted
    Accepted,
    /// 204 No Content
    NoContent,
    /// 300 Multiple Choices
    MultipleChoices,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 302 Moved Temporarily
    MovedTemporarily,
    /// 304 Not Modified
    NotModified,
    /// 400 Bad Request
    BadRequest,
    /// 401 Unauthorized
    Unauthorized,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
    /// 502 Bad Gateway
    BadGateway,
    /// 503 Service Unavailable
    ServiceUnavailable,
}

impl StatusCode {
    /// Returns the numeric status code.
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::Accepted => 202,
            StatusCode::NoContent => 204,
            StatusCode::MultipleChoices => 300,
            StatusCode::MovedPermanently => 301,
            StatusCode::MovedTemporarily => 302,
            StatusCode::NotModified => 304,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
            StatusCode::BadGateway => 502,
            StatusCode::ServiceUnavailable => 503,
        }
    }

    /// Returns the standard reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::Accepted => "Accepted",
            StatusCode::NoContent => "No Content",
            StatusCode::MultipleChoices => "Multiple Choices",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::MovedTemporarily => "Moved Temporarily",
            StatusCode::NotModified => "Not Modified",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::BadGateway => "Bad Gateway",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// Returns the full status line for this code, CRLF included.
    pub fn status_line(&self) -> &'static str {
        match self {
            StatusCode::Ok => "HTTP/1.0 200 OK\r\n",
            StatusCode::Created => "HTTP/1.0 201 Created\r\n",
            StatusCode::Accepted => "HTTP/1.0 202 Accepted\r\n",
            StatusCode::NoContent => "HTTP/1.0 204 No Content\r\n",
            StatusCode::MultipleChoices => "HTTP/1.0 300 Multiple Choices\r\n",
            StatusCode::MovedPermanently => "HTTP/1.0 301 Moved Permanently\r\n",
            StatusCode::MovedTemporarily => "HTTP/1.0 302 Moved Temporarily\r\n",
            StatusCode::NotModified => "HTTP/1.0 304 Not Modified\r\n",
            StatusCode::BadRequest => "HTTP/1.0 400 Bad Request\r\n",
            StatusCode::Unauthorized => "HTTP/1.0 401 Unauthorized\r\n",
            StatusCode::Forbidden => "HTTP/1.0 403 Forbidden\r\n",
            StatusCode::NotFound => "HTTP/1.0 404 Not Found\r\n",
            StatusCode::InternalServerError => "HTTP/1.0 500 Internal Server Error\r\n",
            StatusCode::NotImplemented => "HTTP/1.0 501 Not Implemented\r\n",
            StatusCode::BadGateway => "HTTP/1.0 502 Bad Gateway\r\n",
            StatusCode::ServiceUnavailable => "HTTP/1.0 503 Service Unavailable\r\n",
        }
    }
}

/// Cursor over a file being streamed in bounded chunks.
///
/// Invariant: `processed <= total_size`. While a transfer is in progress the
/// owning reply's content buffer holds exactly the next unsent chunk, never
/// the whole file.
#[derive(Debug)]
pub struct FileBody {
    file: File,
    total_size: u64,
    processed: u64,
}

impl FileBody {
    pub fn new(file: File, total_size: u64) -> Self {
        Self { file, total_size, processed: 0 }
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }
}

/// A reply to be sent to a client.
///
/// Carries exactly two header slots: Content-Length first, Content-Type
/// second. Constructed by a request handler or by [`Reply::stock`], mutated
/// only by the owning connection while a file transfer is in progress.
#[derive(Debug)]
pub struct Reply {
    /// The status of the reply
    pub status: StatusCode,
    /// The headers to be included in the reply
    pub headers: [Header; 2],
    /// The content to be sent in the reply, or the current file chunk
    pub content: BytesMut,
    /// Present when the body is streamed from a file
    pub file: Option<FileBody>,
}

impl Default for Reply {
    /// A reply that was never populated encodes as a 500.
    fn default() -> Self {
        Reply::stock(StatusCode::InternalServerError)
    }
}

impl Reply {
    /// Creates a reply with an in-memory body.
    pub fn with_content(status: StatusCode, body: &[u8], content_type: &str) -> Self {
        Self {
            status,
            headers: content_headers(body.len() as u64, content_type),
            content: BytesMut::from(body),
            file: None,
        }
    }

    /// Creates a reply whose body is streamed from a file.
    ///
    /// The caller supplies the open read-only file and its total size, which
    /// becomes the Content-Length. The content buffer starts empty; the
    /// connection fills it one chunk at a time via [`Reply::advance_chunk`]
    /// after the header block has been written.
    pub fn with_file(status: StatusCode, file: File, total_size: u64, content_type: &str) -> Self {
        Self {
            status,
            headers: content_headers(total_size, content_type),
            content: BytesMut::new(),
            file: Some(FileBody::new(file, total_size)),
        }
    }

    /// Gets a stock reply: an empty body for Ok, an embedded HTML error page
    /// for everything else.
    pub fn stock(status: StatusCode) -> Self {
        Self::with_content(status, stock_body(status).as_bytes(), "text/html")
    }

    /// Converts the reply into an ordered sequence of byte slices: status
    /// line, header lines, blank line, content. The slices borrow from the
    /// reply, so it must not change until the write completes.
    pub fn wire_segments(&self) -> Vec<&[u8]> {
        let mut segments = Vec::with_capacity(3 + self.headers.len() * 4);
        segments.push(self.status.status_line().as_bytes());
        for header in &self.headers {
            segments.push(header.name.as_bytes());
            segments.push(b": ");
            segments.push(header.value.as_bytes());
            segments.push(b"\r\n");
        }
        segments.push(b"\r\n");
        segments.push(&self.content);
        segments
    }

    /// Whether a file transfer still has bytes to send.
    pub fn has_pending_file(&self) -> bool {
        self.file
            .as_ref()
            .is_some_and(|f| f.processed < f.total_size)
    }

    /// Loads the next file chunk into the content buffer, replacing the
    /// previous one.
    ///
    /// Maps `min(CACHE_LIMIT, total_size - processed)` bytes at the current
    /// offset and advances the cursor by the amount copied. Returns false,
    /// without touching the buffer, once the whole file has been processed.
    pub fn advance_chunk(&mut self) -> io::Result<bool> {
        let Some(body) = self.file.as_mut() else {
            return Ok(false);
        };
        if body.processed >= body.total_size {
            return Ok(false);
        }

        let len = (body.total_size - body.processed).min(CACHE_LIMIT);
        // SAFETY: the region is mapped read-only from a file handle this
        // reply owns for the lifetime of the mapping.
        let region = unsafe {
            MmapOptions::new()
                .offset(body.processed)
                .len(len as usize)
                .map(&body.file)?
        };
        self.content.clear();
        self.content.extend_from_slice(&region);
        body.processed += len;
        Ok(true)
    }
}

fn content_headers(length: u64, content_type: &str) -> [Header; 2] {
    [
        Header { name: "Content-Length".to_string(), value: length.to_string() },
        Header { name: "Content-Type".to_string(), value: content_type.to_string() },
    ]
}

fn stock_body(status: StatusCode) -> &'static str {
    match status {
        StatusCode::Ok => "",
        StatusCode::Created => {
            "<html><head><title>Created</title></head><body><h1>201 Created</h1></body></html>"
        }
        StatusCode::Accepted => {
            "<html><head><title>Accepted</title></head><body><h1>202 Accepted</h1></body></html>"
        }
        StatusCode::NoContent => {
            "<html><head><title>No Content</title></head><body><h1>204 No Content</h1></body></html>"
        }
        StatusCode::MultipleChoices => {
            "<html><head><title>Multiple Choices</title></head><body><h1>300 Multiple Choices</h1></body></html>"
        }
        StatusCode::MovedPermanently => {
            "<html><head><title>Moved Permanently</title></head><body><h1>301 Moved Permanently</h1></body></html>"
        }
        StatusCode::MovedTemporarily => {
            "<html><head><title>Moved Temporarily</title></head><body><h1>302 Moved Temporarily</h1></body></html>"
        }
        StatusCode::NotModified => {
            "<html><head><title>Not Modified</title></head><body><h1>304 Not Modified</h1></body></html>"
        }
        StatusCode::BadRequest => {
            "<html><head><title>Bad Request</title></head><body><h1>400 Bad Request</h1></body></html>"
        }
        StatusCode::Unauthorized => {
            "<html><head><title>Unauthorized</title></head><body><h1>401 Unauthorized</h1></body></html>"
        }
        StatusCode::Forbidden => {
            "<html><head><title>Forbidden</title></head><body><h1>403 Forbidden</h1></body></html>"
        }
        StatusCode::NotFound => {
            "<html><head><title>Not Found</title></head><body><h1>404 Not Found</h1></body></html>"
        }
        StatusCode::InternalServerError => {
            "<html><head><title>Internal Server Error</title></head><body><h1>500 Internal Server Error</h1></body></html>"
        }
        StatusCode::NotImplemented => {
            "<html><head><title>Not Implemented</title></head><body><h1>501 Not Implemented</h1></body></html>"
        }
        StatusCode::BadGateway => {
            "<html><head><title>Bad Gateway</title></head><body><h1>502 Bad Gateway</h1></body></html>"
        }
        StatusCode::ServiceUnavailable => {
            "<html><head><title>Service Unavailable</title></head><body><h1>503 Service Unavailable</h1></body></html>"
        }
    }
}
