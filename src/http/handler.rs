use crate::http::request::Request;
use crate::http::response::Reply;

/// Maps a parsed request to a reply.
///
/// The handler is the seam between the protocol core and content generation.
/// It is called synchronously once per connection, after a complete request
/// has been parsed, and must not fail: any internal problem (unresolvable
/// path, unreadable file) is mapped to a stock reply such as
/// `Reply::stock(StatusCode::NotFound)` by the handler itself, never
/// propagated to the connection. A handler may return a file-backed reply;
/// the connection then streams the file in bounded chunks.
pub trait RequestHandler: Send + Sync {
    fn handle(&self, request: &Request) -> Reply;
}

impl<F> RequestHandler for F
where
    F: Fn(&Request) -> Reply + Send + Sync,
{
    fn handle(&self, request: &Request) -> Reply {
        self(request)
    }
}
