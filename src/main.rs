use std::sync::Arc;

use herald::config::Config;
use herald::http::handler::RequestHandler;
use herald::http::request::Request;
use herald::http::response::{Reply, StatusCode};
use herald::server::Server;

const INDEX_PAGE: &str =
    "<html><head><title>herald</title></head><body><h1>herald</h1><p>It works.</p></body></html>";

/// Minimal built-in handler so the binary serves something out of the box.
struct IndexHandler;

impl RequestHandler for IndexHandler {
    fn handle(&self, request: &Request) -> Reply {
        match request.uri.as_str() {
            "/" | "/index.html" => {
                Reply::with_content(StatusCode::Ok, INDEX_PAGE.as_bytes(), "text/html")
            }
            _ => Reply::stock(StatusCode::NotFound),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let mut server = Server::new(cfg, Arc::new(IndexHandler))?;
    server.run()
}
