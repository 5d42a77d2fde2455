//! Herald - embedded HTTP/1.0 server
//!
//! Incremental request parsing, a per-connection read/parse/handle/write
//! pipeline, replies that stream large files in bounded memory-mapped
//! chunks, and a fixed-size pool of worker event loops. Content generation
//! plugs in behind [`http::handler::RequestHandler`].

pub mod config;
pub mod http;
pub mod server;
