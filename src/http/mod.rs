//! HTTP/1.0 protocol implementation.
//!
//! The protocol layer is organized into several submodules:
//!
//! - **`parser`**: incremental request parser; pure state machine, no I/O
//! - **`request`**: the parsed request and its ordered headers
//! - **`response`**: reply representation, status table, stock replies, and
//!   the chunked file-transfer cursor
//! - **`writer`**: vectored serialization of a reply onto a stream
//! - **`connection`**: the per-connection read/parse/handle/write pipeline
//! - **`handler`**: the request-handler seam content generation plugs into
//!
//! # Connection pipeline
//!
//! Each connection is one-shot and strictly sequential:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← feed each read to the parser
//!        └──────┬──────┘
//!               │ complete → handler, invalid → stock 400
//!               ▼
//!        ┌─────────────┐
//!        │   Writing   │ ← one vectored write of the reply
//!        └──────┬──────┘
//!               │ file body pending?
//!               ▼
//!        ┌──────────────────┐
//!        │ TransferringFile │ ← next bounded chunk, repeat
//!        └──────┬───────────┘
//!               │ done
//!               ▼
//!            Closed
//! ```
//!
//! An I/O error in any state skips straight to Closed; nothing further is
//! written on that socket.

pub mod connection;
pub mod handler;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
