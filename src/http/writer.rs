use std::io::{self, IoSlice};

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Reply;

/// Writes a reply's header block and content as one logical vectored write.
///
/// The status line, header lines, and content are gathered into a single
/// sequence of slices so nothing is concatenated up front. Short writes
/// resume from the exact byte where the previous write stopped.
pub async fn write_reply<W>(stream: &mut W, reply: &Reply) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let segments = reply.wire_segments();
    let total: usize = segments.iter().map(|s| s.len()).sum();

    let mut written = 0;
    while written < total {
        let slices = remaining_slices(&segments, written);
        let n = stream.write_vectored(&slices).await?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "connection closed while writing reply",
            ));
        }
        written += n;
    }
    Ok(())
}

/// Re-slices the segment sequence to skip the bytes already written. Fully
/// written and empty segments drop out; a partially written one is resumed
/// mid-slice.
fn remaining_slices<'a>(segments: &[&'a [u8]], mut skip: usize) -> Vec<IoSlice<'a>> {
    let mut slices = Vec::with_capacity(segments.len());
    for segment in segments {
        if skip >= segment.len() {
            skip -= segment.len();
            continue;
        }
        slices.push(IoSlice::new(&segment[skip..]));
        skip = 0;
    }
    slices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::{Reply, StatusCode};

    #[test]
    fn remaining_slices_skips_written_segments() {
        let segments: Vec<&[u8]> = vec![b"abc", b"", b"def"];

        let slices = remaining_slices(&segments, 0);
        assert_eq!(slices.len(), 2);
        assert_eq!(&*slices[0], b"abc");

        let slices = remaining_slices(&segments, 4);
        assert_eq!(slices.len(), 1);
        assert_eq!(&*slices[0], b"ef");

        let slices = remaining_slices(&segments, 6);
        assert!(slices.is_empty());
    }

    #[tokio::test]
    async fn write_reply_produces_contiguous_bytes() {
        let reply = Reply::with_content(StatusCode::Ok, b"hello", "text/plain");
        let mut sink = Vec::new();
        write_reply(&mut sink, &reply).await.unwrap();

        let expected = reply
            .wire_segments()
            .concat();
        assert_eq!(sink, expected);
        assert!(sink.ends_with(b"\r\n\r\nhello"));
    }
}
