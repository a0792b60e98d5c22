//! Incremental Server-Sent-Events frame decoding.
//!
//! The crawl service frames its job stream as SSE: blocks of
//! `field: value` lines terminated by a blank line. Response chunks
//! arrive at arbitrary byte boundaries, so the decoder buffers raw bytes
//! and only surfaces complete frames.

/// One complete SSE frame: an event type and its payload text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event type from the frame's `event:` line, or `message` if absent.
    pub event: String,
    /// Trimmed `data:` values, newline-joined.
    pub data: String,
}

/// Event type assigned to frames without an `event:` line.
const DEFAULT_EVENT: &str = "message";

/// Frame delimiter: a blank line, i.e. two consecutive newlines.
const DELIMITER: &[u8] = b"\n\n";

/// Incremental decoder from raw byte chunks to complete frames.
///
/// Buffering happens at the byte level: a multi-byte UTF-8 sequence split
/// across chunks stays in the buffer until its frame completes (the
/// delimiter is ASCII and cannot match inside a multi-byte sequence), so
/// non-ASCII payloads survive arbitrary chunking.
#[derive(Debug, Default)]
pub struct SseFrameDecoder {
    buf: Vec<u8>,
}

impl SseFrameDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffered bytes not yet part of a complete frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Append a chunk and drain every frame it completes, in order.
    ///
    /// Incomplete trailing data stays buffered for the next push. The
    /// delimiter scan resumes one byte before the previous buffer tail
    /// (a delimiter can straddle the chunk boundary), keeping long runs
    /// of small chunks linear.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        let mut cursor = self.buf.len().saturating_sub(1);
        self.buf.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut frame_start = 0;
        while let Some(found) = find_delimiter(&self.buf[cursor..]) {
            let delimiter = cursor + found;
            frames.push(parse_frame(&self.buf[frame_start..delimiter]));
            frame_start = delimiter + DELIMITER.len();
            cursor = frame_start;
        }
        if frame_start > 0 {
            self.buf.drain(..frame_start);
        }
        frames
    }
}

fn find_delimiter(haystack: &[u8]) -> Option<usize> {
    haystack.windows(DELIMITER.len()).position(|w| w == DELIMITER)
}

/// Parse one delimiter-free frame body.
///
/// A line beginning with `event:` sets the frame type (last one wins); a
/// line beginning with `data:` contributes its trimmed remainder to the
/// payload. Invalid UTF-8 is replaced, matching lossy text decoding on
/// the wire.
fn parse_frame(raw: &[u8]) -> SseFrame {
    let text = String::from_utf8_lossy(raw);
    let mut event = None;
    let mut data: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if let Some(value) = line.strip_prefix("event:") {
            event = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("data:") {
            data.push(value.trim());
        }
    }

    SseFrame {
        event: event.unwrap_or_else(|| DEFAULT_EVENT.to_string()),
        data: data.join("\n").trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(event: &str, data: &str) -> SseFrame {
        SseFrame {
            event: event.to_string(),
            data: data.to_string(),
        }
    }

    #[test]
    fn test_single_frame() {
        let mut decoder = SseFrameDecoder::new();
        let frames = decoder.push(b"event: log\ndata: started\n\n");
        assert_eq!(frames, vec![frame("log", "started")]);
        assert_eq!(decoder.buffered(), 0);
    }

    #[test]
    fn test_multiple_frames_in_one_chunk() {
        let mut decoder = SseFrameDecoder::new();
        let frames = decoder.push(b"event: log\ndata: one\n\nevent: log\ndata: two\n\n");
        assert_eq!(frames, vec![frame("log", "one"), frame("log", "two")]);
    }

    #[test]
    fn test_partial_frame_stays_buffered() {
        let mut decoder = SseFrameDecoder::new();
        assert!(decoder.push(b"event: log\ndata: par").is_empty());
        assert!(decoder.buffered() > 0);
        let frames = decoder.push(b"tial\n\n");
        assert_eq!(frames, vec![frame("log", "partial")]);
        assert_eq!(decoder.buffered(), 0);
    }

    #[test]
    fn test_delimiter_straddles_chunks() {
        let mut decoder = SseFrameDecoder::new();
        assert!(decoder.push(b"event: log\ndata: x\n").is_empty());
        let frames = decoder.push(b"\n");
        assert_eq!(frames, vec![frame("log", "x")]);
    }

    #[test]
    fn test_default_event_type() {
        let mut decoder = SseFrameDecoder::new();
        let frames = decoder.push(b"data: hello\n\n");
        assert_eq!(frames, vec![frame("message", "hello")]);
    }

    #[test]
    fn test_multiple_data_lines_joined() {
        let mut decoder = SseFrameDecoder::new();
        let frames = decoder.push(b"event: log\ndata: line 1\ndata: line 2\n\n");
        assert_eq!(frames, vec![frame("log", "line 1\nline 2")]);
    }

    #[test]
    fn test_values_trimmed() {
        let mut decoder = SseFrameDecoder::new();
        let frames = decoder.push(b"event:  log \ndata:   padded value  \n\n");
        assert_eq!(frames, vec![frame("log", "padded value")]);
    }

    #[test]
    fn test_prefix_without_space() {
        let mut decoder = SseFrameDecoder::new();
        let frames = decoder.push(b"event:log\ndata:tight\n\n");
        assert_eq!(frames, vec![frame("log", "tight")]);
    }

    #[test]
    fn test_empty_data_frame() {
        let mut decoder = SseFrameDecoder::new();
        let frames = decoder.push(b"event: heartbeat\n\n");
        assert_eq!(frames, vec![frame("heartbeat", "")]);

        let frames = decoder.push(b"data:\ndata:\n\n");
        assert_eq!(frames, vec![frame("message", "")]);
    }

    #[test]
    fn test_unknown_lines_ignored() {
        let mut decoder = SseFrameDecoder::new();
        let frames = decoder.push(b": comment\nid: 7\nevent: log\ndata: kept\n\n");
        assert_eq!(frames, vec![frame("log", "kept")]);
    }

    #[test]
    fn test_multibyte_split_across_chunks() {
        let bytes = "event: log\ndata: caf\u{e9} \u{2713}\n\n".as_bytes();
        // Split inside the two-byte 'é' sequence.
        let split = bytes.iter().position(|&b| b == 0xc3).unwrap() + 1;

        let mut decoder = SseFrameDecoder::new();
        assert!(decoder.push(&bytes[..split]).is_empty());
        let frames = decoder.push(&bytes[split..]);
        assert_eq!(frames, vec![frame("log", "caf\u{e9} \u{2713}")]);
    }

    #[test]
    fn test_chunk_boundary_independence() {
        let bytes =
            "event: log\ndata: caf\u{e9}\n\nevent: completion\ndata: {\"done\":true}\n\n".as_bytes();

        let mut reference = SseFrameDecoder::new();
        let expected = reference.push(bytes);
        assert_eq!(expected.len(), 2);

        // Every single split point, including mid-line and mid-multibyte.
        for split in 0..=bytes.len() {
            let mut decoder = SseFrameDecoder::new();
            let mut frames = decoder.push(&bytes[..split]);
            frames.extend(decoder.push(&bytes[split..]));
            assert_eq!(frames, expected, "split at byte {split}");
        }

        // One byte at a time.
        let mut decoder = SseFrameDecoder::new();
        let mut frames = Vec::new();
        for byte in bytes {
            frames.extend(decoder.push(std::slice::from_ref(byte)));
        }
        assert_eq!(frames, expected);
    }
}
