//! Incremental server-sent-events parser.
//!
//! Feed raw bytes as they arrive off the wire; complete events come back as
//! plain text payloads. The stream endpoint delivers response fragments as
//! `data:` lines, so no JSON decoding happens here.

use crate::error::ClientError;

/// Parser state for one SSE response body.
///
/// An event is one or more `data:` lines terminated by a blank line; the
/// payload is the data lines joined with `\n`. Comment lines (`:`) and the
/// `event:`/`id:`/`retry:` fields are skipped. A `data: [DONE]` line marks
/// the end of the stream.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
    done: bool,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the `[DONE]` terminator has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed a chunk of bytes and collect any events completed by it.
    pub fn push_bytes(&mut self, chunk: &[u8]) -> Result<Vec<String>, ClientError> {
        if self.done {
            return Ok(Vec::new());
        }
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8(line_bytes)?;
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
            if self.done {
                break;
            }
        }
        Ok(events)
    }

    /// Flush any event still pending when the byte stream ends.
    ///
    /// Handles streams whose final event is not followed by a blank line.
    pub fn finish(&mut self) -> Result<Option<String>, ClientError> {
        if self.done {
            return Ok(None);
        }
        if !self.buffer.is_empty() {
            let line = String::from_utf8(std::mem::take(&mut self.buffer))?;
            if let Some(event) = self.process_line(&line) {
                return Ok(Some(event));
            }
        }
        Ok(self.dispatch())
    }

    /// Process one line; returns a completed event payload if the line was a
    /// blank event terminator.
    fn process_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim_end_matches(['\n', '\r']);

        if line.is_empty() {
            return self.dispatch();
        }

        // Comment line.
        if line.starts_with(':') {
            return None;
        }

        if let Some(rest) = line.strip_prefix("data:") {
            // Per the SSE spec, exactly one leading space is separator; any
            // further whitespace belongs to the payload.
            let data = rest.strip_prefix(' ').unwrap_or(rest);

            if data == "[DONE]" {
                self.done = true;
                self.data_lines.clear();
                return None;
            }

            self.data_lines.push(data.to_string());
            return None;
        }

        // Ignore other SSE fields (event, id, retry).
        None
    }

    /// Join pending data lines into an event payload.
    fn dispatch(&mut self) -> Option<String> {
        if self.data_lines.is_empty() {
            return None;
        }
        let payload = self.data_lines.join("\n");
        self.data_lines.clear();
        if payload.is_empty() {
            None
        } else {
            Some(payload)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(input: &str) -> Vec<String> {
        let mut parser = SseParser::new();
        let mut events = parser.push_bytes(input.as_bytes()).unwrap();
        if let Some(last) = parser.finish().unwrap() {
            events.push(last);
        }
        events
    }

    #[test]
    fn test_single_event() {
        let events = parse_all("data: Hello\n\n");
        assert_eq!(events, vec!["Hello"]);
    }

    #[test]
    fn test_two_events_preserve_order_and_spacing() {
        let events = parse_all("data: Hello\n\ndata:  world\n\n");
        assert_eq!(events, vec!["Hello", " world"]);
    }

    #[test]
    fn test_leading_space_is_separator_only() {
        // "data: x" -> "x", "data:x" -> "x", "data:  x" -> " x"
        assert_eq!(parse_all("data: x\n\n"), vec!["x"]);
        assert_eq!(parse_all("data:x\n\n"), vec!["x"]);
        assert_eq!(parse_all("data:  x\n\n"), vec![" x"]);
    }

    #[test]
    fn test_multi_line_data_joined_with_newline() {
        let events = parse_all("data: line one\ndata: line two\n\n");
        assert_eq!(events, vec!["line one\nline two"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let events = parse_all("data: Hello\r\n\r\ndata: world\r\n\r\n");
        assert_eq!(events, vec!["Hello", "world"]);
    }

    #[test]
    fn test_comment_lines_skipped() {
        let events = parse_all(": keep-alive\ndata: payload\n\n");
        assert_eq!(events, vec!["payload"]);
    }

    #[test]
    fn test_other_fields_ignored() {
        let events = parse_all("event: message\nid: 7\nretry: 100\ndata: payload\n\n");
        assert_eq!(events, vec!["payload"]);
    }

    #[test]
    fn test_done_terminates_stream() {
        let mut parser = SseParser::new();
        let events = parser
            .push_bytes(b"data: one\n\ndata: [DONE]\n\ndata: after\n\n")
            .unwrap();
        assert_eq!(events, vec!["one"]);
        assert!(parser.is_done());

        // Further input is ignored once done.
        let more = parser.push_bytes(b"data: more\n\n").unwrap();
        assert!(more.is_empty());
        assert!(parser.finish().unwrap().is_none());
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.push_bytes(b"data: Hel").unwrap().is_empty());
        assert!(parser.push_bytes(b"lo wor").unwrap().is_empty());
        let events = parser.push_bytes(b"ld\n\n").unwrap();
        assert_eq!(events, vec!["Hello world"]);
    }

    #[test]
    fn test_finish_flushes_unterminated_event() {
        let mut parser = SseParser::new();
        assert!(parser.push_bytes(b"data: trailing").unwrap().is_empty());
        assert_eq!(parser.finish().unwrap().as_deref(), Some("trailing"));
    }

    #[test]
    fn test_finish_flushes_pending_data_lines() {
        let mut parser = SseParser::new();
        assert!(parser.push_bytes(b"data: pending\n").unwrap().is_empty());
        assert_eq!(parser.finish().unwrap().as_deref(), Some("pending"));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_all("").is_empty());
    }

    #[test]
    fn test_blank_lines_without_data() {
        assert!(parse_all("\n\n\n").is_empty());
    }

    #[test]
    fn test_empty_data_payload_not_emitted() {
        assert!(parse_all("data:\n\n").is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        let mut parser = SseParser::new();
        let result = parser.push_bytes(&[b'd', 0xff, 0xfe, b'\n']);
        assert!(result.is_err());
    }

    #[test]
    fn test_unicode_payload() {
        let events = parse_all("data: r\u{00e9}ponse \u{1f916}\n\n");
        assert_eq!(events, vec!["r\u{00e9}ponse \u{1f916}"]);
    }
}
