use progress_logging::progress_trace;

/// One dispatched server-sent-event frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    /// A `:` comment line, typically a keepalive.
    Comment(String),
    /// The joined `data:` lines of one event.
    Data(String),
}

/// Incremental `text/event-stream` decoder.
///
/// Bytes are buffered per line, so chunks may split lines, `\r\n` pairs or
/// multi-byte characters anywhere.
#[derive(Debug, Default)]
pub struct SseDecoder {
    line: Vec<u8>,
    data: Option<String>,
    skip_lf: bool,
    past_first_line: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        let mut frames = Vec::new();
        for &byte in chunk {
            if std::mem::take(&mut self.skip_lf) && byte == b'\n' {
                continue;
            }
            match byte {
                b'\n' => self.end_line(&mut frames),
                b'\r' => {
                    self.skip_lf = true;
                    self.end_line(&mut frames);
                }
                _ => self.line.push(byte),
            }
        }
        frames
    }

    fn end_line(&mut self, frames: &mut Vec<SseFrame>) {
        let raw = std::mem::take(&mut self.line);
        let line = String::from_utf8_lossy(&raw);
        // A byte order mark may only open the stream.
        let line = if std::mem::replace(&mut self.past_first_line, true) {
            line.as_ref()
        } else {
            line.strip_prefix('\u{feff}').unwrap_or(&line)
        };

        if line.is_empty() {
            if let Some(data) = self.data.take() {
                frames.push(SseFrame::Data(data));
            }
            return;
        }
        if let Some(comment) = line.strip_prefix(':') {
            frames.push(SseFrame::Comment(comment.trim_start().to_string()));
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => match &mut self.data {
                Some(data) => {
                    data.push('\n');
                    data.push_str(value);
                }
                None => self.data = Some(value.to_string()),
            },
            other => progress_trace!("Ignoring event-stream field {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_data_on_blank_line() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b"data: {\"type\": \"progress\", \"scanned\": 3}\n\n");
        assert_eq!(
            frames,
            vec![SseFrame::Data(
                "{\"type\": \"progress\", \"scanned\": 3}".to_string()
            )]
        );
    }

    #[test]
    fn comments_are_reported_immediately() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b": keepalive\n\n");
        assert_eq!(frames, vec![SseFrame::Comment("keepalive".to_string())]);
    }

    #[test]
    fn handles_split_chunks_and_crlf() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"da").is_empty());
        assert!(decoder.push(b"ta: a\r").is_empty());
        assert!(decoder.push(b"\ndata: b\r\n").is_empty());
        let frames = decoder.push(b"\r\n");
        assert_eq!(frames, vec![SseFrame::Data("a\nb".to_string())]);
    }

    #[test]
    fn handles_lone_cr_line_endings() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b"data: a\rdata: b\r\r: keepalive\r");
        assert_eq!(
            frames,
            vec![
                SseFrame::Data("a\nb".to_string()),
                SseFrame::Comment("keepalive".to_string()),
            ]
        );
    }

    #[test]
    fn strips_leading_byte_order_mark() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"\xEF\xBB").is_empty());
        let frames = decoder.push(b"\xBFdata: x\n\n");
        assert_eq!(frames, vec![SseFrame::Data("x".to_string())]);
    }

    #[test]
    fn byte_order_mark_only_stripped_at_stream_start() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push("data: a\n\n\u{feff}data: b\n\n".as_bytes());
        assert_eq!(frames, vec![SseFrame::Data("a".to_string())]);
    }

    #[test]
    fn multibyte_character_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let text = "data: {\"type\":\"error\",\"message\":\"çöz\"}\n\n".as_bytes();
        let (head, tail) = text.split_at(36);
        let mut frames = decoder.push(head);
        frames.extend(decoder.push(tail));
        assert_eq!(
            frames,
            vec![SseFrame::Data(
                "{\"type\":\"error\",\"message\":\"çöz\"}".to_string()
            )]
        );
    }

    #[test]
    fn ignores_other_fields_and_empty_events() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b"event: update\nid: 7\nretry: 100\n\n\ndata\n\n");
        assert_eq!(frames, vec![SseFrame::Data(String::new())]);
    }

    #[test]
    fn incomplete_event_is_held_back() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: partial\n").is_empty());
    }
}
