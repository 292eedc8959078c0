//! Server-Sent Events framing.
//!
//! [`SseEvent`] is one `text/event-stream` frame. Servers build events with
//! the named constructors; clients feed raw chunks into [`SseParser`] and get
//! complete events back.

use crate::error::TransportError;

/// Event name sent when a stream opens; data is the session id.
pub const EVENT_CONNECTED: &str = "connected";

/// Event name carrying a JSON-RPC response.
pub const EVENT_MESSAGE: &str = "message";

/// Event name carrying a dispatch failure.
pub const EVENT_ERROR: &str = "error";

/// A single SSE frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseEvent {
    /// Optional `id:` field.
    pub id: Option<String>,
    /// Optional `event:` field.
    pub event: Option<String>,
    /// The `data:` payload, possibly multi-line.
    pub data: String,
}

impl SseEvent {
    /// Create an event with only a data payload.
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    /// The `connected` event announcing the stream's session id.
    #[must_use]
    pub fn connected(session_id: &str) -> Self {
        Self::new(session_id).event(EVENT_CONNECTED)
    }

    /// A `message` event carrying an encoded response.
    ///
    /// The id is omitted when the session has no event counter.
    #[must_use]
    pub fn message(event_id: Option<u64>, data: impl Into<String>) -> Self {
        let mut event = Self::new(data).event(EVENT_MESSAGE);
        event.id = event_id.map(|id| id.to_string());
        event
    }

    /// An `error` event.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message).event(EVENT_ERROR)
    }

    /// Set the event name.
    #[must_use]
    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Set the event id.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Check the event name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.event.as_deref() == Some(name)
    }

    /// Render the frame, including the terminating blank line.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::new();
        if let Some(id) = &self.id {
            out.push_str("id: ");
            out.push_str(id);
            out.push('\n');
        }
        if let Some(event) = &self.event {
            out.push_str("event: ");
            out.push_str(event);
            out.push('\n');
        }
        for line in self.data.split('\n') {
            out.push_str("data: ");
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

/// Incremental `text/event-stream` parser.
#[derive(Debug)]
pub struct SseParser {
    buffer: String,
    max_event_size: usize,
}

impl Default for SseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SseParser {
    /// Create a parser with the default 16 MB event limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            max_event_size: crate::stdio::MAX_MESSAGE_SIZE,
        }
    }

    /// Override the maximum event size.
    #[must_use]
    pub const fn with_max_event_size(mut self, max: usize) -> Self {
        self.max_event_size = max;
        self
    }

    /// Feed a chunk and return every event it completes.
    ///
    /// Comment lines (keep-alives) and frames without data are dropped.
    pub fn push(&mut self, chunk: &str) -> Result<Vec<SseEvent>, TransportError> {
        self.buffer.push_str(&chunk.replace("\r\n", "\n"));

        let mut events = Vec::new();
        while let Some(end) = self.buffer.find("\n\n") {
            let frame: String = self.buffer.drain(..end + 2).collect();
            if frame.len() > self.max_event_size {
                return Err(TransportError::MessageTooLarge {
                    size: frame.len(),
                    max: self.max_event_size,
                });
            }
            if let Some(event) = Self::parse_frame(&frame) {
                events.push(event);
            }
        }

        if self.buffer.len() > self.max_event_size {
            return Err(TransportError::MessageTooLarge {
                size: self.buffer.len(),
                max: self.max_event_size,
            });
        }
        Ok(events)
    }

    fn parse_frame(frame: &str) -> Option<SseEvent> {
        let mut event = SseEvent::default();
        let mut data_lines = Vec::new();

        for line in frame.lines() {
            if line.starts_with(':') {
                continue;
            }
            let (field, value) = line.split_once(':').unwrap_or((line, ""));
            let value = value.strip_prefix(' ').unwrap_or(value);
            match field {
                "id" => event.id = Some(value.to_string()),
                "event" => event.event = Some(value.to_string()),
                "data" => data_lines.push(value),
                _ => {}
            }
        }

        if data_lines.is_empty() {
            return None;
        }
        event.data = data_lines.join("\n");
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_message() {
        let frame = SseEvent::message(Some(3), r#"{"id":1}"#).encode();
        assert_eq!(frame, "id: 3\nevent: message\ndata: {\"id\":1}\n\n");
    }

    #[test]
    fn test_encode_multiline_data() {
        let frame = SseEvent::new("a\nb").encode();
        assert_eq!(frame, "data: a\ndata: b\n\n");
    }

    #[test]
    fn test_parse_across_chunks() -> Result<(), Box<dyn std::error::Error>> {
        let mut parser = SseParser::new();
        assert!(parser.push("event: connected\nda")?.is_empty());
        let events = parser.push("ta: abc\n\n: keep-alive\n\nid: 1\nevent: message\ndata: {}\n\n")?;

        assert_eq!(
            events,
            vec![
                SseEvent::connected("abc"),
                SseEvent::message(Some(1), "{}"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_parse_crlf_and_multiline() -> Result<(), Box<dyn std::error::Error>> {
        let mut parser = SseParser::new();
        let events = parser.push("data: a\r\ndata: b\r\n\r\n")?;
        assert_eq!(events, vec![SseEvent::new("a\nb")]);
        Ok(())
    }

    #[test]
    fn test_round_trip_through_parser() -> Result<(), Box<dyn std::error::Error>> {
        let original = SseEvent::error("boom").id("7");
        let events = SseParser::new().push(&original.encode())?;
        assert_eq!(events, vec![original]);
        Ok(())
    }

    #[test]
    fn test_event_too_large() {
        let mut parser = SseParser::new().with_max_event_size(10);
        let result = parser.push("data: 0123456789abcdef\n\n");
        assert!(matches!(result, Err(TransportError::MessageTooLarge { .. })));
    }
}
