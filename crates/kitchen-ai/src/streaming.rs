//! Server-Sent Events (SSE) streaming decoder.
//!
//! Gemini's `streamGenerateContent?alt=sse` endpoint answers with an SSE
//! body. This module turns any buffered async reader (or a reqwest response)
//! into an ordered stream of `SseEvent`s, one per blank-line-terminated block.

use futures_util::{Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio_util::io::StreamReader;

use crate::AiError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event type, if the server sent an `event:` field.
    pub event: Option<String>,
    /// The event data. Multiple `data:` lines are joined with `\n`.
    pub data: String,
}

/// Line-oriented SSE decoder.
#[derive(Debug, Default)]
pub struct SseDecoder {
    event: Option<String>,
    data: String,
    has_data: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without its terminator). Returns an event when the
    /// line completes one.
    pub fn feed_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.take_event();
        }

        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                if self.has_data {
                    self.data.push('\n');
                }
                self.data.push_str(value);
                self.has_data = true;
            }
            // id:, retry:, and unknown fields
            _ => {}
        }
        None
    }

    /// Flush a trailing event that was not followed by a blank line.
    pub fn finish(&mut self) -> Option<SseEvent> {
        self.take_event()
    }

    fn take_event(&mut self) -> Option<SseEvent> {
        if !self.has_data {
            self.event = None;
            return None;
        }
        self.has_data = false;
        Some(SseEvent {
            event: self.event.take(),
            data: std::mem::take(&mut self.data),
        })
    }
}

struct ReaderState<R> {
    lines: Lines<R>,
    decoder: SseDecoder,
}

/// Decode SSE events from a buffered async reader.
pub fn sse_events_from_reader<R>(reader: R) -> impl Stream<Item = Result<SseEvent, AiError>> + Send
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let state = ReaderState {
        lines: reader.lines(),
        decoder: SseDecoder::new(),
    };

    futures_util::stream::try_unfold(state, |mut state| async move {
        loop {
            let line = state
                .lines
                .next_line()
                .await
                .map_err(|e| AiError::NetworkError(e.to_string()))?;

            match line {
                Some(line) => {
                    if let Some(event) = state.decoder.feed_line(&line) {
                        return Ok(Some((event, state)));
                    }
                }
                None => {
                    let last = state.decoder.finish();
                    return Ok(last.map(|event| (event, state)));
                }
            }
        }
    })
}

/// Decode SSE events from a reqwest response body.
pub fn sse_events(
    response: reqwest::Response,
) -> impl Stream<Item = Result<SseEvent, AiError>> + Send {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    sse_events_from_reader(reader)
}
