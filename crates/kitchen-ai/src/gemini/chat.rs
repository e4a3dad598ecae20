//! Streamed chat sessions against Gemini (`ChatBackend` implementation).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use tracing::debug;

use crate::backend::{BackendSession, ChatBackend, ChunkStream};
use crate::session::ChatMessage;
use crate::streaming::{sse_events, SseEvent};
use crate::AiError;

use super::client::{extract_chunk_text, GeminiClient};

type History = Arc<Mutex<Vec<ChatMessage>>>;

/// One Gemini conversation bound to a fixed system instruction.
pub struct GeminiChat {
    client: GeminiClient,
    model: String,
    system_instruction: String,
    history: History,
}

impl GeminiChat {
    pub fn new(
        client: GeminiClient,
        system_instruction: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            system_instruction: system_instruction.into(),
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ChatBackend for GeminiClient {
    fn open_session(
        &self,
        system_instruction: &str,
        model: &str,
    ) -> Result<Box<dyn BackendSession>, AiError> {
        debug!(model, "Opening Gemini chat session");
        Ok(Box::new(GeminiChat::new(
            self.clone(),
            system_instruction,
            model,
        )))
    }
}

#[async_trait]
impl BackendSession for GeminiChat {
    async fn send_turn(&mut self, text: &str) -> Result<ChunkStream, AiError> {
        let history = self.history();
        let body = self
            .client
            .build_chat_body(&self.system_instruction, &history, text);
        let url = self.client.api_url(&self.model, true);

        debug!(model = %self.model, history = history.len(), "Gemini API streaming request");

        let response = self.client.post(&url, &body, None).await?;
        Ok(Box::pin(reply_chunks(
            sse_events(response),
            text.to_string(),
            Arc::clone(&self.history),
        )))
    }

    fn history(&self) -> Vec<ChatMessage> {
        lock_history(&self.history).clone()
    }
}

fn lock_history(history: &History) -> std::sync::MutexGuard<'_, Vec<ChatMessage>> {
    history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct ReplyState<S> {
    events: S,
    user_text: String,
    reply: String,
    history: History,
}

impl<S> ReplyState<S> {
    fn commit(&mut self) {
        let mut history = lock_history(&self.history);
        history.push(ChatMessage::user(std::mem::take(&mut self.user_text)));
        history.push(ChatMessage::model(std::mem::take(&mut self.reply)));
    }
}

/// Map SSE events to text chunks. On a clean end of stream the finished
/// turn is committed to `history` before the stream reports completion; a
/// stream that carried no text ends with an error instead.
fn reply_chunks<S>(
    events: S,
    user_text: String,
    history: History,
) -> impl Stream<Item = Result<String, AiError>> + Send
where
    S: Stream<Item = Result<SseEvent, AiError>> + Send + 'static,
{
    let state = ReplyState {
        events: Box::pin(events),
        user_text,
        reply: String::new(),
        history,
    };

    futures_util::stream::try_unfold(state, |mut state| async move {
        loop {
            match state.events.next().await {
                Some(Ok(event)) => {
                    if let Some(text) = extract_chunk_text(&event.data)? {
                        state.reply.push_str(&text);
                        return Ok(Some((text, state)));
                    }
                }
                Some(Err(e)) => return Err(e),
                // Safety stops and usage-only replies end without text. An empty
                // model turn in history makes Gemini reject every later request.
                None if state.reply.is_empty() => {
                    return Err(AiError::ApiError("empty reply".to_string()));
                }
                None => {
                    state.commit();
                    return Ok(None);
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn frame(text: &str) -> Result<SseEvent, AiError> {
        Ok(SseEvent {
            event: None,
            data: serde_json::json!({
                "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
            })
            .to_string(),
        })
    }

    fn usage_frame() -> Result<SseEvent, AiError> {
        Ok(SseEvent {
            event: None,
            data: r#"{"usageMetadata":{"promptTokenCount":3}}"#.to_string(),
        })
    }

    #[tokio::test]
    async fn chunks_are_forwarded_in_order_and_turn_is_recorded() {
        let history: History = Arc::new(Mutex::new(Vec::new()));
        let events = stream::iter(vec![
            frame("Yes"),
            usage_frame(),
            frame(", that"),
            frame(" works great."),
        ]);

        let chunks: Vec<String> =
            reply_chunks(events, "Can I use almond milk?".into(), Arc::clone(&history))
                .map(|c| c.unwrap())
                .collect()
                .await;

        assert_eq!(chunks, ["Yes", ", that", " works great."]);
        let history = history.lock().unwrap();
        assert_eq!(
            *history,
            vec![
                ChatMessage::user("Can I use almond milk?"),
                ChatMessage::model("Yes, that works great."),
            ]
        );
    }

    #[tokio::test]
    async fn failed_stream_leaves_history_untouched() {
        let history: History = Arc::new(Mutex::new(Vec::new()));
        let events = stream::iter(vec![
            frame("Yes"),
            Err(AiError::NetworkError("connection reset".into())),
        ]);

        let results: Vec<Result<String, AiError>> =
            reply_chunks(events, "hi".into(), Arc::clone(&history))
                .collect()
                .await;

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(AiError::NetworkError(_))));
        assert!(history.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn textless_stream_fails_and_leaves_history_untouched() {
        let history: History = Arc::new(Mutex::new(Vec::new()));
        let safety_stop = Ok(SseEvent {
            event: None,
            data: r#"{"candidates":[{"finishReason":"SAFETY"}]}"#.to_string(),
        });
        let events = stream::iter(vec![safety_stop, usage_frame()]);

        let results: Vec<Result<String, AiError>> =
            reply_chunks(events, "q1".into(), Arc::clone(&history))
                .collect()
                .await;

        assert_eq!(results.len(), 1);
        assert!(matches!(&results[0], Err(AiError::ApiError(m)) if m == "empty reply"));
        assert!(history.lock().unwrap().is_empty());

        let client = GeminiClient::new(crate::gemini::GeminiConfig::new("k"));
        let body = client.build_chat_body("sys", &history.lock().unwrap(), "q2");
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["parts"][0]["text"], "q2");
    }

    #[test]
    fn open_session_binds_model() {
        let client = GeminiClient::new(crate::gemini::GeminiConfig::new("k"));
        let chat = GeminiChat::new(client, "You are a study buddy.", "gemini-2.5-flash");
        assert_eq!(chat.model, "gemini-2.5-flash");
        assert!(chat.history().is_empty());
    }
}
