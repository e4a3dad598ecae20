//! Interactive chat loop over a `ChatHandle`.

use std::io::Write;

use kitchen_ai::{ChatHandle, ChatSession, SessionError, TranscriptSnapshot};
use kitchen_common::{KitchenError, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::render::TranscriptRenderer;

const QUIT: &str = "/quit";

/// Read user lines from stdin and stream each reply to stdout until `/quit`
/// or end of input.
pub async fn run(session: ChatSession) -> Result<()> {
    tracing::info!(session = %session.id(), "Starting chat: {}", session.persona().subject());

    let handle = ChatHandle::spawn(session);
    let mut updates = handle.subscribe();
    let mut renderer = TranscriptRenderer::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    let greeting = updates.borrow_and_update().clone();
    write_out(&mut stdout, &renderer.render(&greeting))?;

    loop {
        write_out(&mut stdout, "> ")?;
        let Some(line) = lines.next_line().await? else {
            write_out(&mut stdout, "\n")?;
            break;
        };
        let line = line.trim();
        if line == QUIT {
            break;
        }
        if line.is_empty() {
            continue;
        }

        match handle.send(line) {
            Ok(()) => follow_turn(&mut updates, &mut renderer, &mut stdout).await?,
            Err(SessionError::Closed) => {
                return Err(KitchenError::Session("chat session ended".into()))
            }
            Err(e) => eprintln!("{e}"),
        }
    }

    tracing::info!(session = %handle.id(), "Chat ended");
    Ok(())
}

/// Print snapshot deltas until the first settled snapshot.
async fn follow_turn(
    updates: &mut watch::Receiver<TranscriptSnapshot>,
    renderer: &mut TranscriptRenderer,
    out: &mut impl Write,
) -> Result<()> {
    loop {
        updates
            .changed()
            .await
            .map_err(|_| KitchenError::Session("chat session ended".into()))?;
        let snapshot = updates.borrow_and_update().clone();
        write_out(out, &renderer.render(&snapshot))?;
        if !snapshot.status.is_in_flight() {
            return Ok(());
        }
    }
}

fn write_out(out: &mut impl Write, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_ai::{ChatMessage, SessionStatus};

    fn turn(reply: &str, status: SessionStatus) -> TranscriptSnapshot {
        TranscriptSnapshot {
            messages: vec![
                ChatMessage::model("Hello!"),
                ChatMessage::user("Almond milk?"),
                ChatMessage::model(reply),
            ],
            status,
            open_index: status.is_in_flight().then_some(2),
        }
    }

    /// A renderer and receiver that have already shown the greeting.
    fn after_greeting() -> (
        watch::Sender<TranscriptSnapshot>,
        watch::Receiver<TranscriptSnapshot>,
        TranscriptRenderer,
    ) {
        let greeting = TranscriptSnapshot {
            messages: vec![ChatMessage::model("Hello!")],
            status: SessionStatus::Idle,
            open_index: None,
        };
        let (tx, mut rx) = watch::channel(greeting);
        let mut renderer = TranscriptRenderer::default();
        renderer.render(&rx.borrow_and_update());
        (tx, rx, renderer)
    }

    #[tokio::test]
    async fn prints_streamed_reply_and_stops_when_settled() {
        let (tx, mut rx, mut renderer) = after_greeting();
        let publisher = tokio::spawn(async move {
            for snapshot in [
                turn("", SessionStatus::Awaiting),
                turn("Yes", SessionStatus::Streaming),
                turn("Yes, that works.", SessionStatus::Streaming),
                turn("Yes, that works.", SessionStatus::Idle),
            ] {
                tx.send_replace(snapshot);
                tokio::task::yield_now().await;
            }
            tx
        });

        let mut out = Vec::new();
        follow_turn(&mut rx, &mut renderer, &mut out).await.unwrap();
        let tx = publisher.await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Yes, that works.\n\n");

        // Snapshots after the settled one belong to the next turn.
        tx.send_replace(turn("Yes, that works.", SessionStatus::Awaiting));
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn failed_turn_settles_with_apology() {
        let (tx, mut rx, mut renderer) = after_greeting();
        tx.send_replace(turn("Sorry.", SessionStatus::Failed));

        let mut out = Vec::new();
        follow_turn(&mut rx, &mut renderer, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Sorry.\n\n");
    }

    #[tokio::test]
    async fn closed_session_is_an_error() {
        let (tx, mut rx, mut renderer) = after_greeting();
        drop(tx);

        let mut out = Vec::new();
        let err = follow_turn(&mut rx, &mut renderer, &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, KitchenError::Session(_)));
        assert!(out.is_empty());
    }
}
