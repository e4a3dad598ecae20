//! Turns transcript snapshots into terminal output.
//!
//! Snapshots may be coalesced, so the renderer diffs each one against what
//! it has already printed instead of assuming one snapshot per chunk.

use kitchen_ai::{ChatRole, TranscriptSnapshot};

#[derive(Debug, Default)]
pub struct TranscriptRenderer {
    /// Messages before this index are fully printed (or skipped).
    shown: usize,
    /// Index and already-printed text of a reply still streaming.
    open: Option<(usize, String)>,
}

impl TranscriptRenderer {
    /// Text to write for `snapshot`. User messages are skipped; the user
    /// typed them.
    pub fn render(&mut self, snapshot: &TranscriptSnapshot) -> String {
        let mut out = String::new();

        for (index, message) in snapshot.messages.iter().enumerate().skip(self.shown) {
            let is_open = snapshot.open_index == Some(index);
            if message.role == ChatRole::User {
                self.shown = index + 1;
                continue;
            }

            let printed = match self.open.take() {
                Some((i, printed)) if i == index => printed,
                _ => String::new(),
            };
            match message.text.strip_prefix(printed.as_str()) {
                Some(delta) => out.push_str(delta),
                // The streamed text was replaced, e.g. by an apology.
                None => {
                    out.push('\n');
                    out.push_str(&message.text);
                }
            }

            if is_open {
                self.open = Some((index, message.text.clone()));
                break;
            }
            out.push_str("\n\n");
            self.shown = index + 1;
        }
        out
    }
}
