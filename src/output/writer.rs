//! Message writers

use super::types::Message;
use crate::error::Result;
use crate::state::SyncState;
use crate::types::JsonObject;
use std::io::Write;

/// Destination of emitted messages
pub trait MessageWriter {
    /// Write one message
    fn write(&mut self, message: &Message) -> Result<()>;

    /// Flush buffered output
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: MessageWriter + ?Sized> MessageWriter for &mut T {
    fn write(&mut self, message: &Message) -> Result<()> {
        (**self).write(message)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Writes each message as one line of JSON
#[derive(Debug)]
pub struct JsonLinesWriter<W: Write> {
    out: W,
    messages_written: usize,
}

impl JsonLinesWriter<std::io::Stdout> {
    /// Writer on standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> JsonLinesWriter<W> {
    /// Create a writer over any byte sink
    pub fn new(out: W) -> Self {
        Self {
            out,
            messages_written: 0,
        }
    }

    /// Number of messages written so far
    pub fn messages_written(&self) -> usize {
        self.messages_written
    }

    /// Recover the underlying sink
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MessageWriter for JsonLinesWriter<W> {
    fn write(&mut self, message: &Message) -> Result<()> {
        serde_json::to_writer(&mut self.out, message)?;
        self.out.write_all(b"\n")?;
        // State must reach the consumer even if a later step fails.
        if message.is_state() {
            self.out.flush()?;
        }
        self.messages_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Collects messages in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    messages: Vec<Message>,
}

impl MemoryWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message, in emission order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Records of one stream, in emission order
    pub fn records(&self, stream: &str) -> Vec<&JsonObject> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Record {
                    stream: s, record, ..
                } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Every emitted state, in emission order
    pub fn states(&self) -> Vec<&SyncState> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::State { value } => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Last emitted state
    pub fn last_state(&self) -> Option<&SyncState> {
        self.states().pop()
    }

    /// Number of record messages
    pub fn record_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_record()).count()
    }
}

impl MessageWriter for MemoryWriter {
    fn write(&mut self, message: &Message) -> Result<()> {
        self.messages.push(message.clone());
        Ok(())
    }
}
