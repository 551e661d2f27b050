//! Rolling event feed and event-feed file loading.
//!
//! The detector only ever reads the feed. [`EventFeed`] keeps the most
//! recent events up to a fixed capacity, dropping the oldest first. Feed
//! files are JSON: either a bare array of events, or an object carrying
//! both `events` and courier `dispatches`.

use std::collections::VecDeque;
use std::path::Path;

use serde::Deserialize;
use workfloor_types::FeedEvent;

/// Errors that can occur when loading an event-feed file.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Failed to read the file from disk.
    #[error("failed to read event feed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The file is not a valid event feed.
    #[error("failed to parse event feed JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Bounded, ordered buffer of recent feed events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFeed {
    events: VecDeque<FeedEvent>,
    capacity: usize,
}

impl EventFeed {
    /// Create an empty feed holding at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an event, dropping the oldest if full.
    pub fn push(&mut self, event: FeedEvent) {
        if self.events.len() >= self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Append events in order.
    pub fn extend(&mut self, events: impl IntoIterator<Item = FeedEvent>) {
        for event in events {
            self.push(event);
        }
    }

    /// Events oldest first, as one contiguous slice.
    pub fn as_slice(&mut self) -> &[FeedEvent] {
        self.events.make_contiguous()
    }

    /// Events oldest first.
    pub fn events(&self) -> impl Iterator<Item = &FeedEvent> {
        self.events.iter()
    }

    /// Maximum number of events kept.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of events currently held.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the feed is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// A courier dispatch: from `timestamp` on, the active destination is
/// `destination`. `None` clears the signal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Dispatch {
    /// When the dispatch takes effect (RFC 3339).
    pub timestamp: String,
    /// Destination name, or `None` to clear.
    #[serde(default)]
    pub destination: Option<String>,
}

/// Parsed contents of an event-feed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedFile {
    /// Feed events in file order.
    #[serde(default)]
    pub events: Vec<FeedEvent>,
    /// Courier dispatches in file order.
    #[serde(default)]
    pub dispatches: Vec<Dispatch>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedFileRepr {
    Events(Vec<FeedEvent>),
    Full(FeedFile),
}

impl FeedFile {
    /// Parse feed-file JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Json`] if the content is neither an event array
    /// nor an object with `events`/`dispatches`.
    pub fn parse(json: &str) -> Result<Self, FeedError> {
        Ok(match serde_json::from_str(json)? {
            FeedFileRepr::Events(events) => Self {
                events,
                dispatches: Vec::new(),
            },
            FeedFileRepr::Full(file) => file,
        })
    }
}

/// Load an event-feed file from disk.
///
/// # Errors
///
/// Returns [`FeedError::Io`] if the file cannot be read, or
/// [`FeedError::Json`] if it cannot be parsed.
pub fn load_feed_file(path: &Path) -> Result<FeedFile, FeedError> {
    let contents = std::fs::read_to_string(path)?;
    let file = FeedFile::parse(&contents)?;
    tracing::debug!(
        path = %path.display(),
        events = file.events.len(),
        dispatches = file.dispatches.len(),
        "Event feed loaded"
    );
    Ok(file)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use workfloor_types::FeedEventType;

    use super::*;

    fn event(n: usize) -> FeedEvent {
        FeedEvent {
            timestamp: format!("2025-03-01T09:00:{n:02}Z"),
            agent_id: "analyst".into(),
            message: format!("update {n}"),
            event_type: FeedEventType::Status,
        }
    }

    #[test]
    fn oldest_dropped_when_full() {
        let mut feed = EventFeed::new(3);
        feed.extend((0..5).map(event));
        assert_eq!(feed.len(), 3);
        let messages: Vec<&str> = feed.as_slice().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["update 2", "update 3", "update 4"]);
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let mut feed = EventFeed::new(0);
        feed.push(event(1));
        feed.push(event(2));
        assert_eq!(feed.capacity(), 1);
        assert_eq!(feed.events().next().unwrap().message, "update 2");
    }

    #[test]
    fn bare_array_parses() {
        let json = r#"[
            {"timestamp": "2025-03-01T09:00:00Z", "agentId": "trade-master",
             "message": "handing off to full-stack", "type": "handoff"}
        ]"#;
        let file = FeedFile::parse(json).unwrap();
        assert_eq!(file.events.len(), 1);
        assert_eq!(file.events.first().unwrap().event_type, FeedEventType::Handoff);
        assert!(file.dispatches.is_empty());
    }

    #[test]
    fn object_with_dispatches_parses() {
        let json = r#"{
            "events": [],
            "dispatches": [
                {"timestamp": "2025-03-01T09:00:00Z", "destination": "design"},
                {"timestamp": "2025-03-01T09:00:30Z", "destination": null}
            ]
        }"#;
        let file = FeedFile::parse(json).unwrap();
        assert_eq!(file.dispatches.len(), 2);
        assert_eq!(file.dispatches.first().unwrap().destination.as_deref(), Some("design"));
        assert!(file.dispatches.last().unwrap().destination.is_none());
    }

    #[test]
    fn garbage_is_json_error() {
        assert!(matches!(FeedFile::parse("{\"events\": 3}"), Err(FeedError::Json { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_feed_file(Path::new("/nonexistent/workfloor/events.json"));
        assert!(matches!(result, Err(FeedError::Io { .. })));
    }
}
