//! Notification interface to the UI layer.
//!
//! The widget tree itself lives outside this crate; the pipeline only pushes
//! text into display slots and requests panel switches through [`UiSink`].

use std::time::Duration;

/// Display slot for one stage's collected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSlot {
    /// Echo of the recognized question (stage 1).
    Question,
    /// Generated answer content (stage 2).
    Content,
}

/// Top-level UI panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Listening / capture view.
    Listen,
    /// Reply view showing question, answer and scroll animation.
    Reply,
}

/// Pluggable UI notification handler for the answer pipeline.
/// Pairs with the playback flags for output — this handles the text side.
pub trait UiSink: Send {
    /// Display text in a slot. Called immediately after the producing stage
    /// returns; slot order follows stage order.
    fn show_text(&mut self, slot: TextSlot, text: &str);

    /// Switch to a panel after an optional delay.
    fn show_panel(&mut self, panel: Panel, delay: Duration);

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "sink"
    }
}

/// Sink that logs UI notifications. Used by the headless binary.
#[derive(Debug, Default)]
pub struct LogSink;

impl UiSink for LogSink {
    fn show_text(&mut self, slot: TextSlot, text: &str) {
        tracing::info!(?slot, text, "ui text");
    }

    fn show_panel(&mut self, panel: Panel, delay: Duration) {
        tracing::info!(?panel, delay_ms = delay.as_millis() as u64, "ui panel");
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// One recorded UI notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Text(TextSlot, String),
    Panel(Panel),
}

/// Sink that records notifications in arrival order, for assertions in tests.
#[derive(Debug, Default)]
pub struct CollectorSink {
    events: Vec<UiEvent>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[UiEvent] {
        &self.events
    }

    /// Text recorded for a slot, if any.
    pub fn text_for(&self, slot: TextSlot) -> Option<&str> {
        self.events.iter().find_map(|e| match e {
            UiEvent::Text(s, t) if *s == slot => Some(t.as_str()),
            _ => None,
        })
    }
}

impl UiSink for CollectorSink {
    fn show_text(&mut self, slot: TextSlot, text: &str) {
        self.events.push(UiEvent::Text(slot, text.to_string()));
    }

    fn show_panel(&mut self, panel: Panel, _delay: Duration) {
        self.events.push(UiEvent::Panel(panel));
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_preserves_arrival_order() {
        let mut sink = CollectorSink::new();
        sink.show_text(TextSlot::Question, "what time is it");
        sink.show_text(TextSlot::Content, "half past nine");
        sink.show_panel(Panel::Reply, Duration::ZERO);

        assert_eq!(
            sink.events(),
            &[
                UiEvent::Text(TextSlot::Question, "what time is it".to_string()),
                UiEvent::Text(TextSlot::Content, "half past nine".to_string()),
                UiEvent::Panel(Panel::Reply),
            ]
        );
    }

    #[test]
    fn question_delivered_before_content() {
        let mut sink = CollectorSink::new();
        sink.show_text(TextSlot::Question, "r1");
        sink.show_text(TextSlot::Content, "r2");

        let question_idx = sink
            .events()
            .iter()
            .position(|e| matches!(e, UiEvent::Text(TextSlot::Question, _)))
            .unwrap();
        let content_idx = sink
            .events()
            .iter()
            .position(|e| matches!(e, UiEvent::Text(TextSlot::Content, _)))
            .unwrap();
        assert!(question_idx < content_idx);
    }

    #[test]
    fn text_for_finds_slot_text() {
        let mut sink = CollectorSink::new();
        sink.show_text(TextSlot::Question, "hello");
        assert_eq!(sink.text_for(TextSlot::Question), Some("hello"));
        assert_eq!(sink.text_for(TextSlot::Content), None);
    }

    #[test]
    fn empty_text_is_recorded() {
        // A timed-out stage still pushes its (empty) result to the slot.
        let mut sink = CollectorSink::new();
        sink.show_text(TextSlot::Question, "");
        assert_eq!(sink.text_for(TextSlot::Question), Some(""));
    }

    #[test]
    fn log_sink_does_not_panic() {
        let mut sink = LogSink;
        sink.show_text(TextSlot::Question, "test");
        sink.show_panel(Panel::Listen, Duration::from_millis(2000));
        assert_eq!(sink.name(), "log");
    }
}
