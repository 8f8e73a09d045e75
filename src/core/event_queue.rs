use crate::core::event::Action;
use crate::terminal::KeyEvent;
use indexmap::IndexMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    Action(Action),
}

/// Pending events plus one error-clear deadline per input.
///
/// Scheduling a clear for an input that already has one moves its deadline,
/// so an error shown twice stays visible for the full timeout after the
/// second failure.
#[derive(Default)]
pub struct EventQueue {
    pending: VecDeque<AppEvent>,
    error_clears: IndexMap<String, Instant>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: AppEvent) {
        self.pending.push_back(event);
    }

    pub fn schedule_error_clear(&mut self, input_id: String, delay: Duration) {
        self.error_clears.shift_remove(&input_id);
        self.error_clears.insert(input_id, Instant::now() + delay);
    }

    pub fn cancel_error_clear(&mut self, input_id: &str) {
        self.error_clears.shift_remove(input_id);
    }

    /// Pending events first, then clears whose deadline has passed.
    pub fn pop_ready(&mut self, now: Instant) -> Option<AppEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        let index = self
            .error_clears
            .values()
            .enumerate()
            .filter(|(_, due)| **due <= now)
            .min_by_key(|(_, due)| **due)
            .map(|(index, _)| index)?;
        let (input_id, _) = self.error_clears.shift_remove_index(index)?;
        Some(AppEvent::Action(Action::ClearErrorMessage(input_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleared(event: Option<AppEvent>) -> Option<String> {
        match event {
            Some(AppEvent::Action(Action::ClearErrorMessage(id))) => Some(id),
            _ => None,
        }
    }

    #[test]
    fn clear_waits_for_its_deadline() {
        let mut queue = EventQueue::new();
        queue.schedule_error_clear("api-key".into(), Duration::from_secs(60));
        assert!(queue.pop_ready(Instant::now()).is_none());

        let later = Instant::now() + Duration::from_secs(61);
        assert_eq!(cleared(queue.pop_ready(later)).as_deref(), Some("api-key"));
        assert!(queue.pop_ready(later).is_none());
    }

    #[test]
    fn rescheduling_moves_the_deadline() {
        let mut queue = EventQueue::new();
        queue.schedule_error_clear("unit-1".into(), Duration::ZERO);
        queue.schedule_error_clear("unit-1".into(), Duration::from_secs(60));

        assert!(queue.pop_ready(Instant::now() + Duration::from_secs(1)).is_none());
        let later = Instant::now() + Duration::from_secs(61);
        assert_eq!(cleared(queue.pop_ready(later)).as_deref(), Some("unit-1"));
    }

    #[test]
    fn cancel_affects_that_input_only() {
        let mut queue = EventQueue::new();
        queue.schedule_error_clear("a".into(), Duration::ZERO);
        queue.schedule_error_clear("b".into(), Duration::ZERO);
        queue.cancel_error_clear("a");

        let later = Instant::now() + Duration::from_secs(1);
        assert_eq!(cleared(queue.pop_ready(later)).as_deref(), Some("b"));
        assert!(queue.pop_ready(later).is_none());
    }

    #[test]
    fn pending_events_come_before_due_clears() {
        let mut queue = EventQueue::new();
        queue.schedule_error_clear("a".into(), Duration::ZERO);
        queue.push(AppEvent::Action(Action::Submit));

        let later = Instant::now() + Duration::from_secs(1);
        assert!(matches!(
            queue.pop_ready(later),
            Some(AppEvent::Action(Action::Submit))
        ));
        assert_eq!(cleared(queue.pop_ready(later)).as_deref(), Some("a"));
    }
}
