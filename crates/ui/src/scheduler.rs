//! Cancellable deferred UI work.
//!
//! The original client ran two uncoordinated `setTimeout`s - the notice
//! auto-hide and the post-checkout navigation - so an old timer could hide
//! a newer notice or navigate after the user had already moved on. Here
//! all deferred work goes through one [`Scheduler`]: each [`TimerSlot`]
//! holds at most one pending task, scheduling into a slot aborts whatever
//! was pending there, and fired events are delivered over a channel the
//! host drains on its own loop.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;

/// An event produced by a fired timer, handed back to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedEvent {
    /// Hide the current notice.
    HideNotice,
    /// Navigate to order history (after a receipt-less checkout success).
    OpenOrders,
}

/// Named slot for a pending timer. One pending task per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerSlot {
    Notice,
    Navigation,
}

/// Owns every pending timer in the UI.
pub struct Scheduler {
    tx: UnboundedSender<TimedEvent>,
    pending: HashMap<TimerSlot, AbortHandle>,
}

impl Scheduler {
    /// Create a scheduler and the receiver the host drains.
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<TimedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                pending: HashMap::new(),
            },
            rx,
        )
    }

    /// Schedule `event` to fire after `delay`, replacing any task still
    /// pending in `slot`.
    pub fn schedule(&mut self, slot: TimerSlot, delay: Duration, event: TimedEvent) {
        self.cancel(slot);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the shell is shutting down; nothing to do.
            let _ = tx.send(event);
        });
        self.pending.insert(slot, handle.abort_handle());
    }

    /// Abort the pending task in `slot`, if any.
    pub fn cancel(&mut self, slot: TimerSlot) {
        if let Some(handle) = self.pending.remove(&slot) {
            handle.abort();
        }
    }

    /// Abort everything. Used on logout and shutdown.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_event_fires_after_delay() {
        let (mut scheduler, mut rx) = Scheduler::new();
        scheduler.schedule(
            TimerSlot::Notice,
            Duration::from_millis(3000),
            TimedEvent::HideNotice,
        );

        let event = rx.recv().await;
        assert_eq!(event, Some(TimedEvent::HideNotice));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_pending_task() {
        let (mut scheduler, mut rx) = Scheduler::new();
        scheduler.schedule(
            TimerSlot::Navigation,
            Duration::from_millis(1500),
            TimedEvent::OpenOrders,
        );
        // A second schedule into the same slot aborts the first.
        scheduler.schedule(
            TimerSlot::Navigation,
            Duration::from_millis(1500),
            TimedEvent::HideNotice,
        );

        assert_eq!(rx.recv().await, Some(TimedEvent::HideNotice));
        // Nothing else pending: advancing far past both deadlines yields no
        // second event.
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_delivery() {
        let (mut scheduler, mut rx) = Scheduler::new();
        scheduler.schedule(
            TimerSlot::Notice,
            Duration::from_millis(3000),
            TimedEvent::HideNotice,
        );
        scheduler.cancel(TimerSlot::Notice);

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slots_are_independent() {
        let (mut scheduler, mut rx) = Scheduler::new();
        scheduler.schedule(
            TimerSlot::Notice,
            Duration::from_millis(3000),
            TimedEvent::HideNotice,
        );
        scheduler.schedule(
            TimerSlot::Navigation,
            Duration::from_millis(1500),
            TimedEvent::OpenOrders,
        );

        // The shorter navigation delay fires first.
        assert_eq!(rx.recv().await, Some(TimedEvent::OpenOrders));
        assert_eq!(rx.recv().await, Some(TimedEvent::HideNotice));
    }
}
