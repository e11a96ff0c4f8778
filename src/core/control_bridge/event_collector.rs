//=========================================================================
// Event Collector
//=========================================================================
//
// Host event collector with bounded polling and shutdown detection.
//
// Architecture:
//   Receiver<HostEvent> → collect_frame() → control events → TickControl
//
// At most MAX_EVENTS_PER_FRAME messages are drained per frame; the rest
// wait for the next tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::HostEvent;
use crate::game::ControlEvent;

const MAX_EVENTS_PER_FRAME: usize = 100;

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects host events with bounded polling.
pub(crate) struct EventCollector {
    receiver: Receiver<HostEvent>,
    events: Vec<ControlEvent>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<HostEvent>) -> Self {
        Self {
            receiver,
            events: Vec::with_capacity(8),
        }
    }

    /// Collects pending host events (bounded to prevent starvation).
    ///
    /// Commands queued ahead of a shutdown are still collected, so the
    /// caller should apply them before honouring `Exit`.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.events.clear();
        let mut drained = 0;

        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(HostEvent::Control(event)) => {
                    self.events.push(event);
                    drained += 1;
                }
                Ok(HostEvent::Shutdown) => return TickControl::Exit,
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!("Event queue backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Returns collected control events for this frame.
    #[cfg(test)]
    pub(crate) fn events(&self) -> &[ControlEvent] {
        &self.events
    }

    /// Takes ownership of collected control events, leaving an empty vec.
    pub(crate) fn take_events(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn collect_handles_empty_queue() {
        let (_tx, rx) = unbounded::<HostEvent>();
        let mut collector = EventCollector::new(rx);

        let result = collector.collect_frame();

        assert_eq!(result, TickControl::Continue);
        assert!(collector.events().is_empty());
    }

    #[test]
    fn collect_keeps_send_order() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(HostEvent::Control(ControlEvent::StartGame)).unwrap();
        tx.send(HostEvent::Control(ControlEvent::PlayerHit)).unwrap();

        let result = collector.collect_frame();

        assert_eq!(result, TickControl::Continue);
        assert_eq!(
            collector.events(),
            &[ControlEvent::StartGame, ControlEvent::PlayerHit]
        );
    }

    #[test]
    fn collect_returns_exit_on_shutdown_with_prior_events() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(HostEvent::Control(ControlEvent::Restart)).unwrap();
        tx.send(HostEvent::Shutdown).unwrap();

        let result = collector.collect_frame();

        assert_eq!(result, TickControl::Exit);
        assert_eq!(collector.take_events(), vec![ControlEvent::Restart]);
    }

    #[test]
    fn collect_is_bounded_per_frame() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        for _ in 0..MAX_EVENTS_PER_FRAME + 5 {
            tx.send(HostEvent::Control(ControlEvent::PlayerHit)).unwrap();
        }

        collector.collect_frame();
        assert_eq!(collector.events().len(), MAX_EVENTS_PER_FRAME);

        collector.collect_frame();
        assert_eq!(collector.events().len(), 5);
    }

    #[test]
    fn collect_returns_exit_on_disconnect() {
        let (tx, rx) = unbounded::<HostEvent>();
        let mut collector = EventCollector::new(rx);

        drop(tx);

        let result = collector.collect_frame();

        assert_eq!(result, TickControl::Exit);
    }
}
