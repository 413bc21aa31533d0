//! Events a duel reports to presentation layers
//!
//! Events are queued while an engine operation runs and dispatched in order
//! once it has finished, so an observer never sees a half-applied turn.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::duel::{DuelState, Side};
use crate::geometry::{Point, Rect};
use crate::validator::PlacementError;

/// Everything the engine reports
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DuelEvent {
    ShipsPlaced { side: Side, placements: Vec<Rect> },
    ShotResolved { position: Point, side: Side, is_hit: bool },
    ParticipantMessage { side: Side, text: String },
    ParticipantNamed { side: Side, name: String },
    StateChanged { state: DuelState },
    PlacementRejected { error: PlacementError, strategy_name: String },
    DuelFinished { winner_name: String, winner_side: Side },
}

impl DuelEvent {
    /// Route to the matching observer callback
    pub fn dispatch(&self, observer: &mut dyn DuelObserver) {
        match self {
            DuelEvent::ShipsPlaced { side, placements } => observer.on_ships_placed(placements, *side),
            DuelEvent::ShotResolved { position, side, is_hit } => {
                observer.on_shot_resolved(*position, *side, *is_hit)
            }
            DuelEvent::ParticipantMessage { side, text } => observer.on_participant_message(text, *side),
            DuelEvent::ParticipantNamed { side, name } => observer.on_participant_named(name, *side),
            DuelEvent::StateChanged { state } => observer.on_state_changed(*state),
            DuelEvent::PlacementRejected { error, strategy_name } => {
                observer.on_placement_rejected(*error, strategy_name)
            }
            DuelEvent::DuelFinished { winner_name, winner_side } => {
                observer.on_duel_finished(winner_name, *winner_side)
            }
        }
    }
}

/// Receiver of duel events; every callback defaults to a no-op
pub trait DuelObserver: Send {
    fn on_ships_placed(&mut self, _placements: &[Rect], _side: Side) {}
    /// `side` is the field that was fired at
    fn on_shot_resolved(&mut self, _position: Point, _side: Side, _is_hit: bool) {}
    fn on_participant_message(&mut self, _text: &str, _side: Side) {}
    fn on_participant_named(&mut self, _name: &str, _side: Side) {}
    fn on_state_changed(&mut self, _state: DuelState) {}
    fn on_placement_rejected(&mut self, _error: PlacementError, _strategy_name: &str) {}
    fn on_duel_finished(&mut self, _winner_name: &str, _winner_side: Side) {}
}

/// Observer that records every event; clones share the same log
#[derive(Clone, Debug, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<DuelEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of events recorded so far
    pub fn events(&self) -> Vec<DuelEvent> {
        self.lock().clone()
    }

    /// Remove and return recorded events
    pub fn take(&self) -> Vec<DuelEvent> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DuelEvent>> {
        // A poisoned log still holds valid events
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, event: DuelEvent) {
        self.lock().push(event);
    }
}

impl DuelObserver for EventRecorder {
    fn on_ships_placed(&mut self, placements: &[Rect], side: Side) {
        self.push(DuelEvent::ShipsPlaced {
            side,
            placements: placements.to_vec(),
        });
    }

    fn on_shot_resolved(&mut self, position: Point, side: Side, is_hit: bool) {
        self.push(DuelEvent::ShotResolved { position, side, is_hit });
    }

    fn on_participant_message(&mut self, text: &str, side: Side) {
        self.push(DuelEvent::ParticipantMessage {
            side,
            text: text.to_string(),
        });
    }

    fn on_participant_named(&mut self, name: &str, side: Side) {
        self.push(DuelEvent::ParticipantNamed {
            side,
            name: name.to_string(),
        });
    }

    fn on_state_changed(&mut self, state: DuelState) {
        self.push(DuelEvent::StateChanged { state });
    }

    fn on_placement_rejected(&mut self, error: PlacementError, strategy_name: &str) {
        self.push(DuelEvent::PlacementRejected {
            error,
            strategy_name: strategy_name.to_string(),
        });
    }

    fn on_duel_finished(&mut self, winner_name: &str, winner_side: Side) {
        self.push(DuelEvent::DuelFinished {
            winner_name: winner_name.to_string(),
            winner_side,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_reaches_recorder() {
        let recorder = EventRecorder::new();
        let mut observer = recorder.clone();
        let events = vec![
            DuelEvent::StateChanged { state: DuelState::Ready },
            DuelEvent::ShotResolved {
                position: Point::new(1, 2),
                side: Side::Right,
                is_hit: true,
            },
        ];
        for event in &events {
            event.dispatch(&mut observer);
        }
        assert_eq!(recorder.events(), events);
        assert_eq!(recorder.take().len(), 2);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_event_json_shape() {
        let event = DuelEvent::DuelFinished {
            winner_name: "Teapot".into(),
            winner_side: Side::Left,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "duel_finished");
        assert_eq!(json["winner_side"], "left");
    }
}
