use std::fmt;

/// Engine lifecycle notifications observable from outside.
///
/// These are the two events an autonomous controller must see to know that
/// any plan it holds is for a piece that no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A game was (re)started from a fresh board.
    GameStarted,
    /// A new falling piece was spawned after a completed drop.
    PieceSpawned,
}

/// Handle returned by subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(LifecycleEvent)>;

/// Registry of lifecycle observers.
///
/// Explicit subscribe/unsubscribe; observers are plain callbacks invoked
/// synchronously from the engine operation that caused the event.
pub(crate) struct LifecycleHooks {
    next_id: u64,
    observers: Vec<(ObserverId, Observer)>,
}

impl LifecycleHooks {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            observers: Vec::new(),
        }
    }

    pub(crate) fn subscribe(&mut self, observer: Observer) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) {
        self.observers.retain(|(observer_id, _)| *observer_id != id);
    }

    pub(crate) fn notify(&mut self, event: LifecycleEvent) {
        for (_, observer) in &mut self.observers {
            observer(event);
        }
    }
}

impl fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("observers", &self.observers.len())
            .finish()
    }
}
