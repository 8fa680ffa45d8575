// Single-occupancy gesture slot
//
// Starting a gesture hands out a subscription. Ending it through the slot,
// or simply dropping the subscription, releases the slot, so early returns
// and panics in the host cannot leave a gesture stuck.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chrono::NaiveDateTime;

use super::{GestureError, GestureKind, GestureState};
use crate::models::event::EventId;

#[derive(Debug)]
struct ActiveGesture {
    generation: u64,
    state: GestureState,
    last_activity: NaiveDateTime,
}

#[derive(Debug, Default)]
struct SlotInner {
    generation: u64,
    active: Option<ActiveGesture>,
    /// A subscription was dropped without an explicit end.
    abandoned: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GestureSlot {
    inner: Rc<RefCell<SlotInner>>,
}

/// Proof of an in-progress gesture. Pass it to pointer-move handling and
/// hand it back on pointer-up.
#[derive(Debug)]
pub struct GestureSubscription {
    slot: Weak<RefCell<SlotInner>>,
    generation: u64,
    event_id: EventId,
    kind: GestureKind,
    released: bool,
}

impl GestureSubscription {
    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    /// False once the gesture was ended by anyone (pointer-up, timeout,
    /// shutdown).
    pub fn is_live(&self) -> bool {
        let Some(inner) = self.slot.upgrade() else {
            return false;
        };
        let inner = inner.borrow();
        let live = inner
            .active
            .as_ref()
            .is_some_and(|active| active.generation == self.generation);
        live
    }
}

impl Drop for GestureSubscription {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let Some(inner) = self.slot.upgrade() else {
            return;
        };
        let Ok(mut inner) = inner.try_borrow_mut() else {
            return;
        };
        let matches = inner
            .active
            .as_ref()
            .is_some_and(|active| active.generation == self.generation);
        if matches {
            log::debug!("Gesture on event {} released by drop", self.event_id);
            inner.active = None;
            inner.abandoned = true;
        }
    }
}

impl GestureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupy the slot. Fails while another gesture is active.
    pub fn begin(
        &self,
        state: GestureState,
        now: NaiveDateTime,
    ) -> Result<GestureSubscription, GestureError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(active) = &inner.active {
            return Err(GestureError::AlreadyActive(active.state.event_id().clone()));
        }
        inner.generation += 1;
        let generation = inner.generation;
        let event_id = state.event_id().clone();
        let kind = state.kind();
        inner.active = Some(ActiveGesture {
            generation,
            state,
            last_activity: now,
        });
        Ok(GestureSubscription {
            slot: Rc::downgrade(&self.inner),
            generation,
            event_id,
            kind,
            released: false,
        })
    }

    pub fn is_active(&self) -> bool {
        self.inner.borrow().active.is_some()
    }

    pub fn active(&self) -> Option<GestureState> {
        self.inner
            .borrow()
            .active
            .as_ref()
            .map(|active| active.state.clone())
    }

    pub fn last_activity(&self) -> Option<NaiveDateTime> {
        self.inner
            .borrow()
            .active
            .as_ref()
            .map(|active| active.last_activity)
    }

    /// Record pointer activity for `subscription` and return its captured
    /// state. Stale subscriptions get `None`.
    pub fn touch(
        &self,
        subscription: &GestureSubscription,
        now: NaiveDateTime,
    ) -> Option<GestureState> {
        let mut inner = self.inner.borrow_mut();
        let active = inner
            .active
            .as_mut()
            .filter(|active| active.generation == subscription.generation)?;
        active.last_activity = now;
        Some(active.state.clone())
    }

    /// End the gesture owned by `subscription`.
    pub fn finish(&self, mut subscription: GestureSubscription) -> Option<GestureState> {
        subscription.released = true;
        let mut inner = self.inner.borrow_mut();
        let owns = inner
            .active
            .as_ref()
            .is_some_and(|active| active.generation == subscription.generation);
        if owns {
            inner.active.take().map(|active| active.state)
        } else {
            None
        }
    }

    /// End whatever gesture is active, leaving its subscription stale.
    pub fn force_end(&self) -> Option<GestureState> {
        self.inner
            .borrow_mut()
            .active
            .take()
            .map(|active| active.state)
    }

    /// Report (once) that a subscription was dropped without being finished.
    pub fn take_abandoned(&self) -> bool {
        std::mem::take(&mut self.inner.borrow_mut().abandoned)
    }
}
