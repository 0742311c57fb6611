use std::sync::Mutex;

/// Lifecycle of the single record slot an assistant function writes into.
#[derive(Debug, Clone, PartialEq)]
enum SlotState<T> {
    /// Nothing captured since the last merge.
    Idle,
    /// A record was produced and awaits its one merge.
    Captured(T),
    /// The record was merged; re-capturing the same value is a no-op.
    Merged(T),
}

/// Single-slot holder bridging an assistant function call to the owning
/// list.
///
/// A function call writes a record with [`capture`](CaptureSlot::capture);
/// the merge bridge drains it with [`take_new`](CaptureSlot::take_new),
/// which yields each distinct captured value exactly once. Capturing a
/// value structurally equal to the slot's current payload does not
/// re-arm the slot, so an unchanged record is never merged twice.
#[derive(Debug)]
pub struct CaptureSlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T: Clone + PartialEq> CaptureSlot<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Idle),
        }
    }

    /// Record a newly produced value. No-op when it equals the current
    /// payload.
    pub fn capture(&self, item: T) {
        let mut state = self.state.lock().expect("capture slot lock");
        let unchanged = matches!(
            &*state,
            SlotState::Captured(current) | SlotState::Merged(current) if *current == item
        );
        if !unchanged {
            *state = SlotState::Captured(item);
        }
    }

    /// Take the pending value, exactly once per distinct capture.
    pub fn take_new(&self) -> Option<T> {
        let mut state = self.state.lock().expect("capture slot lock");
        if let SlotState::Captured(item) = &*state {
            let item = item.clone();
            *state = SlotState::Merged(item.clone());
            return Some(item);
        }
        None
    }

    pub fn is_idle(&self) -> bool {
        matches!(*self.state.lock().expect("capture slot lock"), SlotState::Idle)
    }
}

impl<T: Clone + PartialEq> Default for CaptureSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Append the slot's pending record to the owning list, exactly once.
/// Returns whether anything was merged.
pub fn merge_pending<T: Clone + PartialEq>(slot: &CaptureSlot<T>, list: &mut Vec<T>) -> bool {
    match slot.take_new() {
        Some(item) => {
            list.push(item);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Allergy;

    fn peanuts() -> Allergy {
        Allergy::new("Peanuts", vec!["Hives".into()])
    }

    #[test]
    fn starts_idle() {
        let slot: CaptureSlot<Allergy> = CaptureSlot::new();
        assert!(slot.is_idle());
        assert!(slot.take_new().is_none());
    }

    #[test]
    fn capture_then_take_yields_once() {
        let slot = CaptureSlot::new();
        slot.capture(peanuts());
        assert_eq!(slot.take_new(), Some(peanuts()));
        assert!(slot.take_new().is_none());
    }

    #[test]
    fn same_value_twice_merges_once() {
        let slot = CaptureSlot::new();
        let mut list = Vec::new();

        slot.capture(peanuts());
        assert!(merge_pending(&slot, &mut list));

        // Unchanged record: no state transition, no second merge.
        slot.capture(peanuts());
        assert!(!merge_pending(&slot, &mut list));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn distinct_value_re_arms_the_slot() {
        let slot = CaptureSlot::new();
        let mut list = Vec::new();

        slot.capture(peanuts());
        merge_pending(&slot, &mut list);

        slot.capture(Allergy::new("Shellfish", vec!["Swelling".into()]));
        assert!(merge_pending(&slot, &mut list));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn recapture_before_merge_keeps_latest() {
        let slot = CaptureSlot::new();
        slot.capture(peanuts());
        slot.capture(Allergy::new("Shellfish", vec![]));
        assert_eq!(slot.take_new().unwrap().name, "Shellfish");
        assert!(slot.take_new().is_none());
    }
}
