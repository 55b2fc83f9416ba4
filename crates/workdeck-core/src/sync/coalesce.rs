//! Per-action coalescing state machine.
//!
//! One machine per [`ReloadAction`](crate::sync::ReloadAction). The
//! machine is pure: transitions take no time and perform no I/O, they
//! only tell the driver which effect to perform. The async driver in
//! `router.rs` owns the actual timer and store call, so this logic is
//! testable as a plain transition table.
//!
//! ```text
//! Idle           --trigger-->         TimerPending   (start timer)
//! TimerPending   --trigger-->         TimerPending   (coalesced, window does not slide)
//! TimerPending   --timer_elapsed-->   InFlight       (begin reload)
//! InFlight       --trigger-->         InFlightDirty
//! InFlightDirty  --trigger-->         InFlightDirty  (coalesced)
//! InFlight       --reload_finished--> Idle
//! InFlightDirty  --reload_finished--> TimerPending   (start timer)
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoalesceState {
    /// Nothing pending for this action.
    Idle,
    /// A quiet-period timer is running; further triggers are absorbed.
    TimerPending,
    /// A reload is executing.
    InFlight,
    /// A reload is executing and at least one trigger arrived meanwhile.
    InFlightDirty,
}

/// What the driver must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Arm a fresh quiet-period timer.
    StartTimer,
    /// Invoke the reload for this action.
    BeginReload,
}

#[derive(Debug)]
pub struct CoalesceMachine {
    state: CoalesceState,
}

impl CoalesceMachine {
    pub fn new() -> Self {
        Self {
            state: CoalesceState::Idle,
        }
    }

    pub fn state(&self) -> CoalesceState {
        self.state
    }

    /// A change was observed (file event or IPC notification).
    pub fn on_trigger(&mut self) -> Effect {
        match self.state {
            CoalesceState::Idle => {
                self.state = CoalesceState::TimerPending;
                Effect::StartTimer
            }
            CoalesceState::TimerPending => Effect::None,
            CoalesceState::InFlight => {
                self.state = CoalesceState::InFlightDirty;
                Effect::None
            }
            CoalesceState::InFlightDirty => Effect::None,
        }
    }

    /// The quiet-period timer fired.
    ///
    /// A fire in any state other than `TimerPending` is a stale timer and
    /// is ignored.
    pub fn on_timer_elapsed(&mut self) -> Effect {
        match self.state {
            CoalesceState::TimerPending => {
                self.state = CoalesceState::InFlight;
                Effect::BeginReload
            }
            _ => Effect::None,
        }
    }

    /// The reload invoked by [`Effect::BeginReload`] completed.
    pub fn on_reload_finished(&mut self) -> Effect {
        match self.state {
            CoalesceState::InFlight => {
                self.state = CoalesceState::Idle;
                Effect::None
            }
            CoalesceState::InFlightDirty => {
                self.state = CoalesceState::TimerPending;
                Effect::StartTimer
            }
            _ => Effect::None,
        }
    }
}

impl Default for CoalesceMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CoalesceState::*;

    #[test]
    fn test_trigger_from_idle_starts_timer() {
        let mut machine = CoalesceMachine::new();
        assert_eq!(machine.on_trigger(), Effect::StartTimer);
        assert_eq!(machine.state(), TimerPending);
    }

    #[test]
    fn test_triggers_during_pending_timer_coalesce() {
        let mut machine = CoalesceMachine::new();
        machine.on_trigger();
        // Burst of writes inside the quiet period: no extra timers
        assert_eq!(machine.on_trigger(), Effect::None);
        assert_eq!(machine.on_trigger(), Effect::None);
        assert_eq!(machine.state(), TimerPending);
    }

    #[test]
    fn test_timer_fire_begins_exactly_one_reload() {
        let mut machine = CoalesceMachine::new();
        machine.on_trigger();
        assert_eq!(machine.on_timer_elapsed(), Effect::BeginReload);
        assert_eq!(machine.state(), InFlight);
    }

    #[test]
    fn test_trigger_during_flight_marks_dirty() {
        let mut machine = CoalesceMachine::new();
        machine.on_trigger();
        machine.on_timer_elapsed();
        assert_eq!(machine.on_trigger(), Effect::None);
        assert_eq!(machine.state(), InFlightDirty);
        // Further triggers while dirty change nothing
        assert_eq!(machine.on_trigger(), Effect::None);
        assert_eq!(machine.state(), InFlightDirty);
    }

    #[test]
    fn test_clean_completion_returns_to_idle() {
        let mut machine = CoalesceMachine::new();
        machine.on_trigger();
        machine.on_timer_elapsed();
        assert_eq!(machine.on_reload_finished(), Effect::None);
        assert_eq!(machine.state(), Idle);
    }

    #[test]
    fn test_dirty_completion_rearms_timer() {
        let mut machine = CoalesceMachine::new();
        machine.on_trigger();
        machine.on_timer_elapsed();
        machine.on_trigger();
        assert_eq!(machine.on_reload_finished(), Effect::StartTimer);
        assert_eq!(machine.state(), TimerPending);
    }

    #[test]
    fn test_stale_events_are_ignored() {
        let mut machine = CoalesceMachine::new();
        assert_eq!(machine.on_timer_elapsed(), Effect::None);
        assert_eq!(machine.state(), Idle);
        assert_eq!(machine.on_reload_finished(), Effect::None);
        assert_eq!(machine.state(), Idle);

        machine.on_trigger();
        assert_eq!(machine.on_reload_finished(), Effect::None);
        assert_eq!(machine.state(), TimerPending);
    }

    #[test]
    fn test_burst_then_write_during_flight_yields_two_reloads() {
        // The re-trigger guarantee as a pure trace: N triggers before the
        // timer and one during flight produce exactly two reloads.
        let mut machine = CoalesceMachine::new();
        let mut reloads = 0;

        for _ in 0..5 {
            machine.on_trigger();
        }
        if machine.on_timer_elapsed() == Effect::BeginReload {
            reloads += 1;
        }
        machine.on_trigger();
        assert_eq!(machine.on_reload_finished(), Effect::StartTimer);
        if machine.on_timer_elapsed() == Effect::BeginReload {
            reloads += 1;
        }
        assert_eq!(machine.on_reload_finished(), Effect::None);

        assert_eq!(reloads, 2);
        assert_eq!(machine.state(), Idle);
    }
}
