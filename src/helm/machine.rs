//! The maneuver state machine
//!
//! Owns the helm's maneuver state, the active navigation context and the
//! short-term command memory. All state changes go through the validated
//! [`HelmStateMachine::transition`]; the single sanctioned bypass is
//! [`HelmStateMachine::force_idle`] (emergency stop, disengage, lost-target
//! abort). Per-state timing uses an elapsed-time accumulator advanced by
//! `tick(dt)`, never a blocking wait, so the polling loop stays responsive
//! mid-maneuver.

use tracing::{debug, info, warn};

use bridgelink_shared::state::is_valid_transition;
use bridgelink_shared::{helm, CruiseLevel, ManeuverState, TransitionError};

use super::actuator::{HelmActuator, TargetHandle};

/// Active navigation sequence; exists from Aligning through WarpExiting
#[derive(Debug, Clone)]
pub struct NavigationContext {
    pub target: TargetHandle,
    pub display_name: String,
    pub factor: f32,
    /// Distance on the previous transit tick, for closest-approach detection
    pub last_distance: Option<f32>,
}

/// Context from previous commands, read by contextual follow-ups
#[derive(Debug, Clone, Default)]
pub struct ShortTermMemory {
    pub last_destination: Option<String>,
    pub last_warp_factor: Option<f32>,
}

pub struct HelmStateMachine {
    state: ManeuverState,
    /// Seconds spent in the current state
    state_elapsed: f32,
    nav: Option<NavigationContext>,
    maneuver_label: Option<String>,
    cruise: CruiseLevel,
    memory: ShortTermMemory,
    /// Velocity fraction retained by an emergency stop
    damping_retain: f32,
    announcements: Vec<String>,
}

impl HelmStateMachine {
    pub fn new(damping_retain: f32) -> Self {
        Self {
            state: ManeuverState::Idle,
            state_elapsed: 0.0,
            nav: None,
            maneuver_label: None,
            cruise: CruiseLevel::Stop,
            memory: ShortTermMemory::default(),
            damping_retain,
            announcements: Vec::new(),
        }
    }

    pub fn state(&self) -> ManeuverState {
        self.state
    }

    pub fn cruise(&self) -> CruiseLevel {
        self.cruise
    }

    pub fn memory(&self) -> &ShortTermMemory {
        &self.memory
    }

    /// The course currently being flown, if a navigation sequence is active
    pub fn active_course(&self) -> Option<(&str, f32)> {
        self.nav.as_ref().map(|n| (n.display_name.as_str(), n.factor))
    }

    /// Drain announcements produced since the last call
    pub fn take_announcements(&mut self) -> Vec<String> {
        std::mem::take(&mut self.announcements)
    }

    /// Request a validated state change
    pub fn transition(&mut self, to: ManeuverState) -> Result<(), TransitionError> {
        if !is_valid_transition(self.state, to) {
            warn!("refused transition: {} -> {}", self.state, to);
            return Err(TransitionError {
                from: self.state,
                to,
            });
        }
        debug!("transition: {} -> {}", self.state, to);
        self.state = to;
        self.state_elapsed = 0.0;
        Ok(())
    }

    /// Table-internal state advance; legality is guaranteed by the tick logic
    fn advance(&mut self, to: ManeuverState) {
        if let Err(e) = self.transition(to) {
            warn!("tick produced an illegal advance: {e}");
        }
    }

    /// Forced return to Idle, bypassing the transition table
    ///
    /// The only sanctioned bypass: emergency stop and disengage commands, and
    /// mid-maneuver aborts when the target reference dies. Disengages transit
    /// if engaged; `damp` applies the tunable velocity damping.
    pub fn force_idle(&mut self, actuator: &mut dyn HelmActuator, damp: bool) {
        if actuator.is_in_transit() {
            actuator.end_high_speed_transit();
        }
        if damp {
            actuator.emergency_damp(self.damping_retain);
        }
        // The actuator's cruise setting must track the reset below
        if self.cruise != CruiseLevel::Stop {
            actuator.set_cruise_level(CruiseLevel::Stop);
        }
        if self.state != ManeuverState::Idle {
            info!("forced to idle from {}", self.state);
        }
        self.state = ManeuverState::Idle;
        self.state_elapsed = 0.0;
        self.nav = None;
        self.maneuver_label = None;
        self.cruise = CruiseLevel::Stop;
    }

    // --- Command predicates, consulted before any transition attempt ---

    pub fn can_navigate(&self, actuator: &dyn HelmActuator) -> Result<(), String> {
        if self.state.is_busy() {
            return Err(format!("helm is busy ({})", self.state));
        }
        if actuator.is_in_transit() {
            return Err("already at warp; disengage first".into());
        }
        Ok(())
    }

    pub fn can_turn(&self) -> Result<(), String> {
        if self.state.is_busy() {
            return Err(format!("helm is busy ({})", self.state));
        }
        Ok(())
    }

    pub fn can_set_cruise(&self) -> Result<(), String> {
        if self.state.is_busy() {
            return Err(format!("cannot change impulse while {}", self.state));
        }
        Ok(())
    }

    // --- Command entry points ---

    /// Accept a navigation command and begin the alignment stage
    ///
    /// `remember` controls whether the destination name is written to
    /// short-term memory (named targets yes, raw coordinates no). Memory is
    /// only updated here, once the command is accepted and begins executing.
    pub fn begin_navigation(
        &mut self,
        actuator: &mut dyn HelmActuator,
        target: TargetHandle,
        display_name: String,
        factor: f32,
        remember: bool,
    ) -> Result<String, String> {
        self.can_navigate(actuator)?;

        let max = actuator.max_speed_factor();
        if factor > max {
            return Err(format!("maximum sustainable warp is {max}"));
        }
        if let Some(guard) = actuator.proximity_guard() {
            if guard.is_violated() {
                return Err("too close to a massive body for high-speed maneuvers".into());
            }
        }

        self.transition(ManeuverState::Aligning)
            .map_err(|e| e.to_string())?;

        if remember {
            self.memory.last_destination = Some(display_name.clone());
        }
        self.memory.last_warp_factor = Some(factor);

        info!("course laid in for {display_name}, warp factor {factor}");
        self.nav = Some(NavigationContext {
            target,
            display_name: display_name.clone(),
            factor,
            last_distance: None,
        });
        Ok(format!("Course laid in for {display_name}, warp factor {factor}"))
    }

    /// Re-trim the active transit factor (contextual "increase speed")
    ///
    /// With no explicit factor, steps one factor toward the vehicle maximum.
    pub fn set_transit_factor(
        &mut self,
        actuator: &mut dyn HelmActuator,
        requested: Option<f32>,
    ) -> Result<String, String> {
        if self.state != ManeuverState::AtWarp {
            return Err(format!("not at warp ({})", self.state));
        }
        let nav = self.nav.as_mut().ok_or("no active course")?;

        let max = actuator.max_speed_factor();
        let factor = requested.unwrap_or(nav.factor + 1.0).min(max);
        nav.factor = factor;
        self.memory.last_warp_factor = Some(factor);
        actuator.begin_high_speed_transit(factor);

        info!("transit re-trimmed to warp {factor}");
        Ok(format!("Increasing to warp {factor}"))
    }

    /// Apply a discretized cruise level, entering or leaving Impulse as needed
    pub fn set_cruise(
        &mut self,
        actuator: &mut dyn HelmActuator,
        level: CruiseLevel,
    ) -> Result<String, String> {
        self.can_set_cruise()?;

        match (self.state, level) {
            (ManeuverState::Idle, CruiseLevel::Stop) => {}
            (ManeuverState::Idle, _) => self
                .transition(ManeuverState::Impulse)
                .map_err(|e| e.to_string())?,
            (ManeuverState::Impulse, CruiseLevel::Stop) => self
                .transition(ManeuverState::Idle)
                .map_err(|e| e.to_string())?,
            (ManeuverState::Impulse, _) => {}
            // can_set_cruise already excluded busy states
            (other, _) => return Err(format!("cannot change impulse while {other}")),
        }

        self.cruise = level;
        actuator.set_cruise_level(level);
        info!("cruise set: {}", level.as_str());
        Ok(format!("Answering {}", level.as_str()))
    }

    /// Begin a bounded-duration turn or orbit hold
    pub fn begin_maneuver(&mut self, label: String) -> Result<String, String> {
        self.can_turn()?;
        self.transition(ManeuverState::Maneuvering)
            .map_err(|e| e.to_string())?;
        info!("maneuver started: {label}");
        let message = format!("Executing {label}");
        self.maneuver_label = Some(label);
        Ok(message)
    }

    /// Universal, unconditional stop; legal and idempotent from every state
    pub fn emergency_stop(&mut self, actuator: &mut dyn HelmActuator) -> String {
        let was_in_transit = actuator.is_in_transit();
        self.force_idle(actuator, true);
        if was_in_transit {
            "All stop. Warp disengaged.".into()
        } else {
            "All stop.".into()
        }
    }

    /// Drop out of the transit sequence without the emergency damp
    pub fn disengage(&mut self, actuator: &mut dyn HelmActuator) -> String {
        if matches!(
            self.state,
            ManeuverState::Aligning
                | ManeuverState::WarpCharging
                | ManeuverState::AtWarp
                | ManeuverState::WarpExiting
        ) {
            self.force_idle(actuator, false);
            "Warp disengaged; coasting at sublight.".into()
        } else {
            "Nothing to disengage.".into()
        }
    }

    /// Advance per-state time-based behavior by `dt` seconds
    pub fn tick(&mut self, dt: f32, actuator: &mut dyn HelmActuator) {
        self.state_elapsed += dt;

        match self.state {
            ManeuverState::Idle | ManeuverState::Impulse => {}

            ManeuverState::Aligning => {
                let Some(nav) = self.nav.clone() else {
                    warn!("aligning with no navigation context");
                    self.force_idle(actuator, false);
                    return;
                };
                let step = helm::ALIGN_RATE_RAD_PER_SEC * dt;
                match actuator.set_heading_towards(nav.target, step) {
                    None => self.abort_navigation(actuator, &nav.display_name),
                    Some(remaining) if remaining <= helm::ALIGN_COMPLETE_RAD => {
                        debug!("aligned on {}; charging warp drive", nav.display_name);
                        self.advance(ManeuverState::WarpCharging);
                    }
                    Some(_) => {}
                }
            }

            ManeuverState::WarpCharging => {
                if self.state_elapsed >= helm::WARP_SPINUP_SECS {
                    if let Some(nav) = &self.nav {
                        actuator.begin_high_speed_transit(nav.factor);
                        self.announcements.push(format!("Warp {} engaged", nav.factor));
                        self.advance(ManeuverState::AtWarp);
                    } else {
                        warn!("warp charge completed with no navigation context");
                        self.force_idle(actuator, false);
                    }
                }
            }

            ManeuverState::AtWarp => {
                let Some(nav) = self.nav.as_mut() else {
                    warn!("at warp with no navigation context");
                    self.force_idle(actuator, false);
                    return;
                };
                match actuator.distance_to(nav.target) {
                    None => {
                        let name = nav.display_name.clone();
                        self.abort_navigation(actuator, &name);
                    }
                    Some(d) => {
                        // A single high-factor tick can step over the whole
                        // arrival window; a growing distance means closest
                        // approach has passed and counts as arrival too.
                        let passed = nav.last_distance.is_some_and(|prev| d > prev);
                        nav.last_distance = Some(d);
                        if d <= helm::ARRIVAL_THRESHOLD || passed {
                            debug!("within arrival range of {}", nav.display_name);
                            actuator.end_high_speed_transit();
                            self.advance(ManeuverState::WarpExiting);
                        }
                    }
                }
            }

            ManeuverState::WarpExiting => {
                if self.state_elapsed >= helm::WARP_EXIT_COOLDOWN_SECS {
                    if let Some(nav) = &self.nav {
                        self.announcements
                            .push(format!("Arrived at {}", nav.display_name));
                        info!("arrived at {}", nav.display_name);
                    }
                    self.nav = None;
                    self.advance(ManeuverState::Idle);
                }
            }

            ManeuverState::Maneuvering => {
                if self.state_elapsed >= helm::MANEUVER_HOLD_SECS {
                    let label = self.maneuver_label.take();
                    self.announcements.push(match label {
                        Some(l) => format!("Maneuver complete: {l}"),
                        None => "Maneuver complete".into(),
                    });
                    self.advance(ManeuverState::Idle);
                }
            }
        }
    }

    /// Abort a navigation sequence whose target reference died
    fn abort_navigation(&mut self, actuator: &mut dyn HelmActuator, name: &str) {
        warn!("target {name} lost; aborting course");
        self.announcements
            .push(format!("Unable to comply: {name} is no longer on sensors. Aborting course."));
        self.force_idle(actuator, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Scripted actuator that records every call the helm makes
    struct MockActuator {
        targets: HashMap<String, TargetHandle>,
        /// Remaining alignment angle, reduced by each steering step
        remaining_angle: f32,
        /// Distance to any live target
        distance: f32,
        /// Handles reported as dead
        dead: Vec<TargetHandle>,
        in_transit: bool,
        max_factor: f32,
        guard: Option<super::super::actuator::ProximityGuard>,
        transit_begun: Vec<f32>,
        transit_ended: u32,
        cruise_levels: Vec<CruiseLevel>,
        damp_calls: Vec<f32>,
        next_handle: u32,
    }

    impl MockActuator {
        fn new() -> Self {
            let mut targets = HashMap::new();
            targets.insert("Mars".to_string(), TargetHandle(1));
            targets.insert("Earth".to_string(), TargetHandle(2));
            Self {
                targets,
                remaining_angle: 1.0,
                distance: 1_000_000.0,
                dead: Vec::new(),
                in_transit: false,
                max_factor: 9.5,
                guard: None,
                transit_begun: Vec::new(),
                transit_ended: 0,
                cruise_levels: Vec::new(),
                damp_calls: Vec::new(),
                next_handle: 100,
            }
        }
    }

    impl HelmActuator for MockActuator {
        fn resolve_target(&mut self, name: &str) -> Option<TargetHandle> {
            self.targets.get(name).copied()
        }

        fn resolve_point(&mut self, _position: glam::Vec3) -> TargetHandle {
            self.next_handle += 1;
            TargetHandle(self.next_handle)
        }

        fn set_heading_towards(&mut self, target: TargetHandle, max_step: f32) -> Option<f32> {
            if self.dead.contains(&target) {
                return None;
            }
            self.remaining_angle = (self.remaining_angle - max_step).max(0.0);
            Some(self.remaining_angle)
        }

        fn begin_high_speed_transit(&mut self, factor: f32) {
            self.in_transit = true;
            self.transit_begun.push(factor);
        }

        fn end_high_speed_transit(&mut self) {
            self.in_transit = false;
            self.transit_ended += 1;
        }

        fn set_cruise_level(&mut self, level: CruiseLevel) {
            self.cruise_levels.push(level);
        }

        fn emergency_damp(&mut self, retain: f32) {
            self.damp_calls.push(retain);
        }

        fn distance_to(&self, target: TargetHandle) -> Option<f32> {
            if self.dead.contains(&target) {
                None
            } else {
                Some(self.distance)
            }
        }

        fn max_speed_factor(&self) -> f32 {
            self.max_factor
        }

        fn is_in_transit(&self) -> bool {
            self.in_transit
        }

        fn proximity_guard(&self) -> Option<super::super::actuator::ProximityGuard> {
            self.guard
        }
    }

    fn machine() -> HelmStateMachine {
        HelmStateMachine::new(helm::DEFAULT_STOP_DAMPING_RETAIN)
    }

    fn lay_in_course(fsm: &mut HelmStateMachine, act: &mut MockActuator, factor: f32) {
        let handle = act.resolve_target("Mars").expect("Mars should resolve");
        fsm.begin_navigation(act, handle, "Mars".into(), factor, true)
            .expect("course should be accepted");
    }

    /// Run ticks until the state changes or the budget runs out
    fn tick_until(
        fsm: &mut HelmStateMachine,
        act: &mut MockActuator,
        dt: f32,
        expect: ManeuverState,
    ) {
        for _ in 0..1000 {
            fsm.tick(dt, act);
            if fsm.state() == expect {
                return;
            }
        }
        panic!("never reached {expect}, stuck in {}", fsm.state());
    }

    #[test]
    fn test_full_warp_sequence() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        let dt = 1.0 / 30.0;

        lay_in_course(&mut fsm, &mut act, 5.0);
        assert_eq!(fsm.state(), ManeuverState::Aligning);

        tick_until(&mut fsm, &mut act, dt, ManeuverState::WarpCharging);
        tick_until(&mut fsm, &mut act, dt, ManeuverState::AtWarp);
        assert_eq!(act.transit_begun, vec![5.0]);

        // Close on the target, then watch the exit
        act.distance = helm::ARRIVAL_THRESHOLD - 1.0;
        tick_until(&mut fsm, &mut act, dt, ManeuverState::WarpExiting);
        assert_eq!(act.transit_ended, 1);

        tick_until(&mut fsm, &mut act, dt, ManeuverState::Idle);
        assert!(fsm.active_course().is_none());

        let arrivals: Vec<_> = fsm
            .take_announcements()
            .into_iter()
            .filter(|a| a.contains("Arrived at Mars"))
            .collect();
        assert_eq!(arrivals.len(), 1, "exactly one arrival announcement");

        // Memory updated when the command began executing
        assert_eq!(fsm.memory().last_destination.as_deref(), Some("Mars"));
        assert_eq!(fsm.memory().last_warp_factor, Some(5.0));
    }

    #[test]
    fn test_stop_succeeds_from_every_state() {
        let dt = 1.0 / 30.0;
        for target_state in [
            ManeuverState::Idle,
            ManeuverState::Aligning,
            ManeuverState::WarpCharging,
            ManeuverState::AtWarp,
        ] {
            let mut fsm = machine();
            let mut act = MockActuator::new();
            if target_state != ManeuverState::Idle {
                lay_in_course(&mut fsm, &mut act, 5.0);
                if target_state != ManeuverState::Aligning {
                    tick_until(&mut fsm, &mut act, dt, ManeuverState::WarpCharging);
                }
                if target_state == ManeuverState::AtWarp {
                    tick_until(&mut fsm, &mut act, dt, ManeuverState::AtWarp);
                }
            }
            assert_eq!(fsm.state(), target_state);

            let was_in_transit = act.in_transit;
            fsm.emergency_stop(&mut act);
            assert_eq!(fsm.state(), ManeuverState::Idle);
            assert!(!act.in_transit, "transit must be disengaged by stop");
            if was_in_transit {
                assert_eq!(act.transit_ended, 1);
            }
            assert_eq!(act.damp_calls.last(), Some(&helm::DEFAULT_STOP_DAMPING_RETAIN));
        }
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        let first = fsm.emergency_stop(&mut act);
        let second = fsm.emergency_stop(&mut act);
        assert_eq!(fsm.state(), ManeuverState::Idle);
        assert_eq!(first, "All stop.");
        assert_eq!(second, "All stop.");
    }

    #[test]
    fn test_navigate_rejected_while_busy() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        lay_in_course(&mut fsm, &mut act, 5.0);

        let handle = act.resolve_target("Earth").unwrap();
        let err = fsm
            .begin_navigation(&mut act, handle, "Earth".into(), 3.0, true)
            .unwrap_err();
        assert!(err.contains("busy"), "reason should cite busy: {err}");
        assert_eq!(fsm.state(), ManeuverState::Aligning);
    }

    #[test]
    fn test_navigate_rejected_above_vehicle_maximum() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        act.max_factor = 8.0;
        let handle = act.resolve_target("Mars").unwrap();
        let err = fsm
            .begin_navigation(&mut act, handle, "Mars".into(), 9.0, true)
            .unwrap_err();
        assert!(err.contains("maximum"), "{err}");
        assert_eq!(fsm.state(), ManeuverState::Idle);
    }

    #[test]
    fn test_proximity_guard_blocks_navigation() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        act.guard = Some(super::super::actuator::ProximityGuard {
            distance: 100.0,
            min_radius: 500.0,
        });
        let handle = act.resolve_target("Mars").unwrap();
        assert!(fsm
            .begin_navigation(&mut act, handle, "Mars".into(), 5.0, true)
            .is_err());
        assert_eq!(fsm.state(), ManeuverState::Idle);
    }

    #[test]
    fn test_lost_target_aborts_to_idle() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        let dt = 1.0 / 30.0;
        lay_in_course(&mut fsm, &mut act, 5.0);

        act.dead.push(TargetHandle(1));
        fsm.tick(dt, &mut act);

        assert_eq!(fsm.state(), ManeuverState::Idle);
        assert!(fsm.active_course().is_none());
        let notes = fsm.take_announcements();
        assert!(notes.iter().any(|a| a.contains("no longer on sensors")));
    }

    #[test]
    fn test_impulse_levels_and_transitions() {
        let mut fsm = machine();
        let mut act = MockActuator::new();

        let msg = fsm.set_cruise(&mut act, CruiseLevel::Half).unwrap();
        assert!(msg.contains("half impulse"));
        assert_eq!(fsm.state(), ManeuverState::Impulse);

        // Re-trim within impulse (no self-transition involved)
        fsm.set_cruise(&mut act, CruiseLevel::Full).unwrap();
        assert_eq!(fsm.state(), ManeuverState::Impulse);
        assert_eq!(fsm.cruise(), CruiseLevel::Full);

        fsm.set_cruise(&mut act, CruiseLevel::Stop).unwrap();
        assert_eq!(fsm.state(), ManeuverState::Idle);
        assert_eq!(
            act.cruise_levels,
            vec![CruiseLevel::Half, CruiseLevel::Full, CruiseLevel::Stop]
        );
    }

    #[test]
    fn test_impulse_rejected_while_in_warp_sequence() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        lay_in_course(&mut fsm, &mut act, 5.0);

        let err = fsm.set_cruise(&mut act, CruiseLevel::Full).unwrap_err();
        assert!(err.contains("aligning"), "{err}");
        assert_eq!(fsm.state(), ManeuverState::Aligning);
    }

    #[test]
    fn test_navigation_legal_from_impulse() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        fsm.set_cruise(&mut act, CruiseLevel::Half).unwrap();

        lay_in_course(&mut fsm, &mut act, 4.0);
        assert_eq!(fsm.state(), ManeuverState::Aligning);
    }

    #[test]
    fn test_maneuver_expires_back_to_idle() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        let dt = 0.5;

        fsm.begin_maneuver("evasive pattern alpha".into()).unwrap();
        assert_eq!(fsm.state(), ManeuverState::Maneuvering);

        tick_until(&mut fsm, &mut act, dt, ManeuverState::Idle);
        let notes = fsm.take_announcements();
        assert!(notes.iter().any(|a| a.contains("evasive pattern alpha")));
    }

    #[test]
    fn test_increase_speed_at_warp_clamps_to_maximum() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        let dt = 1.0 / 30.0;
        act.max_factor = 9.0;

        lay_in_course(&mut fsm, &mut act, 8.5);
        tick_until(&mut fsm, &mut act, dt, ManeuverState::WarpCharging);
        tick_until(&mut fsm, &mut act, dt, ManeuverState::AtWarp);

        let msg = fsm.set_transit_factor(&mut act, None).unwrap();
        assert!(msg.contains("9"), "{msg}");
        assert_eq!(act.transit_begun.last(), Some(&9.0));
        assert_eq!(fsm.memory().last_warp_factor, Some(9.0));
    }

    #[test]
    fn test_increase_speed_rejected_when_not_at_warp() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        let err = fsm.set_transit_factor(&mut act, Some(7.0)).unwrap_err();
        assert!(err.contains("not at warp"), "{err}");
    }

    #[test]
    fn test_disengage_skips_the_damp() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        let dt = 1.0 / 30.0;
        lay_in_course(&mut fsm, &mut act, 5.0);
        tick_until(&mut fsm, &mut act, dt, ManeuverState::WarpCharging);
        tick_until(&mut fsm, &mut act, dt, ManeuverState::AtWarp);

        let msg = fsm.disengage(&mut act);
        assert!(msg.contains("disengaged"), "{msg}");
        assert_eq!(fsm.state(), ManeuverState::Idle);
        assert!(!act.in_transit);
        assert!(act.damp_calls.is_empty(), "disengage must not damp");

        let msg = fsm.disengage(&mut act);
        assert_eq!(msg, "Nothing to disengage.");
    }

    #[test]
    fn test_overshooting_the_arrival_window_still_arrives() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        let dt = 1.0 / 30.0;
        lay_in_course(&mut fsm, &mut act, 9.0);
        tick_until(&mut fsm, &mut act, dt, ManeuverState::WarpCharging);
        tick_until(&mut fsm, &mut act, dt, ManeuverState::AtWarp);

        // Fast transit: each tick covers far more than the arrival window,
        // so the distance never dips under the threshold before it grows
        act.distance = 500_000.0;
        fsm.tick(dt, &mut act);
        assert_eq!(fsm.state(), ManeuverState::AtWarp);

        act.distance = 40_000.0;
        fsm.tick(dt, &mut act);
        assert_eq!(fsm.state(), ManeuverState::AtWarp, "still closing");

        act.distance = 110_000.0; // past closest approach
        fsm.tick(dt, &mut act);
        assert_eq!(fsm.state(), ManeuverState::WarpExiting);
        assert_eq!(act.transit_ended, 1);

        tick_until(&mut fsm, &mut act, dt, ManeuverState::Idle);
        let arrivals = fsm
            .take_announcements()
            .into_iter()
            .filter(|a| a.contains("Arrived at Mars"))
            .count();
        assert_eq!(arrivals, 1);
    }

    #[test]
    fn test_stop_before_warp_engages_reports_plain_stop() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        let dt = 1.0 / 30.0;

        lay_in_course(&mut fsm, &mut act, 5.0);
        assert_eq!(fsm.state(), ManeuverState::Aligning);
        assert_eq!(fsm.emergency_stop(&mut act), "All stop.");

        lay_in_course(&mut fsm, &mut act, 5.0);
        tick_until(&mut fsm, &mut act, dt, ManeuverState::WarpCharging);
        tick_until(&mut fsm, &mut act, dt, ManeuverState::AtWarp);
        assert_eq!(fsm.emergency_stop(&mut act), "All stop. Warp disengaged.");
    }

    #[test]
    fn test_disengage_pushes_stop_to_the_actuator() {
        let mut fsm = machine();
        let mut act = MockActuator::new();
        fsm.set_cruise(&mut act, CruiseLevel::Half).unwrap();
        lay_in_course(&mut fsm, &mut act, 5.0);

        fsm.disengage(&mut act);
        assert_eq!(fsm.state(), ManeuverState::Idle);
        assert_eq!(fsm.cruise(), CruiseLevel::Stop);
        // The actuator must agree with the reported cruise state
        assert_eq!(
            act.cruise_levels,
            vec![CruiseLevel::Half, CruiseLevel::Stop]
        );
        assert!(act.damp_calls.is_empty());
    }

    #[test]
    fn test_direct_illegal_transition_refused() {
        let mut fsm = machine();
        let err = fsm.transition(ManeuverState::AtWarp).unwrap_err();
        assert_eq!(err.from, ManeuverState::Idle);
        assert_eq!(err.to, ManeuverState::AtWarp);
        assert_eq!(fsm.state(), ManeuverState::Idle);
    }
}
