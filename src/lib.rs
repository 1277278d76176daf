//! Modified Voltage Potential conflict-resolution engine and free-to-revert
//! recovery logic for an air-traffic simulator.
//!
//! This crate implements one simulation tick's worth of conflict
//! resolution: given a traffic snapshot and a batch of detected conflicts,
//! it computes track/airspeed/vertical-speed/altitude commands that
//! geometrically resolve them, and separately decides, per aircraft, when
//! control may be released back to the autopilot. It does not detect
//! conflicts, fly aircraft, or negotiate with other agents — see the
//! `collab` module for the external seams this crate depends on.

pub mod aggregate;
pub mod collab;
pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod priority;
pub mod recovery;
pub mod state;

use collab::{ConflictBatch, PerformanceLimiter, RouteService, TrafficSnapshot, WindService};
use command::ResolvedCommand;
use config::{CommandSurface, ResolverConfig};
use state::EngagementState;

/// Owns the engagement state and switch configuration for one simulated
/// fleet. All resolver-owned mutable state (spec.md §3) lives here; callers
/// drive it once per tick via [`Resolver::resolve`] and
/// [`Resolver::resume_nav`].
#[derive(Debug)]
pub struct Resolver {
    switches: config::SwitchState,
    state: EngagementState,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        let mut state = EngagementState::new();
        state.resofach = config.resofach;
        state.resofacv = config.resofacv;
        Self { switches: config.switches, state }
    }

    pub fn switches(&self) -> &config::SwitchState {
        &self.switches
    }

    pub fn switches_mut(&mut self) -> &mut config::SwitchState {
        &mut self.switches
    }

    pub fn engagement_state(&self) -> &EngagementState {
        &self.state
    }

    /// Register a newly created aircraft (spec.md §4.G).
    pub fn create_aircraft(&mut self, id: state::AircraftId) {
        self.state.create(id);
    }

    /// Remove an aircraft and every engagement-state entry referencing it.
    pub fn delete_aircraft(&mut self, id: &str) {
        self.state.delete(id);
    }

    /// `NORESO <acid>` (spec.md §6.1): the aircraft is never avoided by
    /// others it intrudes on, but still avoids aircraft that intrude on it.
    pub fn set_noreso(&mut self, id: &str) -> (bool, String) {
        CommandSurface::noreso(&mut self.state, id)
    }

    /// `RESOOFF <acid>` (spec.md §6.1): the aircraft never receives a
    /// resolution command of its own.
    pub fn set_resooff(&mut self, id: &str) -> (bool, String) {
        CommandSurface::resooff(&mut self.state, id)
    }

    /// Run the geometry kernel, priority policy, and command synthesizer
    /// for one tick (spec.md §4.A-4.D), returning one command per aircraft
    /// in `traffic`'s index order.
    pub fn resolve(
        &mut self,
        traffic: &impl TrafficSnapshot,
        batch: &impl ConflictBatch,
        wind: &impl WindService,
        perf: &impl PerformanceLimiter,
        asas_dt_s: f64,
    ) -> Vec<ResolvedCommand> {
        let acc = aggregate::aggregate(batch, traffic, &mut self.state, &self.switches, asas_dt_s);
        command::synthesize(traffic, &acc, &self.switches, wind, perf, batch.dtlookahead_s())
    }

    /// Run the recovery state machine for one tick (spec.md §4.E).
    pub fn resume_nav(
        &mut self,
        traffic: &impl TrafficSnapshot,
        batch: &impl ConflictBatch,
        wind: &impl WindService,
        route: &mut impl RouteService,
    ) {
        recovery::resume_nav(traffic, batch, wind, route, &mut self.state);
    }
}
