//! Per-aircraft engagement state (spec.md §3 "Resolver engagement state",
//! §4.G "Per-aircraft arrays").
//!
//! `original_source/bluesky/traffic/asas/mvp.py` keeps these as parallel
//! numpy arrays registered with `self.settrafarrays()`, which BlueSky's
//! traffic core resizes in lock-step whenever aircraft are created or
//! deleted. There is no stable Rust equivalent of that runtime-registration
//! machinery in the teacher corpus, so this module reproduces the same
//! *contract* (every trailing-dimension-N array grows/shrinks together,
//! new entries are zero-initialized) with an explicit `EngagementState`
//! struct and an `ArcId`-style textual identifier instead of BlueSky's bare
//! array index, per spec.md §9's guidance to key `resopairs` on identifiers
//! rather than indices.

use std::collections::HashSet;

/// Stable aircraft identifier, as used by the simulator's traffic table.
pub type AircraftId = String;

/// An ordered conflict pair, keyed by identifier rather than array index so
/// it survives aircraft array resizes (spec.md §9 "no cyclic ownership").
pub type PairKey = (AircraftId, AircraftId);

/// Resolver-owned state that tracks, per aircraft, whether the resolver is
/// currently steering it and the reference velocity snapshot recovery needs.
///
/// Invariant (spec.md §3): `init_intruder_tas[i]` and `init_intruder_hdg[i]`
/// are either both zero or both non-zero.
#[derive(Debug, Clone, Default)]
pub struct EngagementState {
    ids: Vec<AircraftId>,
    active: Vec<bool>,
    init_intruder_tas: Vec<f64>,
    init_intruder_hdg: Vec<f64>,
    noresoac: Vec<bool>,
    resooffac: Vec<bool>,
    resopairs: HashSet<PairKey>,
    /// Scalar safety multiplier applied to horizontal protected-zone radii.
    pub resofach: f64,
    /// Scalar safety multiplier applied to vertical protected-zone half-thickness.
    pub resofacv: f64,
}

impl EngagementState {
    pub fn new() -> Self {
        Self {
            resofach: 1.0,
            resofacv: 1.0,
            ..Default::default()
        }
    }

    /// Number of aircraft currently tracked.
    pub fn ntraf(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> &[AircraftId] {
        &self.ids
    }

    /// Registration facility (spec.md §4.G): append a zero-initialized
    /// entry to every trailing-dimension-N array for a newly created
    /// aircraft. All resolver-owned columns grow together.
    pub fn create(&mut self, id: AircraftId) {
        self.ids.push(id);
        self.active.push(false);
        self.init_intruder_tas.push(0.0);
        self.init_intruder_hdg.push(0.0);
        self.noresoac.push(false);
        self.resooffac.push(false);
    }

    /// Remove an aircraft and every associated column entry; also drops any
    /// conflict pair referencing it from `resopairs`.
    pub fn delete(&mut self, id: &str) {
        if let Some(idx) = self.index_of(id) {
            self.ids.remove(idx);
            self.active.remove(idx);
            self.init_intruder_tas.remove(idx);
            self.init_intruder_hdg.remove(idx);
            self.noresoac.remove(idx);
            self.resooffac.remove(idx);
        }
        self.resopairs.retain(|(a, b)| a != id && b != id);
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|x| x == id)
    }

    pub fn is_active(&self, idx: usize) -> bool {
        self.active[idx]
    }

    pub fn set_active(&mut self, idx: usize, value: bool) {
        self.active[idx] = value;
    }

    pub fn init_intruder_tas(&self, idx: usize) -> f64 {
        self.init_intruder_tas[idx]
    }

    pub fn init_intruder_hdg(&self, idx: usize) -> f64 {
        self.init_intruder_hdg[idx]
    }

    /// Snapshot the intruder's current TAS/track as its episode baseline, but
    /// only if it has no baseline yet (§4.E "Initialization rule").
    pub fn maybe_init_intruder(&mut self, idx: usize, tas: f64, hdg: f64) {
        if self.init_intruder_tas[idx] == 0.0 {
            self.init_intruder_tas[idx] = tas;
            self.init_intruder_hdg[idx] = hdg;
        }
    }

    /// Clear the baseline snapshot (§4.E step 10); restores the "both zero"
    /// invariant.
    pub fn reset_intruder_init(&mut self, idx: usize) {
        self.init_intruder_tas[idx] = 0.0;
        self.init_intruder_hdg[idx] = 0.0;
    }

    pub fn noreso(&self, idx: usize) -> bool {
        self.noresoac[idx]
    }

    pub fn set_noreso(&mut self, id: &str, flag: bool) {
        if let Some(idx) = self.index_of(id) {
            self.noresoac[idx] = flag;
        }
    }

    pub fn resooff(&self, idx: usize) -> bool {
        self.resooffac[idx]
    }

    pub fn set_resooff(&mut self, id: &str, flag: bool) {
        if let Some(idx) = self.index_of(id) {
            self.resooffac[idx] = flag;
        }
    }

    pub fn resopairs(&self) -> &HashSet<PairKey> {
        &self.resopairs
    }

    pub fn add_pair(&mut self, pair: PairKey) {
        self.resopairs.insert(pair);
    }

    pub fn remove_pairs<'a>(&mut self, doomed: impl IntoIterator<Item = &'a PairKey>) {
        for pair in doomed {
            self.resopairs.remove(pair);
        }
    }
}
