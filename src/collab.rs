//! External collaborator contracts (spec.md §6.2).
//!
//! The resolver is a pure, single-tick computation over a frozen snapshot;
//! it never owns traffic data, wind data, performance limits, or the route
//! table. These traits are the seam: the simulator (or a test harness)
//! implements them over its own columnar traffic store, and the resolver
//! only ever reads through them during one call to
//! [`crate::Resolver::resolve`] or [`crate::Resolver::resume_nav`].

use crate::state::AircraftId;

/// Read-only per-tick traffic snapshot, indexed by the resolver's own
/// aircraft ordering (spec.md §6.2 "Traffic snapshot").
pub trait TrafficSnapshot {
    fn ntraf(&self) -> usize;
    fn id(&self, idx: usize) -> &AircraftId;
    fn lat_deg(&self, idx: usize) -> f64;
    fn lon_deg(&self, idx: usize) -> f64;
    fn alt_m(&self, idx: usize) -> f64;
    fn gs_east_mps(&self, idx: usize) -> f64;
    fn gs_north_mps(&self, idx: usize) -> f64;
    fn vs_mps(&self, idx: usize) -> f64;
    fn tas_mps(&self, idx: usize) -> f64;
    fn trk_deg(&self, idx: usize) -> f64;
    fn sel_alt_m(&self, idx: usize) -> f64;
    fn sel_hdg_deg(&self, idx: usize) -> f64;
    /// Autopilot-desired vertical speed, used by the recovery SM's
    /// Criterion 1 predicted-own-velocity computation.
    fn ap_vs_mps(&self, idx: usize) -> f64;
    /// Autopilot-desired track, degrees (Criterion 1's `des_hdg_1`).
    fn ap_trk_deg(&self, idx: usize) -> f64;
    /// Autopilot-desired true airspeed (Criterion 1's `des_spd_1`).
    fn ap_tas_mps(&self, idx: usize) -> f64;
    /// Horizontal acceleration capability, passed through to the
    /// performance limiter.
    fn ax_mps2(&self, idx: usize) -> f64;
    /// Horizontal protected-zone radius intrinsic to this aircraft, before
    /// `resofach` scaling (spec.md §3 "protected-zone radii").
    fn rpz_m(&self, idx: usize) -> f64;
    /// Vertical protected-zone half-thickness intrinsic to this aircraft,
    /// before `resofacv` scaling.
    fn hpz_m(&self, idx: usize) -> f64;

    fn index_of(&self, id: &str) -> Option<usize> {
        (0..self.ntraf()).find(|&i| self.id(i) == id)
    }
}

/// One tick's worth of detected conflicts, as parallel columns (spec.md
/// §6.2 "Conflict detector"), mirroring `conf.confpairs`/`conf.qdr`/etc. in
/// `original_source/bluesky/traffic/asas/mvp.py`. Protected-zone radii are
/// intrinsic to each aircraft, not to the pair, so they live on
/// [`TrafficSnapshot`] instead.
pub trait ConflictBatch {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn pair(&self, i: usize) -> (&AircraftId, &AircraftId);
    fn qdr_deg(&self, i: usize) -> f64;
    fn dist_m(&self, i: usize) -> f64;
    fn tcpa_s(&self, i: usize) -> f64;
    fn t_los_s(&self, i: usize) -> f64;
    fn dtlookahead_s(&self) -> f64;
}

/// Wind lookup, vectorized per-aircraft in the source; here one aircraft
/// at a time since the resolver only ever needs it for that aircraft's own
/// command synthesis (spec.md §6.2 "Wind service").
pub trait WindService {
    /// Returns `(wind_north_mps, wind_east_mps)` at the given position.
    fn wind_mps(&self, lat_deg: f64, lon_deg: f64, alt_m: f64) -> (f64, f64);
}

/// Aircraft performance envelope (spec.md §6.2 "Performance limiter").
pub trait PerformanceLimiter {
    /// Returns `(tas_capped, vs_capped, alt_capped)`.
    fn limits(&self, tas_mps: f64, vs_mps: f64, alt_m: f64, ax_mps2: f64) -> (f64, f64, f64);
}

/// Waypoint/route lookup used when the recovery SM releases an aircraft
/// back to the autopilot (spec.md §6.2 "Route service").
pub trait RouteService {
    /// Index of the aircraft's next active waypoint, if any.
    fn findact(&self, idx: usize) -> Option<usize>;
    /// Direct the aircraft to the given waypoint index.
    fn direct(&mut self, idx: usize, wp_index: usize);
}
