//! Recovery state machine (spec.md §4.E), "free-to-revert".
//!
//! Direct port of `original_source/bluesky/traffic/asas/mvp.py::resumenav`.
//! Keeps the two-pass `changeactive` structure from the source: the first
//! pass decides per conflict pair whether its ownship must keep resolving,
//! the second pass actually writes `active[idx]` so an aircraft with
//! several simultaneous conflicts isn't released early because one of them
//! cleared first.

use std::collections::{HashMap, HashSet};

use nalgebra::Vector2;

use crate::collab::{ConflictBatch, RouteService, TrafficSnapshot, WindService};
use crate::constants::{BOUNCING_HEADING_DIFF_DEG, EARTH_RADIUS_M};
use crate::state::{EngagementState, PairKey};

/// Smallest signed angle `a - b`, folded into `(-180, 180]` (spec.md §4.E
/// step 7's `anglediff`).
fn angle_diff(a: f64, b: f64) -> f64 {
    let mut d = a - b;
    while d > 180.0 {
        d -= 360.0;
    }
    while d < -180.0 {
        d += 360.0;
    }
    d
}

/// Flat-earth displacement from `(lat1,lon1)` to `(lat2,lon2)`, east/north
/// metres (spec.md §4.E step 2).
fn flat_earth_offset(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> Vector2<f64> {
    let mean_lat = 0.5 * (lat1_deg + lat2_deg).to_radians();
    let east = EARTH_RADIUS_M * (lon2_deg - lon1_deg).to_radians() * mean_lat.cos();
    let north = EARTH_RADIUS_M * (lat2_deg - lat1_deg).to_radians();
    Vector2::new(east, north)
}

/// `max(0, -(vrel . dist) / |vrel|^2)`, then predicted miss `dist +
/// vrel*tcpa`'s norm (spec.md §4.E steps 3-4, shared by both criteria).
fn predicted_miss(dist: Vector2<f64>, vrel: Vector2<f64>) -> f64 {
    let denom = vrel.dot(&vrel);
    let tcpa = if denom > 0.0 { (-dist.dot(&vrel) / denom).max(0.0) } else { 0.0 };
    (dist + vrel * tcpa).norm()
}

struct PairOutcome {
    free: bool,
    hor_los: bool,
    is_bouncing: bool,
}

fn evaluate_pair(
    traffic: &impl TrafficSnapshot,
    wind: &impl WindService,
    state: &EngagementState,
    idx1: usize,
    idx2: usize,
    rpz_m: f64,
) -> PairOutcome {
    let dist = flat_earth_offset(traffic.lat_deg(idx1), traffic.lon_deg(idx1), traffic.lat_deg(idx2), traffic.lon_deg(idx2));

    // Criterion 1: ownship flies its autopilot-desired heading/speed,
    // intruder keeps its current velocity.
    let des_hdg_1 = traffic.ap_trk_deg(idx1);
    let des_spd_1 = traffic.ap_tas_mps(idx1);
    let cur_hdg_2 = traffic.trk_deg(idx2);
    let cur_spd_2 = traffic.tas_mps(idx2);

    let (wn1, we1) = wind.wind_mps(traffic.lat_deg(idx1), traffic.lon_deg(idx1), traffic.alt_m(idx1));
    let (wn2, we2) = wind.wind_mps(traffic.lat_deg(idx2), traffic.lon_deg(idx2), traffic.alt_m(idx2));

    let des_gs_1 = Vector2::new(
        des_spd_1 * des_hdg_1.to_radians().sin() + we1,
        des_spd_1 * des_hdg_1.to_radians().cos() + wn1,
    );
    let cur_gs_2 = Vector2::new(
        cur_spd_2 * cur_hdg_2.to_radians().sin() + we2,
        cur_spd_2 * cur_hdg_2.to_radians().cos() + wn2,
    );
    let crit1_vrel = cur_gs_2 - des_gs_1;
    let crit_1 = predicted_miss(dist, crit1_vrel) > rpz_m;

    // Criterion 2: intruder reverts to its snapshotted initial velocity.
    let des_hdg_2 = state.init_intruder_hdg(idx2);
    let des_spd_2 = state.init_intruder_tas(idx2);
    let des_gs_2 = Vector2::new(
        des_spd_2 * des_hdg_2.to_radians().sin() + we2,
        des_spd_2 * des_hdg_2.to_radians().cos() + wn2,
    );
    let crit2_vrel = des_gs_2 - des_gs_1;
    let crit_2 = predicted_miss(dist, crit2_vrel) > rpz_m;

    let free = crit_1 && crit_2;
    let hdist = dist.norm();
    let hor_los = hdist < rpz_m / state.resofach;
    let is_bouncing = angle_diff(traffic.trk_deg(idx1), traffic.trk_deg(idx2)).abs() < BOUNCING_HEADING_DIFF_DEG && hdist < rpz_m;

    PairOutcome { free, hor_los, is_bouncing }
}

/// Run one tick of the recovery state machine (spec.md §4.E).
pub fn resume_nav(
    traffic: &impl TrafficSnapshot,
    batch: &impl ConflictBatch,
    wind: &impl WindService,
    route: &mut impl RouteService,
    state: &mut EngagementState,
) {
    for i in 0..batch.len() {
        let (own, intr) = batch.pair(i);
        state.add_pair((own.clone(), intr.clone()));
    }

    let mut delpairs: HashSet<PairKey> = HashSet::new();
    let mut changeactive: HashMap<usize, bool> = HashMap::new();
    let mut swinitint: HashSet<usize> = HashSet::new();

    let pairs: Vec<PairKey> = state.resopairs().iter().cloned().collect();
    for pair @ (own_id, intr_id) in &pairs {
        let idx1 = match traffic.index_of(own_id) {
            Some(idx) => idx,
            None => {
                delpairs.insert(pair.clone());
                continue;
            }
        };

        match traffic.index_of(intr_id) {
            Some(idx2) => {
                let rpz_m = traffic.rpz_m(idx1).max(traffic.rpz_m(idx2)) * state.resofach;
                let outcome = evaluate_pair(traffic, wind, state, idx1, idx2, rpz_m);

                if !outcome.free || outcome.hor_los || outcome.is_bouncing {
                    changeactive.insert(idx1, true);
                } else {
                    changeactive.entry(idx1).or_insert(false);
                    delpairs.insert(pair.clone());
                    swinitint.insert(idx2);
                }
            }
            None => {
                // Intruder deleted: ownship is free to recover.
                changeactive.entry(idx1).or_insert(false);
                delpairs.insert(pair.clone());
            }
        }
    }

    for (idx, active) in &changeactive {
        state.set_active(*idx, *active);
        if !*active {
            if let Some(wp) = route.findact(*idx) {
                route.direct(*idx, wp);
            }
        }
    }

    state.remove_pairs(delpairs.iter());

    if !delpairs.is_empty() {
        let still_referenced: HashSet<usize> = state
            .resopairs()
            .iter()
            .filter_map(|(_, intr)| traffic.index_of(intr))
            .collect();
        for idx2 in swinitint {
            if !still_referenced.contains(&idx2) {
                state.reset_intruder_init(idx2);
            }
        }
    }
}
