//! Pair aggregator (spec.md §4.C).
//!
//! Direct port of the per-pair loop in
//! `original_source/bluesky/traffic/asas/mvp.py::resolve`: iterates the
//! conflict batch, calls the geometry kernel (`geometry::resolve_pair`) and
//! priority policy (`priority::apply_priority`) per pair, and folds the
//! results into per-aircraft accumulators.

use nalgebra::Vector3;

use crate::collab::{ConflictBatch, TrafficSnapshot};
use crate::config::SwitchState;
use crate::constants::{MIN_VS_ACTIVE_FACTOR, TIMESOLVE_V_SENTINEL_S};
use crate::geometry::{self, PairGeometryInput};
use crate::priority;
use crate::state::EngagementState;

/// Per-aircraft accumulators produced by one aggregation pass.
///
/// The reduction this type represents is commutative per aircraft index
/// (spec.md §5): `dv` sums, `timesolve_v` takes the minimum, `swvsact`
/// is a logical OR. A parallel implementation can compute partial
/// `AggregateAccumulator`s over disjoint pair subsets and [`merge`] them in
/// any order, as long as pairs sharing an ownship index land in the same
/// partial or are merged afterward.
///
/// [`merge`]: AggregateAccumulator::merge
#[derive(Debug, Clone)]
pub struct AggregateAccumulator {
    pub dv: Vec<Vector3<f64>>,
    pub timesolve_v: Vec<f64>,
    pub swvsact: Vec<bool>,
}

impl AggregateAccumulator {
    fn zeroed(ntraf: usize) -> Self {
        Self {
            dv: vec![Vector3::zeros(); ntraf],
            timesolve_v: vec![TIMESOLVE_V_SENTINEL_S; ntraf],
            swvsact: vec![false; ntraf],
        }
    }

    /// Commutative merge of two partial accumulators of equal length.
    pub fn merge(mut self, other: Self) -> Self {
        for i in 0..self.dv.len() {
            self.dv[i] += other.dv[i];
            self.timesolve_v[i] = self.timesolve_v[i].min(other.timesolve_v[i]);
            self.swvsact[i] |= other.swvsact[i];
        }
        self
    }
}

/// Run one tick's pair aggregation (spec.md §4.C steps 1-8), including the
/// intruder-baseline snapshot described in §4.E's "Initialization rule"
/// (the source performs this inside the same loop, keyed off the conflict
/// batch rather than `resopairs`).
pub fn aggregate(
    batch: &impl ConflictBatch,
    traffic: &impl TrafficSnapshot,
    state: &mut EngagementState,
    switches: &SwitchState,
    asas_dt_s: f64,
) -> AggregateAccumulator {
    let ntraf = traffic.ntraf();
    let mut acc = AggregateAccumulator::zeroed(ntraf);

    for i in 0..batch.len() {
        let (own_id, intr_id) = batch.pair(i);
        for id in [own_id, intr_id] {
            if let Some(idx) = traffic.index_of(id) {
                state.maybe_init_intruder(idx, traffic.tas_mps(idx), traffic.trk_deg(idx));
            }
        }
    }

    for i in 0..batch.len() {
        let (own_id, intr_id) = batch.pair(i);
        let (idx1, idx2) = match (traffic.index_of(own_id), traffic.index_of(intr_id)) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                log::debug!("skipping conflict pair with missing aircraft index");
                continue;
            }
        };

        let rpz_m = traffic.rpz_m(idx1).max(traffic.rpz_m(idx2)) * state.resofach;
        let hpz_m = traffic.hpz_m(idx1).max(traffic.hpz_m(idx2)) * state.resofacv;

        let v1 = Vector3::new(traffic.gs_east_mps(idx1), traffic.gs_north_mps(idx1), traffic.vs_mps(idx1));
        let v2 = Vector3::new(traffic.gs_east_mps(idx2), traffic.gs_north_mps(idx2), traffic.vs_mps(idx2));

        let input = PairGeometryInput {
            qdr_deg: batch.qdr_deg(i),
            dist_m: batch.dist_m(i),
            tcpa_s: batch.tcpa_s(i),
            t_los_s: batch.t_los_s(i),
            dtlookahead_s: batch.dtlookahead_s(),
            v1,
            v2,
            alt1_m: traffic.alt_m(idx1),
            alt2_m: traffic.alt_m(idx2),
            rpz_m,
            hpz_m,
        };

        let resolution = geometry::resolve_pair(&input);
        let mut dv_mvp = resolution.dv_mvp;
        log::trace!("pair {}/{}: dv_mvp={:?} tsolV={}", own_id, intr_id, dv_mvp, resolution.tsol_v_s);

        if resolution.tsol_v_s < acc.timesolve_v[idx1] {
            acc.timesolve_v[idx1] = resolution.tsol_v_s;
        }

        // Step 5: vertical-required flag, one ASAS step ahead.
        let hor_int = input.dist_m < rpz_m;
        let alt1_next = traffic.alt_m(idx1) + traffic.vs_mps(idx1) * asas_dt_s;
        let alt2_next = traffic.alt_m(idx2) + traffic.vs_mps(idx2) * asas_dt_s;
        let ver_int = (alt1_next - alt2_next).abs() < hpz_m / state.resofacv * state.resofacv.max(MIN_VS_ACTIVE_FACTOR);
        acc.swvsact[idx1] = hor_int && ver_int;

        // Step 6: priority policy or the unconditional halved share.
        if switches.swprio {
            acc.dv[idx1] = priority::apply_priority(
                &mut dv_mvp,
                acc.dv[idx1],
                traffic.vs_mps(idx1),
                traffic.vs_mps(idx2),
                switches.priocode,
            );
        } else {
            dv_mvp.z *= 0.5;
            acc.dv[idx1] -= dv_mvp;
        }

        // Step 7: noreso intruders are not avoided; ownship absorbs the
        // resolution on both sides by adding the (already halved/zeroed)
        // dv_mvp back on top of the subtraction above.
        if state.noreso(idx2) {
            acc.dv[idx1] += dv_mvp;
        }

        // Step 8: resooff aircraft never get a resolution command.
        if state.resooff(idx1) {
            acc.dv[idx1] = Vector3::zeros();
        }
    }

    acc
}
