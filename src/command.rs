//! Command synthesizer (spec.md §4.D).
//!
//! Ports the back half of
//! `original_source/bluesky/traffic/asas/mvp.py::resolve`: converts the
//! per-aircraft accumulated `dv` from `aggregate.rs` into track/TAS/VS/
//! altitude commands, honoring the active resolution-domain switches, wind,
//! and the performance envelope.

use crate::aggregate::AggregateAccumulator;
use crate::collab::{PerformanceLimiter, TrafficSnapshot, WindService};
use crate::config::SwitchState;
use crate::constants::TIMESOLVE_V_SENTINEL_S;

/// One aircraft's synthesized command for this tick (spec.md §6.2 "The
/// resolver emits").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCommand {
    pub track_deg: f64,
    pub tas_mps: f64,
    pub vs_mps: f64,
    pub alt_m: f64,
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Synthesize commands for every aircraft in `traffic` from the
/// aggregator's accumulated deltas (spec.md §4.D steps 1-7).
pub fn synthesize(
    traffic: &impl TrafficSnapshot,
    acc: &AggregateAccumulator,
    switches: &SwitchState,
    wind: &impl WindService,
    perf: &impl PerformanceLimiter,
    dtlookahead_s: f64,
) -> Vec<ResolvedCommand> {
    (0..traffic.ntraf())
        .map(|idx| synthesize_one(traffic, acc, switches, wind, perf, dtlookahead_s, idx))
        .collect()
}

fn synthesize_one(
    traffic: &impl TrafficSnapshot,
    acc: &AggregateAccumulator,
    switches: &SwitchState,
    wind: &impl WindService,
    perf: &impl PerformanceLimiter,
    dtlookahead_s: f64,
    idx: usize,
) -> ResolvedCommand {
    let dv = acc.dv[idx];
    let gs_east = traffic.gs_east_mps(idx);
    let gs_north = traffic.gs_north_mps(idx);
    let vs_cur = traffic.vs_mps(idx);
    let trk_cur = traffic.trk_deg(idx);
    let gs_cur = (gs_east * gs_east + gs_north * gs_north).sqrt();

    let new_east = gs_east + dv.x;
    let new_north = gs_north + dv.y;
    let new_vz = vs_cur + dv.z;

    let (new_track, new_gs, new_vs) = if switches.swresohoriz {
        if switches.swresospd && !switches.swresohdg {
            (trk_cur, (new_east * new_east + new_north * new_north).sqrt(), vs_cur)
        } else if switches.swresohdg && !switches.swresospd {
            (new_east.atan2(new_north).to_degrees().rem_euclid(360.0), gs_cur, vs_cur)
        } else {
            (
                new_east.atan2(new_north).to_degrees().rem_euclid(360.0),
                (new_east * new_east + new_north * new_north).sqrt(),
                vs_cur,
            )
        }
    } else if switches.swresovert {
        (trk_cur, gs_cur, new_vz)
    } else {
        (
            new_east.atan2(new_north).to_degrees().rem_euclid(360.0),
            (new_east * new_east + new_north * new_north).sqrt(),
            new_vz,
        )
    };

    let (wn, we) = wind.wind_mps(traffic.lat_deg(idx), traffic.lon_deg(idx), traffic.alt_m(idx));
    let tas_north = new_gs * new_track.to_radians().cos() - wn;
    let tas_east = new_gs * new_track.to_radians().sin() - we;
    let new_tas = (tas_north * tas_north + tas_east * tas_east).sqrt();

    let alt_cur = traffic.alt_m(idx);
    let (tas_capped, vs_capped_raw, _alt_capped) = perf.limits(new_tas, new_vs, alt_cur, traffic.ax_mps2(idx));

    let sign_vs = sign(new_vs);
    let vs_capped = if sign_vs == 0.0 || sign_vs == sign(vs_capped_raw) {
        vs_capped_raw
    } else {
        -vs_capped_raw
    };

    let sel_alt = traffic.sel_alt_m(idx);
    let timesolve_v = acc.timesolve_v[idx];
    let asasalttemp = vs_capped * timesolve_v + alt_cur;

    let sign_dvs = sign(vs_capped - traffic.ap_vs_mps(idx) * sign(sel_alt - alt_cur));
    let sign_alt = sign(asasalttemp - sel_alt);
    let mut alt_decided = if sign_dvs == 0.0 || sign_dvs == sign_alt {
        asasalttemp
    } else {
        sel_alt
    };

    let alt_condition = timesolve_v < dtlookahead_s && dv.z.abs() > 0.0;
    if alt_condition {
        alt_decided = asasalttemp;
    }

    let base_alt = if switches.swresohoriz { sel_alt } else { alt_decided };
    let final_alt = if acc.swvsact[idx] { alt_cur } else { base_alt };

    ResolvedCommand {
        track_deg: new_track,
        tas_mps: tas_capped,
        vs_mps: vs_capped,
        alt_m: final_alt,
    }
}
