//! Geometry kernel: pairwise Modified Voltage Potential math (spec.md §4.A).
//!
//! Direct port of `original_source/bluesky/traffic/asas/mvp.py::MVP`, using
//! `nalgebra::Vector3`/`Vector2` in place of BlueSky's 3-element numpy
//! arrays — the natural Rust analogue, consistent with how `opencas` uses
//! `nalgebra::SVector` for its own fixed-size numeric vectors.

use nalgebra::{Vector2, Vector3};

use crate::constants::HEAD_ON_THRESHOLD_M;

/// Per-pair inputs to the geometry kernel (spec.md §4.A).
#[derive(Debug, Clone, Copy)]
pub struct PairGeometryInput {
    /// Bearing from own to intruder, degrees, clockwise from north.
    pub qdr_deg: f64,
    /// Slant distance between own and intruder, metres.
    pub dist_m: f64,
    /// Time to closest point of approach, seconds (negative during intrusion).
    pub tcpa_s: f64,
    /// Time to loss of separation, seconds.
    pub t_los_s: f64,
    /// Look-ahead horizon, seconds.
    pub dtlookahead_s: f64,
    /// Ownship velocity (east, north, vertical), m/s.
    pub v1: Vector3<f64>,
    /// Intruder velocity (east, north, vertical), m/s.
    pub v2: Vector3<f64>,
    /// Ownship altitude, metres.
    pub alt1_m: f64,
    /// Intruder altitude, metres.
    pub alt2_m: f64,
    /// Effective horizontal protected-zone radius, `max(rpz_i, rpz_j) * resofach`, metres.
    pub rpz_m: f64,
    /// Effective vertical protected-zone half-thickness, metres.
    pub hpz_m: f64,
}

/// Output of the geometry kernel: the full (unilateral) velocity change that
/// would resolve the pair, plus the time needed to solve it vertically.
#[derive(Debug, Clone, Copy)]
pub struct PairResolution {
    pub dv_mvp: Vector3<f64>,
    pub tsol_v_s: f64,
}

/// Compute the MVP resolution vector for a single ownship/intruder pair.
pub fn resolve_pair(input: &PairGeometryInput) -> PairResolution {
    let qdr = input.qdr_deg.to_radians();

    // Step 1: relative position and velocity.
    let drel = Vector3::new(
        qdr.sin() * input.dist_m,
        qdr.cos() * input.dist_m,
        input.alt2_m - input.alt1_m,
    );
    let vrel = input.v2 - input.v1;

    // Step 2: predicted horizontal miss at CPA.
    let drel_xy = Vector2::new(drel.x, drel.y);
    let vrel_xy = Vector2::new(vrel.x, vrel.y);
    let mut dcpa: Vector2<f64> = drel_xy + vrel_xy * input.tcpa_s;
    let mut dabs_h = dcpa.norm();

    // Step 3: horizontal intrusion.
    let i_h = input.rpz_m - dabs_h;

    // Step 4: head-on guard.
    if dabs_h <= HEAD_ON_THRESHOLD_M {
        dabs_h = HEAD_ON_THRESHOLD_M;
        dcpa = Vector2::new(drel_xy.y / input.dist_m * dabs_h, -drel_xy.x / input.dist_m * dabs_h);
    }

    // Step 5/6: grazing correction and horizontal resolution deltas.
    let (dv1, dv2) = if input.rpz_m < input.dist_m && dabs_h < input.dist_m {
        let erratum = ((input.rpz_m / input.dist_m).asin() - (dabs_h / input.dist_m).asin()).cos();
        let target = input.rpz_m / erratum;
        (
            (target - dabs_h) * dcpa.x / (input.tcpa_s.abs() * dabs_h),
            (target - dabs_h) * dcpa.y / (input.tcpa_s.abs() * dabs_h),
        )
    } else {
        (
            i_h * dcpa.x / (input.tcpa_s.abs() * dabs_h),
            i_h * dcpa.y / (input.tcpa_s.abs() * dabs_h),
        )
    };

    // Step 7: vertical intrusion / time to solve vertically.
    let vrel_z = vrel.z;
    let drel_z = drel.z;
    let mut i_v = if vrel_z.abs() > 0.0 { input.hpz_m } else { input.hpz_m - drel_z.abs() };
    let mut tsol_v = if vrel_z.abs() > 0.0 { (drel_z / vrel_z).abs() } else { input.t_los_s };

    if tsol_v > input.dtlookahead_s {
        tsol_v = input.t_los_s;
        i_v = input.hpz_m;
    }

    // Step 8: vertical resolution delta.
    let dv3 = if vrel_z.abs() > 0.0 {
        (i_v / tsol_v) * (-vrel_z.signum())
    } else {
        i_v / tsol_v
    };

    PairResolution {
        dv_mvp: Vector3::new(dv1, dv2, dv3),
        tsol_v_s: tsol_v,
    }
}
