//! Priority policy (spec.md §4.B).
//!
//! Direct port of `original_source/bluesky/traffic/asas/mvp.py::applyprio`.
//! The Python mutates `dv_mvp` in place (halving or zeroing its vertical
//! component) before folding it into the ownship's accumulator; SPEC_FULL.md
//! §4 Open Question 2 establishes that this is safe because the aggregator
//! (`aggregate.rs`) never reuses a pair's `dv_mvp` past the iteration that
//! produced it. This module reproduces the same in-place mutation via `&mut
//! Vector3<f64>` so the aggregator can read the post-mutation vector back
//! out for the noreso step that follows it.

use nalgebra::Vector3;

use crate::config::PriorityCode;
use crate::constants::CRUISE_VS_THRESHOLD_MPS;

fn is_cruising(vs: f64) -> bool {
    vs.abs() < CRUISE_VS_THRESHOLD_MPS
}

/// Apply the priority policy to one pair's resolution, from ownship's
/// perspective. `dv_mvp` is mutated in place (its vertical component halved
/// or zeroed, depending on policy and which aircraft is cruising); the
/// caller's running `dv1` accumulator is returned updated.
///
/// `vs1`/`vs2` are ownship/intruder vertical speed, m/s.
pub fn apply_priority(
    dv_mvp: &mut Vector3<f64>,
    dv1: Vector3<f64>,
    vs1: f64,
    vs2: f64,
    priocode: PriorityCode,
) -> Vector3<f64> {
    let cruise1 = is_cruising(vs1);
    let cruise2 = is_cruising(vs2);

    match priocode {
        // Free Flight Primary: no priority, cooperative combined resolution.
        PriorityCode::FF1 => {
            dv_mvp.z /= 2.0;
            dv1 - *dv_mvp
        }

        // Free Flight Secondary: cruising aircraft has priority.
        PriorityCode::FF2 => {
            dv_mvp.z /= 2.0;
            if cruise1 && !cruise2 {
                // Intruder solves alone; ownship keeps its course.
                dv1
            } else if cruise2 && !cruise1 {
                dv1 - *dv_mvp
            } else {
                dv1 - *dv_mvp
            }
        }

        // Free Flight Tertiary: climbing/descending aircraft has priority,
        // the cruising one solves horizontally alone.
        PriorityCode::FF3 => {
            if cruise1 && !cruise2 {
                dv_mvp.z = 0.0;
                dv1 - *dv_mvp
            } else if cruise2 && !cruise1 {
                dv_mvp.z = 0.0;
                dv1
            } else {
                dv_mvp.z /= 2.0;
                dv1 - *dv_mvp
            }
        }

        // Layers Primary: cruising has priority, all resolutions horizontal.
        PriorityCode::LAY1 => {
            dv_mvp.z = 0.0;
            if cruise1 && !cruise2 {
                dv1
            } else if cruise2 && !cruise1 {
                dv1 - *dv_mvp
            } else {
                dv1 - *dv_mvp
            }
        }

        // Layers Secondary: climbing/descending has priority, horizontal only.
        PriorityCode::LAY2 => {
            dv_mvp.z = 0.0;
            if cruise1 && !cruise2 {
                dv1 - *dv_mvp
            } else if cruise2 && !cruise1 {
                dv1
            } else {
                dv1 - *dv_mvp
            }
        }
    }
}
