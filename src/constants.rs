//! Named constants for the MVP resolver.
//!
//! Grounded in `original_source/bluesky/traffic/asas/mvp.py`, which hard-codes
//! these as bare literals (`10.`, `0.1`, `6371000.`) inline; naming them here
//! follows spec.md §9's re-architecture guidance ("Float semantics ... should
//! be named").

/// Below this horizontal miss distance at CPA (metres) a conflict is treated
/// as head-on and the resolution direction is synthesized perpendicular to
/// the relative bearing instead of derived from a near-zero vector.
pub const HEAD_ON_THRESHOLD_M: f64 = 10.0;

/// Vertical speed magnitude (m/s) below which an aircraft is considered
/// "cruising" rather than climbing/descending for priority-policy purposes.
pub const CRUISE_VS_THRESHOLD_MPS: f64 = 0.1;

/// Earth radius (metres) used by the recovery state machine's flat-earth
/// distance approximation.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Lower bound applied to `max(resofacv, ...)` when checking predicted
/// vertical intrusion one ASAS step ahead (§4.C step 5).
pub const MIN_VS_ACTIVE_FACTOR: f64 = 1.2;

/// Heading difference (degrees) below which two aircraft on nearly-parallel
/// tracks inside each other's protected zone are considered "bouncing"
/// (§4.E step 7).
pub const BOUNCING_HEADING_DIFF_DEG: f64 = 30.0;

/// Initial value of `timesolveV` for an aircraft with no vertically-solving
/// conflict pair this tick (§4.C). Kept as a large finite value rather than
/// `f64::INFINITY`: the command synthesizer multiplies it by `vs_capped`,
/// and `0.0 * f64::INFINITY` is NaN while `0.0 * 1e9` is exactly `0.0` —
/// `original_source/bluesky/traffic/asas/mvp.py` relies on the latter to
/// make `asasalttemp` collapse to the current altitude for aircraft that
/// are not vertically resolving.
pub const TIMESOLVE_V_SENTINEL_S: f64 = 1.0e9;
