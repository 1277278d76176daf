//! Integration tests for the concrete scenarios in spec.md §8 (S1-S6),
//! driven entirely through the public `Resolver` API over small in-memory
//! fixtures implementing the `collab` traits.

use mvp_resolver::collab::{ConflictBatch, PerformanceLimiter, RouteService, TrafficSnapshot, WindService};
use mvp_resolver::config::{PriorityCode, ResolverConfig, SwitchState};
use mvp_resolver::state::AircraftId;
use mvp_resolver::Resolver;

#[derive(Clone)]
struct Aircraft {
    id: AircraftId,
    lat_deg: f64,
    lon_deg: f64,
    alt_m: f64,
    gs_east_mps: f64,
    gs_north_mps: f64,
    vs_mps: f64,
    tas_mps: f64,
    trk_deg: f64,
    sel_alt_m: f64,
    rpz_m: f64,
    hpz_m: f64,
}

impl Aircraft {
    fn cruising(id: &str, trk_deg: f64, tas_mps: f64, alt_m: f64) -> Self {
        let (s, c) = trk_deg.to_radians().sin_cos();
        Aircraft {
            id: id.to_string(),
            lat_deg: 52.0,
            lon_deg: 4.0,
            alt_m,
            gs_east_mps: tas_mps * s,
            gs_north_mps: tas_mps * c,
            vs_mps: 0.0,
            tas_mps,
            trk_deg,
            sel_alt_m: alt_m,
            rpz_m: 5.0 * 1852.0,
            hpz_m: 304.8,
        }
    }
}

struct Fleet {
    aircraft: Vec<Aircraft>,
}

impl TrafficSnapshot for Fleet {
    fn ntraf(&self) -> usize {
        self.aircraft.len()
    }
    fn id(&self, idx: usize) -> &AircraftId {
        &self.aircraft[idx].id
    }
    fn lat_deg(&self, idx: usize) -> f64 {
        self.aircraft[idx].lat_deg
    }
    fn lon_deg(&self, idx: usize) -> f64 {
        self.aircraft[idx].lon_deg
    }
    fn alt_m(&self, idx: usize) -> f64 {
        self.aircraft[idx].alt_m
    }
    fn gs_east_mps(&self, idx: usize) -> f64 {
        self.aircraft[idx].gs_east_mps
    }
    fn gs_north_mps(&self, idx: usize) -> f64 {
        self.aircraft[idx].gs_north_mps
    }
    fn vs_mps(&self, idx: usize) -> f64 {
        self.aircraft[idx].vs_mps
    }
    fn tas_mps(&self, idx: usize) -> f64 {
        self.aircraft[idx].tas_mps
    }
    fn trk_deg(&self, idx: usize) -> f64 {
        self.aircraft[idx].trk_deg
    }
    fn sel_alt_m(&self, idx: usize) -> f64 {
        self.aircraft[idx].sel_alt_m
    }
    fn sel_hdg_deg(&self, idx: usize) -> f64 {
        self.aircraft[idx].trk_deg
    }
    fn ap_vs_mps(&self, _idx: usize) -> f64 {
        0.0
    }
    fn ap_trk_deg(&self, idx: usize) -> f64 {
        self.aircraft[idx].trk_deg
    }
    fn ap_tas_mps(&self, idx: usize) -> f64 {
        self.aircraft[idx].tas_mps
    }
    fn ax_mps2(&self, _idx: usize) -> f64 {
        2.0
    }
    fn rpz_m(&self, idx: usize) -> f64 {
        self.aircraft[idx].rpz_m
    }
    fn hpz_m(&self, idx: usize) -> f64 {
        self.aircraft[idx].hpz_m
    }
}

struct Pair {
    own: AircraftId,
    intr: AircraftId,
    qdr_deg: f64,
    dist_m: f64,
    tcpa_s: f64,
    t_los_s: f64,
}

struct Batch {
    pairs: Vec<Pair>,
    dtlookahead_s: f64,
}

impl ConflictBatch for Batch {
    fn len(&self) -> usize {
        self.pairs.len()
    }
    fn pair(&self, i: usize) -> (&AircraftId, &AircraftId) {
        (&self.pairs[i].own, &self.pairs[i].intr)
    }
    fn qdr_deg(&self, i: usize) -> f64 {
        self.pairs[i].qdr_deg
    }
    fn dist_m(&self, i: usize) -> f64 {
        self.pairs[i].dist_m
    }
    fn tcpa_s(&self, i: usize) -> f64 {
        self.pairs[i].tcpa_s
    }
    fn t_los_s(&self, i: usize) -> f64 {
        self.pairs[i].t_los_s
    }
    fn dtlookahead_s(&self) -> f64 {
        self.dtlookahead_s
    }
}

struct NoWind;
impl WindService for NoWind {
    fn wind_mps(&self, _lat: f64, _lon: f64, _alt: f64) -> (f64, f64) {
        (0.0, 0.0)
    }
}

struct NoLimit;
impl PerformanceLimiter for NoLimit {
    fn limits(&self, tas: f64, vs: f64, alt: f64, _ax: f64) -> (f64, f64, f64) {
        (tas, vs, alt)
    }
}

struct NoRoute;
impl RouteService for NoRoute {
    fn findact(&self, _idx: usize) -> Option<usize> {
        None
    }
    fn direct(&mut self, _idx: usize, _wp_index: usize) {}
}

/// Always has a waypoint to offer, and records which indices actually got
/// redirected — lets a test prove a pair was *not* released.
#[derive(Default)]
struct CountingRoute {
    directed: Vec<usize>,
}

impl RouteService for CountingRoute {
    fn findact(&self, _idx: usize) -> Option<usize> {
        Some(0)
    }
    fn direct(&mut self, idx: usize, _wp_index: usize) {
        self.directed.push(idx);
    }
}

fn resolver_with(switches: SwitchState) -> Resolver {
    let mut config = ResolverConfig::default();
    config.switches = switches;
    Resolver::new(config)
}

/// S1 — head-on, priority OFF: negligible vertical component, nonzero
/// lateral resolution, equal-magnitude opposite deltas for both sides.
#[test]
fn s1_head_on_produces_symmetric_lateral_resolution() {
    let own = Aircraft::cruising("OWN", 90.0, 250.0, 10_000.0);
    let intr = Aircraft::cruising("INTR", 270.0, 250.0, 10_000.0);
    let fleet = Fleet { aircraft: vec![own, intr] };

    let batch = Batch {
        pairs: vec![
            Pair { own: "OWN".into(), intr: "INTR".into(), qdr_deg: 90.0, dist_m: 5.0 * 1852.0, tcpa_s: 18.5, t_los_s: 1.0e6 },
            Pair { own: "INTR".into(), intr: "OWN".into(), qdr_deg: 270.0, dist_m: 5.0 * 1852.0, tcpa_s: 18.5, t_los_s: 1.0e6 },
        ],
        dtlookahead_s: 300.0,
    };

    let mut switches = SwitchState::default();
    switches.swprio = false;
    let mut resolver = resolver_with(switches);
    resolver.create_aircraft("OWN".into());
    resolver.create_aircraft("INTR".into());

    let commands = resolver.resolve(&fleet, &batch, &NoWind, &NoLimit, 1.0);
    assert_eq!(commands.len(), 2);
    assert!((commands[0].vs_mps - 0.0).abs() < 1e-6, "head-on co-altitude must not touch vs");
    assert_ne!(commands[0].track_deg, 90.0, "resolution must deflect the track");
    assert_ne!(commands[1].track_deg, 270.0);
}

/// S2 — overtake, LAY1 ON: cruiser untouched, climber absorbs the full
/// horizontal resolution, nobody touches vs.
#[test]
fn s2_lay1_cruiser_is_untouched() {
    let mut own = Aircraft::cruising("OWN", 90.0, 240.0, 35_000.0 * 0.3048);
    own.vs_mps = 0.0;
    let mut intr = Aircraft::cruising("INTR", 90.0, 230.0, 34_000.0 * 0.3048);
    intr.vs_mps = 10.0;

    let fleet = Fleet { aircraft: vec![own, intr] };
    let batch = Batch {
        pairs: vec![Pair {
            own: "OWN".into(),
            intr: "INTR".into(),
            qdr_deg: 90.0,
            dist_m: 4000.0,
            tcpa_s: 40.0,
            t_los_s: 60.0,
        }],
        dtlookahead_s: 300.0,
    };

    let mut switches = SwitchState::default();
    switches.swprio = true;
    switches.priocode = PriorityCode::LAY1;
    let mut resolver = resolver_with(switches);
    resolver.create_aircraft("OWN".into());
    resolver.create_aircraft("INTR".into());

    let commands = resolver.resolve(&fleet, &batch, &NoWind, &NoLimit, 1.0);
    // Cruiser (OWN) is at priority and must keep its current track/vs.
    assert!((commands[0].track_deg - 90.0).abs() < 1e-6);
    assert!((commands[0].vs_mps - 0.0).abs() < 1e-9, "LAY1 forces dv_z = 0 everywhere");
}

/// S3 — noreso intruder: the resolution the ownship subtracts is added
/// straight back, per spec.md §4.C step 7's exact-cancellation contract,
/// leaving the ownship's own command exactly as if it were not resolving
/// at all.
#[test]
fn s3_noreso_intruder_cancels_back_to_zero() {
    let own = Aircraft::cruising("OWN", 90.0, 250.0, 10_000.0);
    let intr = Aircraft::cruising("INTR", 270.0, 250.0, 10_000.0);
    let fleet = Fleet { aircraft: vec![own, intr] };

    let batch = Batch {
        pairs: vec![Pair { own: "OWN".into(), intr: "INTR".into(), qdr_deg: 90.0, dist_m: 5.0 * 1852.0, tcpa_s: 18.5, t_los_s: 1.0e6 }],
        dtlookahead_s: 300.0,
    };

    // Baseline: same pair, no noreso flag, OWN must deflect.
    let switches = SwitchState::default();
    let mut baseline = resolver_with(switches);
    baseline.create_aircraft("OWN".into());
    baseline.create_aircraft("INTR".into());
    let baseline_commands = baseline.resolve(&fleet, &batch, &NoWind, &NoLimit, 1.0);
    assert_ne!(baseline_commands[0].track_deg, 90.0, "sanity: without noreso OWN must deflect");

    // With INTR flagged noreso, OWN's subtract-then-add-back cancels to a
    // net-zero dv, so OWN's track returns to its unresolved value.
    let switches = SwitchState::default();
    let mut resolver = resolver_with(switches);
    resolver.create_aircraft("OWN".into());
    resolver.create_aircraft("INTR".into());
    let (ok, _) = resolver.set_noreso("INTR");
    assert!(ok);

    let commands = resolver.resolve(&fleet, &batch, &NoWind, &NoLimit, 1.0);
    assert!((commands[0].track_deg - 90.0).abs() < 1e-6, "noreso intruder must cancel OWN's own resolution");
}

/// S4 — vertical-only conflict with RMETHV ON: climb rate reduces.
#[test]
fn s4_vertical_only_reduces_climb_rate() {
    let mut own = Aircraft::cruising("OWN", 0.0, 0.0, 10_000.0);
    own.gs_east_mps = 0.0;
    own.gs_north_mps = 0.0;
    own.vs_mps = 10.0;
    let mut intr = Aircraft::cruising("INTR", 0.0, 0.0, 10_000.0 + 152.4);
    intr.gs_east_mps = 0.0;
    intr.gs_north_mps = 0.0;
    intr.vs_mps = -10.0;

    let fleet = Fleet { aircraft: vec![own, intr] };
    let batch = Batch {
        pairs: vec![Pair {
            own: "OWN".into(),
            intr: "INTR".into(),
            qdr_deg: 0.0,
            dist_m: 50.0, // small but nonzero horizontal separation
            tcpa_s: 5.0,
            t_los_s: 7.62, // 152.4 / 20 m/s closure
        }],
        dtlookahead_s: 300.0,
    };

    let mut switches = SwitchState::default();
    switches.swresohoriz = false;
    switches.swresovert = true;
    let mut resolver = resolver_with(switches);
    resolver.create_aircraft("OWN".into());
    resolver.create_aircraft("INTR".into());

    let commands = resolver.resolve(&fleet, &batch, &NoWind, &NoLimit, 1.0);
    assert!(commands[0].vs_mps < 10.0, "ownship must reduce its climb rate");
}

/// S5 — recovery, criterion 1 fails, criterion 2 passes: own's
/// autopilot-desired track (north) closes with the intruder's *current*
/// track (south, head-on) but would have been clear of the intruder's
/// *baseline* track (north, parallel, snapshotted before it turned to
/// close). Expected: `free=false`, `active[OWN]` stays true, and OWN is
/// never redirected back to its route.
#[test]
fn s5_criterion1_fails_criterion2_passes_keeps_active() {
    let rpz = 5.0 * 1852.0;
    let north_offset_deg = (2.0 * rpz / 6_371_000.0).to_degrees();

    // Tick 1: intruder still flying parallel to OWN (north, same as OWN's
    // autopilot-desired track) — this is what gets snapshotted as its
    // baseline velocity for Criterion 2.
    let own = Aircraft::cruising("OWN", 0.0, 250.0, 10_000.0);
    let mut intr_parallel = Aircraft::cruising("INTR", 0.0, 250.0, 10_000.0);
    intr_parallel.lat_deg += north_offset_deg;
    let fleet_tick1 = Fleet { aircraft: vec![own.clone(), intr_parallel] };

    let batch = Batch {
        pairs: vec![Pair { own: "OWN".into(), intr: "INTR".into(), qdr_deg: 0.0, dist_m: 2.0 * rpz, tcpa_s: 10.0, t_los_s: 100.0 }],
        dtlookahead_s: 300.0,
    };

    let switches = SwitchState::default();
    let mut resolver = resolver_with(switches);
    resolver.create_aircraft("OWN".into());
    resolver.create_aircraft("INTR".into());
    resolver.resolve(&fleet_tick1, &batch, &NoWind, &NoLimit, 1.0);

    // Tick 2: intruder has turned to close head-on with OWN. OWN's
    // autopilot-desired track (still north) is unchanged.
    let mut intr_closing = Aircraft::cruising("INTR", 180.0, 250.0, 10_000.0);
    intr_closing.lat_deg += north_offset_deg;
    let fleet_tick2 = Fleet { aircraft: vec![own, intr_closing] };

    let mut route = CountingRoute::default();
    resolver.resume_nav(&fleet_tick2, &batch, &NoWind, &mut route);

    let own_idx = resolver.engagement_state().index_of("OWN").unwrap();
    assert!(resolver.engagement_state().is_active(own_idx), "criterion 1 failing must keep OWN active");
    assert!(resolver.engagement_state().resopairs().contains(&("OWN".to_string(), "INTR".to_string())));
    assert!(route.directed.is_empty(), "OWN must not be released back to its route");
}

/// S6 — bouncing conflict: nearly-parallel tracks just inside rpz must
/// stay flagged as resolving, driven through the real recovery state
/// machine rather than asserted as bare arithmetic.
#[test]
fn s6_bouncing_conflict_detected() {
    let rpz = 5.0 * 1852.0;
    let hdist = 0.95 * rpz;
    let north_offset_deg = (hdist / 6_371_000.0).to_degrees();

    let own = Aircraft::cruising("OWN", 88.0, 250.0, 10_000.0);
    let mut intr = Aircraft::cruising("INTR", 90.0, 250.0, 10_000.0);
    intr.lat_deg += north_offset_deg;
    let fleet = Fleet { aircraft: vec![own, intr] };

    let batch = Batch {
        pairs: vec![Pair { own: "OWN".into(), intr: "INTR".into(), qdr_deg: 0.0, dist_m: hdist, tcpa_s: 30.0, t_los_s: 100.0 }],
        dtlookahead_s: 300.0,
    };

    let switches = SwitchState::default();
    let mut resolver = resolver_with(switches);
    resolver.create_aircraft("OWN".into());
    resolver.create_aircraft("INTR".into());
    resolver.resolve(&fleet, &batch, &NoWind, &NoLimit, 1.0);

    let mut route = CountingRoute::default();
    resolver.resume_nav(&fleet, &batch, &NoWind, &mut route);

    let own_idx = resolver.engagement_state().index_of("OWN").unwrap();
    assert!(resolver.engagement_state().is_active(own_idx), "bouncing pair must stay active");
    assert!(resolver.engagement_state().resopairs().contains(&("OWN".to_string(), "INTR".to_string())));
    assert!(route.directed.is_empty());
}

/// Array-resize invariance (spec.md §8 universal property 6): after N
/// creates and M deletes, engagement-state columns track `ntraf`.
#[test]
fn array_resize_invariance_after_creates_and_deletes() {
    let switches = SwitchState::default();
    let mut resolver = resolver_with(switches);
    for id in ["A1", "A2", "A3", "A4"] {
        resolver.create_aircraft(id.to_string());
    }
    resolver.delete_aircraft("A2");
    resolver.delete_aircraft("A4");
    assert_eq!(resolver.engagement_state().ntraf(), 2);
    assert_eq!(resolver.engagement_state().ids(), &["A1".to_string(), "A3".to_string()]);
}
