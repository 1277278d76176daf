//! Demo CLI: load a resolver config, replay a fixture tick, print commands.
//!
//! Grounded in `safety_net_generator/src/main.rs`'s `clap` + `anyhow` +
//! `pretty_env_logger` + `serde_yaml` scaffolding. Not a production
//! surface: a way to poke the engine from outside a full simulator, the
//! same role `safety_net_generator`/`advisory_viewer` play for the NN CAS.

use std::fs;

use clap::Parser;
use mvp_resolver::collab::{ConflictBatch, PerformanceLimiter, RouteService, TrafficSnapshot, WindService};
use mvp_resolver::config::ResolverConfig;
use mvp_resolver::error::ConfigError;
use mvp_resolver::state::AircraftId;
use mvp_resolver::Resolver;

#[derive(Parser, Debug)]
#[clap(name = "resoctl", about = "Drive the MVP resolver against a fixture conflict")]
struct Args {
    /// Path to a YAML ResolverConfig. If omitted, defaults are used.
    #[clap(long)]
    config: Option<String>,
}

/// Two aircraft, head-on, 5 NM apart — the spec's S1 scenario.
struct FixtureTraffic {
    ids: Vec<AircraftId>,
}

impl TrafficSnapshot for FixtureTraffic {
    fn ntraf(&self) -> usize {
        2
    }
    fn id(&self, idx: usize) -> &AircraftId {
        &self.ids[idx]
    }
    fn lat_deg(&self, _idx: usize) -> f64 {
        52.0
    }
    fn lon_deg(&self, idx: usize) -> f64 {
        if idx == 0 {
            4.0
        } else {
            4.13
        }
    }
    fn alt_m(&self, _idx: usize) -> f64 {
        10_000.0
    }
    fn gs_east_mps(&self, idx: usize) -> f64 {
        if idx == 0 {
            250.0
        } else {
            -250.0
        }
    }
    fn gs_north_mps(&self, _idx: usize) -> f64 {
        0.0
    }
    fn vs_mps(&self, _idx: usize) -> f64 {
        0.0
    }
    fn tas_mps(&self, _idx: usize) -> f64 {
        250.0
    }
    fn trk_deg(&self, idx: usize) -> f64 {
        if idx == 0 {
            90.0
        } else {
            270.0
        }
    }
    fn sel_alt_m(&self, _idx: usize) -> f64 {
        10_000.0
    }
    fn sel_hdg_deg(&self, idx: usize) -> f64 {
        self.trk_deg(idx)
    }
    fn ap_vs_mps(&self, _idx: usize) -> f64 {
        0.0
    }
    fn ap_trk_deg(&self, idx: usize) -> f64 {
        self.trk_deg(idx)
    }
    fn ap_tas_mps(&self, _idx: usize) -> f64 {
        250.0
    }
    fn ax_mps2(&self, _idx: usize) -> f64 {
        2.0
    }
    fn rpz_m(&self, _idx: usize) -> f64 {
        5.0 * 1852.0
    }
    fn hpz_m(&self, _idx: usize) -> f64 {
        304.8
    }
}

struct FixtureBatch {
    ids: Vec<AircraftId>,
}

impl ConflictBatch for FixtureBatch {
    fn len(&self) -> usize {
        2
    }
    fn pair(&self, i: usize) -> (&AircraftId, &AircraftId) {
        if i == 0 {
            (&self.ids[0], &self.ids[1])
        } else {
            (&self.ids[1], &self.ids[0])
        }
    }
    fn qdr_deg(&self, i: usize) -> f64 {
        if i == 0 {
            90.0
        } else {
            270.0
        }
    }
    fn dist_m(&self, _i: usize) -> f64 {
        5.0 * 1852.0
    }
    fn tcpa_s(&self, _i: usize) -> f64 {
        18.5
    }
    fn t_los_s(&self, _i: usize) -> f64 {
        1.0e6
    }
    fn dtlookahead_s(&self) -> f64 {
        300.0
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

fn load_config(path: &Option<String>) -> anyhow::Result<ResolverConfig> {
    match path {
        None => Ok(ResolverConfig::default()),
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.clone(), source })?;
            let config = serde_yaml::from_str(&text)
                .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
            Ok(config)
        }
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let config = load_config(&args.config)?;
    log::info!("starting resoctl with config: {:?}", config);

    let mut resolver = Resolver::new(config);
    let ids = vec!["OWN".to_string(), "INTR".to_string()];
    resolver.create_aircraft(ids[0].clone());
    resolver.create_aircraft(ids[1].clone());

    let traffic = FixtureTraffic { ids: ids.clone() };
    let batch = FixtureBatch { ids };

    let commands = resolver.resolve(&traffic, &batch, &NoWind, &NoLimit, 1.0);
    for (idx, cmd) in commands.iter().enumerate() {
        println!("{}: {:?}", traffic.id(idx), cmd);
    }

    let mut route = NoRoute;
    resolver.resume_nav(&traffic, &batch, &NoWind, &mut route);

    Ok(())
}
