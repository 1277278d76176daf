//! Error types (spec.md §7).
//!
//! The resolver's tick loop (`aggregate`, `command`, `recovery`) never
//! returns `Result`: per spec.md §7, numerical edge cases are always
//! recovered locally and missing aircraft indices skip silently. `Result`
//! only shows up at the filesystem/CLI boundary, grounded in
//! `safety_net_generator/src/main.rs`'s `serde_yaml::from_reader` +
//! `anyhow` pattern.

use thiserror::Error;

/// Failure loading a [`crate::config::ResolverConfig`] from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Internal match-fail paths for the command surface (§4.F); converted to
/// the `(bool, String)` wire contract at the boundary rather than
/// propagated as `Result`, since spec.md §6.1 specifies that tuple as the
/// command surface's actual return type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("RMETH Not Understood\nRMETHH [ON / BOTH / OFF / NONE / SPD / HDG]")]
    UnknownRmethh,
    #[error("RMETV Not Understood\nRMETHV [ON / V/S / OFF / NONE]")]
    UnknownRmethv,
    #[error("Priority code Not Understood. Available Options: [\"FF1\", \"FF2\", \"FF3\", \"LAY1\", \"LAY2\"]")]
    UnknownPriorityCode,
    #[error("unknown aircraft identifier {0}")]
    UnknownAircraft(String),
}
