//! Configuration surface (spec.md §4.F, §6.1) and switch state (§3).
//!
//! Grounded in `original_source/bluesky/traffic/asas/mvp.py`'s
//! `setresometh`/`setresometv`/`setprio` stack commands, which this module
//! ports verbatim in behaviour. The YAML-loadable [`ResolverConfig`] follows
//! `safety_net_generator::Config`'s `serde`+`serde_yaml` pattern for seeding
//! the initial switch state; from then on the switches are only ever
//! mutated through [`CommandSurface`], per spec.md §9 ("the resolution-method
//! and priority switches are a configuration block, not a global").

use serde::{Deserialize, Serialize};

use crate::error::CommandError;
use crate::state::EngagementState;

/// The five priority codes BlueSky calls `FF1`/`FF2`/`FF3`/`LAY1`/`LAY2`
/// (spec.md §4.B), represented as a tagged variant rather than compared as
/// strings (spec.md §9 re-architecture guidance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityCode {
    /// Free Flight Primary: no priority, both aircraft share.
    FF1,
    /// Free Flight Secondary: cruising aircraft has priority.
    FF2,
    /// Free Flight Tertiary: climbing/descending aircraft has priority.
    FF3,
    /// Layers Primary: cruising has priority, horizontal only.
    LAY1,
    /// Layers Secondary: climbing/descending has priority, horizontal only.
    LAY2,
}

impl PriorityCode {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "FF1" => Some(Self::FF1),
            "FF2" => Some(Self::FF2),
            "FF3" => Some(Self::FF3),
            "LAY1" => Some(Self::LAY1),
            "LAY2" => Some(Self::LAY2),
            _ => None,
        }
    }
}

impl std::fmt::Display for PriorityCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FF1 => "FF1",
            Self::FF2 => "FF2",
            Self::FF3 => "FF3",
            Self::LAY1 => "LAY1",
            Self::LAY2 => "LAY2",
        };
        f.write_str(s)
    }
}

/// Process-wide (within the resolver instance) resolution-method and
/// priority switches (spec.md §3 "Switch state").
///
/// Invariant: `swresohoriz` and `swresovert` are mutually exclusive when
/// either is on; both may be false simultaneously, meaning combined
/// horizontal + vertical resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchState {
    pub swresohoriz: bool,
    pub swresovert: bool,
    pub swresospd: bool,
    pub swresohdg: bool,
    pub swprio: bool,
    pub priocode: PriorityCode,
}

impl Default for SwitchState {
    fn default() -> Self {
        // spec.md §6.1 defaults.
        Self {
            swresohoriz: true,
            swresovert: false,
            swresospd: false,
            swresohdg: false,
            swprio: false,
            priocode: PriorityCode::FF1,
        }
    }
}

/// YAML-serializable seed for a resolver instance's initial switch state and
/// safety multipliers, mirroring `safety_net_generator::Config`'s role of
/// seeding a run from a config file rather than hard-coded defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub switches: SwitchState,
    #[serde(default = "default_resofach")]
    pub resofach: f64,
    #[serde(default = "default_resofacv")]
    pub resofacv: f64,
}

fn default_resofach() -> f64 {
    1.0
}

fn default_resofacv() -> f64 {
    1.0
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            switches: SwitchState::default(),
            resofach: default_resofach(),
            resofacv: default_resofacv(),
        }
    }
}

/// Implements the text command surface of spec.md §6.1. Each command
/// returns `(ok, message)`: `ok=false` for a rejected/misunderstood
/// argument, and echoing current state is required when no argument is
/// supplied, exactly as `mvp.py`'s `setresometh`/`setresometv`/`setprio` do.
#[derive(Debug, Default)]
pub struct CommandSurface;

impl CommandSurface {
    /// `RMETHH [ON|BOTH|OFF|NONE|SPD|HDG]`
    pub fn rmethh(switches: &mut SwitchState, value: Option<&str>) -> (bool, String) {
        let value = match value {
            None | Some("") => {
                return (
                    true,
                    format!(
                        "RMETHH [ON / BOTH / OFF / NONE / SPD / HDG]\n\
                         Horizontal resolution limitation is currently {}\n\
                         Speed resolution limitation is currently {}\n\
                         Heading resolution limitation is currently {}",
                        on_off(switches.swresohoriz),
                        on_off(switches.swresospd),
                        on_off(switches.swresohdg),
                    ),
                )
            }
            Some(v) => v,
        };

        match value {
            "ON" | "BOTH" => {
                switches.swresohoriz = true;
                switches.swresospd = true;
                switches.swresohdg = true;
                switches.swresovert = false;
            }
            "OFF" | "OF" | "NONE" => {
                // Do NOT switch off swresovert when value == OFF.
                switches.swresohoriz = false;
                switches.swresospd = false;
                switches.swresohdg = false;
            }
            "SPD" => {
                switches.swresohoriz = true;
                switches.swresospd = true;
                switches.swresohdg = false;
                switches.swresovert = false;
            }
            "HDG" => {
                switches.swresohoriz = true;
                switches.swresospd = false;
                switches.swresohdg = true;
                switches.swresovert = false;
            }
            _ => return (false, CommandError::UnknownRmethh.to_string()),
        }
        (true, String::new())
    }

    /// `RMETHV [ON|V/S|OFF|NONE]`
    pub fn rmethv(switches: &mut SwitchState, value: Option<&str>) -> (bool, String) {
        let value = match value {
            None | Some("") => {
                return (
                    true,
                    format!(
                        "RMETHV [ON / V/S / OFF / NONE]\nVertical resolution limitation is currently {}",
                        on_off(switches.swresovert),
                    ),
                )
            }
            Some(v) => v,
        };

        match value {
            "ON" | "V/S" => {
                switches.swresovert = true;
                switches.swresohoriz = false;
                switches.swresospd = false;
                switches.swresohdg = false;
            }
            "OFF" | "OF" | "NONE" => {
                // Do NOT switch off swresohoriz when value == OFF.
                switches.swresovert = false;
            }
            _ => return (false, CommandError::UnknownRmethv.to_string()),
        }
        (true, String::new())
    }

    /// `PRIORULES [ON|OFF] <CODE>`
    pub fn priorules(switches: &mut SwitchState, flag: Option<bool>, priocode: Option<&str>) -> (bool, String) {
        if flag.is_none() {
            return (
                true,
                format!(
                    "PRIORULES [ON/OFF] [PRIOCODE]\n\
                     Available priority codes: \n\
                     \u{20}    FF1:  Free Flight Primary (No Prio) \n\
                     \u{20}    FF2:  Free Flight Secondary (Cruising has priority)\n\
                     \u{20}    FF3:  Free Flight Tertiary (Climbing/descending has priority)\n\
                     \u{20}    LAY1: Layers Primary (Cruising has priority + horizontal resolutions)\n\
                     \u{20}    LAY2: Layers Secondary (Climbing/descending has priority + horizontal resolutions)\n\
                     Priority is currently {}\n\
                     Priority code is currently: {}",
                    on_off(switches.swprio),
                    switches.priocode,
                ),
            );
        }

        if let Some(code_str) = priocode {
            match PriorityCode::parse(code_str) {
                Some(code) => switches.priocode = code,
                None => return (false, CommandError::UnknownPriorityCode.to_string()),
            }
        }
        switches.swprio = flag.unwrap();
        (true, String::new())
    }

    /// `NORESO <acid>` — the named aircraft is never avoided (others must
    /// avoid it, but it ignores every pair it's the intruder in).
    pub fn noreso(state: &mut EngagementState, acid: &str) -> (bool, String) {
        if state.index_of(acid).is_none() {
            return (false, CommandError::UnknownAircraft(acid.to_string()).to_string());
        }
        state.set_noreso(acid, true);
        (true, String::new())
    }

    /// `RESOOFF <acid>` — the named aircraft never receives a resolution
    /// command of its own.
    pub fn resooff(state: &mut EngagementState, acid: &str) -> (bool, String) {
        if state.index_of(acid).is_none() {
            return (false, CommandError::UnknownAircraft(acid.to_string()).to_string());
        }
        state.set_resooff(acid, true);
        (true, String::new())
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}
