//! Deconfliction CLI - glue between files, environment and the core engine.
//!
//! - `config`: engine parameters from the environment and overrides
//! - `input`: scenario files and raw `x,y,z,t` waypoint text
//! - `output`: JSON documents printed by the `deconflict` binary

pub mod config;
pub mod input;
pub mod output;

pub use config::{Config, ParameterOverrides};
pub use input::{load_scenario, load_waypoints, parse_waypoints, Scenario};
pub use output::{AnalysisOutput, FlightMetrics, TrajectoryOutput};
