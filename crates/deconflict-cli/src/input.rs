//! Scenario files and raw waypoint text.

use crate::config::ParameterOverrides;
use anyhow::{bail, Context, Result};
use deconflict_core::{Mission, Waypoint};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A primary mission, the traffic it must clear, and optional parameters.
///
/// ```json
/// {
///   "primary": {"mission_id": "PRIMARY", "start_time": 0, "end_time": 120,
///               "waypoints": [{"x": 0, "y": 0, "z": 50, "t": 0}, ...]},
///   "others": [{"flight_id": "UAV_1", ...}],
///   "parameters": {"safety_buffer": 50, "time_step": 5}
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub primary: Mission,
    #[serde(default)]
    pub others: Vec<Mission>,
    #[serde(default)]
    pub parameters: ParameterOverrides,
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse scenario {}", path.display()))
}

pub fn load_waypoints(path: &Path) -> Result<Vec<Waypoint>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read waypoints {}", path.display()))?;
    parse_waypoints(&raw).with_context(|| format!("invalid waypoints in {}", path.display()))
}

/// Parse one `x,y,z,t` waypoint per line. Blank lines and lines starting
/// with `#` are skipped.
pub fn parse_waypoints(text: &str) -> Result<Vec<Waypoint>> {
    let mut waypoints = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            bail!(
                "line {}: expected 4 comma-separated values x,y,z,t, got {}",
                line_no,
                fields.len()
            );
        }

        let mut values = [0.0_f64; 4];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field
                .parse()
                .with_context(|| format!("line {}: invalid number '{}'", line_no, field))?;
        }
        let [x, y, z, t] = values;
        waypoints.push(Waypoint::new(x, y, z, t));
    }

    if waypoints.is_empty() {
        bail!("no waypoints found");
    }
    Ok(waypoints)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_waypoints_skips_comments() {
        let text = "# x,y,z,t\n0,0,50,0\n\n  100, 0, 50, 10  \n# end\n";
        let waypoints = parse_waypoints(text).unwrap();
        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints[1], Waypoint::new(100.0, 0.0, 50.0, 10.0));
    }

    #[test]
    fn test_parse_waypoints_reports_line() {
        let err = parse_waypoints("0,0,50,0\n1,2,3\n").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));

        let err = parse_waypoints("0,0,50,0\n\n1,2,abc,4\n").unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("line 3"));
        assert!(message.contains("abc"));
    }

    #[test]
    fn test_parse_waypoints_empty() {
        assert!(parse_waypoints("# nothing here\n\n").is_err());
    }

    #[test]
    fn test_scenario_parses_aliases_and_defaults() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "primary": {"mission_id": "P", "start_time": 0, "end_time": 100,
                            "waypoints": [{"x": 0, "y": 0, "z": 50, "t": 0},
                                          {"x": 100, "y": 0, "z": 50, "t": 100}]},
                "others": [{"flight_id": "UAV_1", "start_time": 0, "end_time": 100,
                            "waypoints": [{"x": 0, "y": 10, "z": 50, "time": 0}]}]
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.primary.mission_id(), "P");
        assert_eq!(scenario.others[0].mission_id(), "UAV_1");
        assert_eq!(scenario.parameters, ParameterOverrides::default());
    }

    #[test]
    fn test_scenario_rejects_invalid_mission() {
        let result: std::result::Result<Scenario, _> = serde_json::from_str(
            r#"{"primary": {"mission_id": "P", "start_time": 10, "end_time": 5,
                            "waypoints": [{"x": 0, "y": 0, "z": 0, "t": 0}]}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_demo_files_load() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        let scenario = load_scenario(&demos.join("crossing.json")).unwrap();
        assert_eq!(scenario.others.len(), 2);
        assert_eq!(scenario.parameters.time_step, Some(5.0));

        let route = load_waypoints(&demos.join("route.csv")).unwrap();
        assert_eq!(route.len(), 4);
        assert_eq!(route[3], Waypoint::new(0.0, 100.0, 60.0, 90.0));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = load_scenario(Path::new("no/such/scenario.json")).unwrap_err();
        assert!(err.to_string().contains("no/such/scenario.json"));
    }
}
