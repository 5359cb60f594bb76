// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Execution of the parsed command line.
//!
//! Every command writes its report to the supplied writer so output can be
//! captured in tests; logging goes through `log` to stderr.

use std::collections::HashSet;
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

use apt_dat::{Airport, AptDat, AptDatError, SortKey};
use log::{debug, info, warn};
use serde::Serialize;

use crate::cli::{Command, Feature};
use crate::config::AppConfig;

type CommandResult = Result<(), Box<dyn Error>>;

/// Flags describing which optional data an airport defines.
#[derive(Debug, Serialize)]
struct AirportFeatures {
    taxiway: bool,
    taxi_route: bool,
    traffic_flow: bool,
    ground_routes: bool,
    taxiway_sign: bool,
    comm_freq: bool,
}

/// Summary of one airport, printed by `show` and `info`.
#[derive(Debug, Serialize)]
struct AirportSummary<'a> {
    id: &'a str,
    name: &'a str,
    from_file: &'a str,
    elevation_ft_amsl: f64,
    has_atc: bool,
    latitude: Option<f64>,
    longitude: Option<f64>,
    lines: usize,
    features: AirportFeatures,
}

impl<'a> AirportSummary<'a> {
    fn new(airport: &'a Airport) -> Self {
        let location = match airport.location() {
            Ok(location) => Some(location),
            Err(e) => {
                debug!("No location for {}: {}", airport.id, e);
                None
            }
        };

        Self {
            id: &airport.id,
            name: &airport.name,
            from_file: &airport.from_file,
            elevation_ft_amsl: airport.elevation_ft_amsl,
            has_atc: airport.has_atc,
            latitude: location.map(|(lat, _)| lat),
            longitude: location.map(|(_, lon)| lon),
            lines: airport.text.len(),
            features: AirportFeatures {
                taxiway: airport.has_taxiway(),
                taxi_route: airport.has_taxi_route(),
                traffic_flow: airport.has_traffic_flow(),
                ground_routes: airport.has_ground_routes(),
                taxiway_sign: airport.has_taxiway_sign(),
                comm_freq: airport.has_comm_freq(),
            },
        }
    }

    fn write_text<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{} - {}", self.id, self.name)?;
        writeln!(out, "  elevation: {} ft AMSL", self.elevation_ft_amsl)?;
        writeln!(out, "  ATC: {}", if self.has_atc { "yes" } else { "no" })?;
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => writeln!(out, "  location: {lat:.6}, {lon:.6}")?,
            _ => writeln!(out, "  location: unknown (no runways)")?,
        }
        let f = &self.features;
        let present: Vec<&str> = [
            (f.taxiway, "taxiway"),
            (f.taxi_route, "taxi-route"),
            (f.traffic_flow, "traffic-flow"),
            (f.ground_routes, "ground-routes"),
            (f.taxiway_sign, "taxiway-sign"),
            (f.comm_freq, "comm-freq"),
        ]
        .into_iter()
        .filter_map(|(has, label)| has.then_some(label))
        .collect();
        if present.is_empty() {
            writeln!(out, "  features: none")?;
        } else {
            writeln!(out, "  features: {}", present.join(", "))?;
        }
        if !self.from_file.is_empty() {
            writeln!(out, "  file: {}", self.from_file)?;
        }
        Ok(())
    }
}

/// Run one command, reading the apt.dat at `file` (or the configured
/// default) when the command needs it.
pub fn run<W: Write>(command: Command, file: Option<&Path>, config: &AppConfig, out: &mut W) -> CommandResult {
    match command {
        Command::List { sort } => {
            let mut apt_dat = load(file, config)?;
            let key = match sort {
                Some(key) => key,
                None => config.sort_key()?,
            };
            apt_dat.sort(key);
            for airport in &apt_dat {
                writeln!(out, "{}\t{}", airport.id, airport.name)?;
            }
        }
        Command::Show { key, lines } => {
            let apt_dat = load(file, config)?;
            let airport = apt_dat.lookup(&key)?;
            AirportSummary::new(airport).write_text(out)?;
            writeln!(out)?;
            writeln!(out, "{}", airport.head(lines.unwrap_or(config.head_lines)))?;
        }
        Command::Info { key, json } => {
            let apt_dat = load(file, config)?;
            let summary = AirportSummary::new(apt_dat.lookup(&key)?);
            if json {
                serde_json::to_writer_pretty(&mut *out, &summary)?;
                writeln!(out)?;
            } else {
                summary.write_text(out)?;
            }
        }
        Command::Search { name, atc, feature } => {
            let apt_dat = load(file, config)?;
            let found = search(&apt_dat, name.as_deref(), atc, &feature);
            for airport in &found {
                writeln!(out, "{}\t{}", airport.id, airport.name)?;
            }
            info!("{} of {} airports matched", found.len(), apt_dat.len());
        }
        Command::Extract { id, output } => {
            let apt_dat = load(file, config)?;
            let airport = apt_dat
                .search_by_id(&id)?
                .ok_or_else(|| AptDatError::NotFound(id.clone()))?;
            airport.write_to_disk(&output)?;
            writeln!(out, "Wrote {} to {}", airport.id, output.display())?;
        }
        Command::Merge { inputs, output, sort } => {
            let merged = merge(&inputs, sort)?;
            merged.write_to_disk(&output)?;
            writeln!(out, "Wrote {} airports to {}", merged.len(), output.display())?;
        }
        Command::Config { set_default } => {
            let path = AppConfig::get_config_path()?;
            if let Some(default) = set_default {
                let updated = AppConfig {
                    default_apt_dat: Some(default),
                    ..config.clone()
                };
                updated.save()?;
                info!("Saved configuration to {}", path.display());
                show_config(&updated, &path, out)?;
            } else {
                show_config(config, &path, out)?;
            }
        }
    }
    Ok(())
}

fn load(file: Option<&Path>, config: &AppConfig) -> Result<AptDat, Box<dyn Error>> {
    let path = config.resolve_apt_dat(file).ok_or(
        "no apt.dat file given; pass --file or run `config --set-default <path>`",
    )?;
    Ok(AptDat::from_file(path)?)
}

/// Airports matching every supplied filter.
fn search<'a>(apt_dat: &'a AptDat, name: Option<&str>, atc: bool, features: &[Feature]) -> Vec<&'a Airport> {
    let by_name = name.map(|n| apt_dat.search_by_name(n));
    apt_dat.search_by_predicate(|airport| {
        by_name
            .as_ref()
            .is_none_or(|matches| matches.iter().any(|m| std::ptr::eq(*m, airport)))
            && (!atc || airport.has_atc)
            && features.iter().all(|feature| feature.present_in(airport))
    })
}

/// Concatenate several apt.dat files, optionally sorting the result.
fn merge(inputs: &[PathBuf], sort: Option<SortKey>) -> Result<AptDat, AptDatError> {
    let mut merged = AptDat::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    for input in inputs {
        let apt_dat = AptDat::from_file(input)?;
        for id in apt_dat.ids() {
            if !seen_ids.insert(id.to_uppercase()) {
                warn!("Airport {} from {} is already present", id, input.display());
            }
        }
        merged += apt_dat;
    }
    if let Some(key) = sort {
        merged.sort(key);
    }
    Ok(merged)
}

fn show_config<W: Write>(config: &AppConfig, path: &Path, out: &mut W) -> CommandResult {
    writeln!(out, "Config file: {}", path.display())?;
    serde_json::to_writer_pretty(&mut *out, config)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
I
1100 Generated by WorldEditor

1    433 1 0 KSEA Seattle-Tacoma Intl
100 45.72 1 0 0.25 1 3 0 16L 47.46375 -122.30798 0 0 3 2 1 0 34R 47.43098 -122.30807 0 0 3 2 1 0
54 11990 ATIS
1200

1   21 0 0 KBFI Boeing Field King Co Intl
100 60.96 1 0 0.25 1 3 0 14R 47.54 -122.31 0 0 3 2 1 0 32L 47.52 -122.30 0 0 3 2 1 0

99
";

    fn write_sample(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    fn run_to_string(command: Command, file: Option<&Path>) -> String {
        let mut out = Vec::new();
        run(command, file, &AppConfig::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_list_sorted_by_name_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(&dir, "apt.dat", SAMPLE);
        let output = run_to_string(Command::List { sort: None }, Some(&path));
        assert_eq!(output, "KBFI\tBoeing Field King Co Intl\nKSEA\tSeattle-Tacoma Intl\n");
    }

    #[test]
    fn test_list_with_explicit_sort() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(&dir, "apt.dat", SAMPLE);
        let output = run_to_string(Command::List { sort: Some(SortKey::Elevation) }, Some(&path));
        assert!(output.starts_with("KBFI"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut out = Vec::new();
        let result = run(Command::List { sort: None }, None, &AppConfig::default(), &mut out);
        assert!(result.is_err());
    }

    #[test]
    fn test_show_prints_summary_and_head() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(&dir, "apt.dat", SAMPLE);
        let output = run_to_string(
            Command::Show {
                key: "ksea".to_string(),
                lines: Some(1),
            },
            Some(&path),
        );
        assert!(output.starts_with("KSEA - Seattle-Tacoma Intl\n"));
        assert!(output.contains("  ATC: yes\n"));
        assert!(output.contains("  features: taxi-route, ground-routes, comm-freq\n"));
        assert!(output.ends_with("\n1    433 1 0 KSEA Seattle-Tacoma Intl\n"));
    }

    #[test]
    fn test_info_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(&dir, "apt.dat", SAMPLE);
        let output = run_to_string(
            Command::Info {
                key: "Boeing Field King Co Intl".to_string(),
                json: true,
            },
            Some(&path),
        );
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["id"], "KBFI");
        assert_eq!(value["has_atc"], false);
        assert!((value["latitude"].as_f64().unwrap() - 47.53).abs() < 1e-9);
        assert_eq!(value["features"]["comm_freq"], false);
    }

    #[test]
    fn test_info_unknown_airport() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(&dir, "apt.dat", SAMPLE);
        let mut out = Vec::new();
        let result = run(
            Command::Info {
                key: "KPAE".to_string(),
                json: false,
            },
            Some(&path),
            &AppConfig::default(),
            &mut out,
        );
        assert!(result.unwrap_err().to_string().contains("KPAE"));
    }

    #[test]
    fn test_search_filters_combine() {
        let apt_dat = AptDat::from_file_text(SAMPLE, "apt.dat").unwrap();

        let ids = |found: Vec<&Airport>| found.iter().map(|a| a.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(search(&apt_dat, None, false, &[])), vec!["KSEA", "KBFI"]);
        assert_eq!(ids(search(&apt_dat, None, true, &[])), vec!["KSEA"]);
        assert_eq!(ids(search(&apt_dat, None, false, &[Feature::CommFreq])), vec!["KSEA"]);
        assert_eq!(ids(search(&apt_dat, Some("seattle-tacoma intl"), false, &[])), vec!["KSEA"]);
        assert!(search(&apt_dat, Some("Boeing Field King Co Intl"), true, &[]).is_empty());
        assert!(search(&apt_dat, None, false, &[Feature::Taxiway]).is_empty());
    }

    #[test]
    fn test_extract_writes_single_airport() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(&dir, "apt.dat", SAMPLE);
        let output_path = dir.path().join("KBFI.dat");
        run_to_string(
            Command::Extract {
                id: "KBFI".to_string(),
                output: output_path.clone(),
            },
            Some(&path),
        );

        let extracted = AptDat::from_file(&output_path).unwrap();
        assert_eq!(extracted.ids().collect::<Vec<_>>(), vec!["KBFI"]);
    }

    #[test]
    fn test_merge_concatenates_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_sample(&dir, "first.dat", SAMPLE);
        let second = write_sample(&dir, "second.dat", "1 600 0 0 KPAE Everett Paine Fld\n");

        let merged = merge(&[second.clone(), first.clone()], None).unwrap();
        assert_eq!(merged.ids().collect::<Vec<_>>(), vec!["KPAE", "KSEA", "KBFI"]);

        let sorted = merge(&[second, first], Some(SortKey::Id)).unwrap();
        assert_eq!(sorted.ids().collect::<Vec<_>>(), vec!["KBFI", "KPAE", "KSEA"]);
    }

    #[test]
    fn test_merge_keeps_airports_with_shared_ids() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_sample(&dir, "first.dat", SAMPLE);
        let second = write_sample(&dir, "second.dat", "1 20 0 0 ksea Seattle Duplicate\n1 600 0 0 KPAE Everett Paine Fld\n");

        let merged = merge(&[first, second], None).unwrap();
        assert_eq!(merged.ids().collect::<Vec<_>>(), vec!["KSEA", "KBFI", "ksea", "KPAE"]);
        assert!(matches!(merged.search_by_id("KSEA"), Err(AptDatError::DuplicateId(_))));
    }

    #[test]
    fn test_merge_command_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_sample(&dir, "first.dat", SAMPLE);
        let output_path = dir.path().join("merged.dat");
        let output = run_to_string(
            Command::Merge {
                inputs: vec![first],
                output: output_path.clone(),
                sort: None,
            },
            None,
        );
        assert!(output.starts_with("Wrote 2 airports"));
        assert_eq!(AptDat::from_file(&output_path).unwrap().len(), 2);
    }

    #[test]
    fn test_merge_rejects_bad_extension() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_sample(&dir, "first.dat", SAMPLE);
        let mut out = Vec::new();
        let result = run(
            Command::Merge {
                inputs: vec![first],
                output: dir.path().join("merged.txt"),
                sort: None,
            },
            None,
            &AppConfig::default(),
            &mut out,
        );
        assert!(result.is_err());
    }
}
