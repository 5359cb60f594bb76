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

//! A single airport and the slice of apt.dat text that defines it.
//!
//! The airport header line (row code 1, 16, or 17) has the layout:
//!
//! ```text
//! 1 <elevation ft> <has ATC> <deprecated> <id> <name...>
//! ```
//!
//! Everything else about the airport is kept as raw lines and inspected on
//! demand via row codes.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::{AptDatError, Result};
use crate::line::{AptDatLine, RowCode, RunwayType};
use crate::{ensure_dat_extension, write_file_footer, write_file_header, WED_LINE_ENDING};

// Header token positions
const HEADER_ELEVATION: usize = 1;
const HEADER_HAS_ATC: usize = 2;
const HEADER_ID: usize = 4;
const HEADER_NAME: usize = 5;

const TAXIWAY_CODES: [i32; 2] = [113, 114];
const TAXI_ROUTE_CODE: i32 = 1200;
const TRAFFIC_FLOW_CODE: i32 = 1000;
const GROUND_ROUTE_CODES: [i32; 3] = [1400, 1401, 1200];
const TAXIWAY_SIGN_CODE: i32 = 20;
const COMM_FREQ_CODES: [i32; 7] = [50, 51, 52, 53, 54, 55, 56];

/// A single airport from an apt.dat file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Airport {
    /// The name of the airport, like "Seattle-Tacoma Intl".
    pub name: String,
    /// The X-Plane identifier, which may or may not match the ICAO code.
    pub id: String,
    /// Path of the apt.dat file this airport was read from (empty if unknown).
    pub from_file: String,
    /// True if the header marks the airport as having air traffic control.
    pub has_atc: bool,
    /// Elevation in feet above mean sea level, from the header line.
    pub elevation_ft_amsl: f64,
    /// Every line of the apt.dat file that belongs to this airport.
    pub text: Vec<AptDatLine>,
}

impl Airport {
    /// Build an airport from its lines.
    ///
    /// Exactly one of the lines must be an airport header.
    pub fn from_lines<I, L>(lines: I, from_file: &str) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<AptDatLine>,
    {
        let text: Vec<AptDatLine> = lines.into_iter().map(Into::into).collect();

        let headers: Vec<&AptDatLine> = text.iter().filter(|l| l.is_airport_header()).collect();
        let header = match headers.as_slice() {
            [] => {
                return Err(AptDatError::MissingAirportHeader {
                    from_file: from_file.to_owned(),
                })
            }
            [header] => *header,
            _ => {
                return Err(AptDatError::MultipleAirportHeaders {
                    from_file: from_file.to_owned(),
                    count: headers.len(),
                })
            }
        };

        let tokens = header.tokens();
        let id = tokens
            .get(HEADER_ID)
            .map(|id| (*id).to_owned())
            .ok_or_else(|| AptDatError::MissingField {
                field: "airport id",
                line: header.raw().to_owned(),
            })?;
        let name = tokens.get(HEADER_NAME..).unwrap_or_default().join(" ");
        let elevation_ft_amsl = parse_token::<f64>(header, HEADER_ELEVATION, "elevation")?;
        let has_atc = parse_token::<i64>(header, HEADER_HAS_ATC, "has_atc")? != 0;

        debug!("Parsed airport {} ({} lines) from '{}'", id, text.len(), from_file);

        Ok(Self {
            name,
            id,
            from_file: from_file.to_owned(),
            has_atc,
            elevation_ft_amsl,
            text,
        })
    }

    /// Build an airport from the portion of an apt.dat file that describes it.
    pub fn parse(file_text: &str, from_file: &str) -> Result<Self> {
        Self::from_lines(file_text.lines(), from_file)
    }

    /// True if this airport has an identifier.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
    }

    /// The first `num_lines` raw lines of this airport's text.
    #[must_use]
    pub fn head(&self, num_lines: usize) -> String {
        self.text
            .iter()
            .take(num_lines)
            .map(AptDatLine::raw)
            .collect::<Vec<_>>()
            .join(WED_LINE_ENDING)
    }

    /// True if any line in the airport begins with `row_code`.
    ///
    /// String codes are classified like line tokens, so `"1302"` matches the
    /// numeric row code 1302.
    #[must_use]
    pub fn has_row_code(&self, row_code: impl Into<RowCode>) -> bool {
        let row_code = row_code.into();
        self.text.iter().any(|line| *line.row_code() == row_code)
    }

    /// True if any line in the airport begins with one of `row_codes`.
    #[must_use]
    pub fn has_any_row_code<I, C>(&self, row_codes: I) -> bool
    where
        I: IntoIterator<Item = C>,
        C: Into<RowCode>,
    {
        let wanted: Vec<RowCode> = row_codes.into_iter().map(Into::into).collect();
        self.text.iter().any(|line| wanted.contains(line.row_code()))
    }

    /// True if this airport defines any taxiway geometry.
    #[must_use]
    pub fn has_taxiway(&self) -> bool {
        self.has_any_row_code(TAXIWAY_CODES)
    }

    /// True if this airport defines routing rules for ATC's use of its taxiways.
    #[must_use]
    pub fn has_taxi_route(&self) -> bool {
        self.has_row_code(TAXI_ROUTE_CODE)
    }

    /// True if this airport defines when and under what conditions ATC uses
    /// each runway.
    #[must_use]
    pub fn has_traffic_flow(&self) -> bool {
        self.has_row_code(TRAFFIC_FLOW_CODE)
    }

    /// True if this airport defines destinations or parking for ground
    /// vehicles, or taxi routes.
    #[must_use]
    pub fn has_ground_routes(&self) -> bool {
        self.has_any_row_code(GROUND_ROUTE_CODES)
    }

    /// True if this airport defines any taxiway signs.
    #[must_use]
    pub fn has_taxiway_sign(&self) -> bool {
        self.has_row_code(TAXIWAY_SIGN_CODE)
    }

    /// True if this airport defines ATC radio frequencies.
    #[must_use]
    pub fn has_comm_freq(&self) -> bool {
        self.has_any_row_code(COMM_FREQ_CODES)
    }

    /// Latitude of the airport, which X-Plane takes as the centre of the
    /// first runway.
    pub fn latitude(&self) -> Result<f64> {
        self.location().map(|(lat, _)| lat)
    }

    /// Longitude of the airport, which X-Plane takes as the centre of the
    /// first runway.
    pub fn longitude(&self) -> Result<f64> {
        self.location().map(|(_, lon)| lon)
    }

    /// `(latitude, longitude)` of the centre of the first runway.
    pub fn location(&self) -> Result<(f64, f64)> {
        let (runway, runway_type) = self
            .text
            .iter()
            .find_map(|line| line.runway_type().map(|kind| (line, kind)))
            .ok_or_else(|| AptDatError::NoRunways { id: self.id.clone() })?;

        match runway_type {
            RunwayType::LandRunway => Ok((
                midpoint(runway, 9, 18, "latitude")?,
                midpoint(runway, 10, 19, "longitude")?,
            )),
            RunwayType::WaterRunway => Ok((
                midpoint(runway, 4, 7, "latitude")?,
                midpoint(runway, 5, 8, "longitude")?,
            )),
            RunwayType::Helipad => Ok((
                parse_token(runway, 2, "latitude")?,
                parse_token(runway, 3, "longitude")?,
            )),
        }
    }

    /// Write a complete apt.dat file containing only this airport.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_file_header(writer)?;
        write!(writer, "{self}{WED_LINE_ENDING}")?;
        write_file_footer(writer)?;
        Ok(())
    }

    /// Write a complete apt.dat file containing only this airport to `path`,
    /// which must end in `.dat`.
    pub fn write_to_disk(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        ensure_dat_extension(path)?;

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;

        info!("Wrote airport {} to {}", self.id, path.display());
        Ok(())
    }
}

/// The raw apt.dat text of the airport.
impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.text.iter().enumerate() {
            if i > 0 {
                f.write_str(WED_LINE_ENDING)?;
            }
            f.write_str(line.raw())?;
        }
        Ok(())
    }
}

/// Parse the token at `index` of `line`.
fn parse_token<T: std::str::FromStr>(line: &AptDatLine, index: usize, field: &'static str) -> Result<T> {
    let token = line.token(index).ok_or_else(|| AptDatError::MissingField {
        field,
        line: line.raw().to_owned(),
    })?;
    token.parse::<T>().map_err(|_| AptDatError::InvalidField {
        field,
        value: token.to_owned(),
    })
}

/// Average of two coordinate tokens.
fn midpoint(line: &AptDatLine, first: usize, second: usize, field: &'static str) -> Result<f64> {
    let a: f64 = parse_token(line, first, field)?;
    let b: f64 = parse_token(line, second, field)?;
    Ok(0.5 * (a + b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KSEA: &str = "\
1    433 1 0 KSEA Seattle-Tacoma Intl
1302 city Seattle
100 45.72 1 0 0.25 1 3 0 16L 47.46375 -122.30798 0 0 3 2 1 0 34R 47.43098 -122.30807 0 0 3 2 1 0
100 45.72 1 0 0.25 1 3 0 16C 47.46376 -122.31101 0 0 3 2 1 0 34C 47.43102 -122.31101 0 0 3 2 1 0
110 1 0.25 150.00 A2 Taxiway
111 47.44 -122.30
113 47.45 -122.31
20 47.46 -122.30 90.0 0 2 {@L}A
1000 Generic flow
54 11990 ATIS
1200
1300 47.44 -122.30 180.0 gate jets|props A1";

    fn ksea() -> Airport {
        Airport::parse(KSEA, "apt.dat").unwrap()
    }

    #[test]
    fn test_parse_header_fields() {
        let apt = ksea();
        assert_eq!(apt.id, "KSEA");
        assert_eq!(apt.name, "Seattle-Tacoma Intl");
        assert!(apt.has_atc);
        assert!((apt.elevation_ft_amsl - 433.0).abs() < f64::EPSILON);
        assert_eq!(apt.from_file, "apt.dat");
        assert_eq!(apt.text.len(), 12);
        assert!(apt.is_valid());
    }

    #[test]
    fn test_multi_word_name_is_normalized() {
        let apt = Airport::parse("1 10 0 0 X01  Everglades   Airpark", "").unwrap();
        assert_eq!(apt.name, "Everglades Airpark");
        assert!(!apt.has_atc);
    }

    #[test]
    fn test_missing_header() {
        let err = Airport::parse("100 45.72 1 0 0.25", "apt.dat").unwrap_err();
        assert!(matches!(err, AptDatError::MissingAirportHeader { from_file } if from_file == "apt.dat"));
    }

    #[test]
    fn test_multiple_headers() {
        let err = Airport::parse("1 0 0 0 AAA A\n1 0 0 0 BBB B", "apt.dat").unwrap_err();
        assert!(matches!(err, AptDatError::MultipleAirportHeaders { count: 2, .. }));
    }

    #[test]
    fn test_short_header_is_missing_field() {
        let err = Airport::parse("1 0 0 0", "").unwrap_err();
        assert!(matches!(err, AptDatError::MissingField { field: "airport id", .. }));
    }

    #[test]
    fn test_bad_elevation() {
        let err = Airport::parse("1 high 0 0 KAAA Somewhere", "").unwrap_err();
        assert!(matches!(err, AptDatError::InvalidField { field: "elevation", value } if value == "high"));
    }

    #[test]
    fn test_bad_atc_flag() {
        let err = Airport::parse("1 10 yes 0 KAAA A", "").unwrap_err();
        assert!(matches!(err, AptDatError::InvalidField { field: "has_atc", value } if value == "yes"));
    }

    #[test]
    fn test_non_numeric_elevation_with_valid_atc() {
        let err = Airport::parse("1 n/a 1 0 KAAA Somewhere", "").unwrap_err();
        assert!(matches!(err, AptDatError::InvalidField { field: "elevation", value } if value == "n/a"));
    }

    #[test]
    fn test_feature_predicates() {
        let apt = ksea();
        assert!(apt.has_taxiway());
        assert!(apt.has_taxi_route());
        assert!(apt.has_traffic_flow());
        assert!(apt.has_ground_routes());
        assert!(apt.has_taxiway_sign());
        assert!(apt.has_comm_freq());

        let bare = Airport::parse("1 0 0 0 KAAA Bare\n100 10 1 0 0.25 0 0 0 09 1 1 0 0 0 0 0 0 27 1 2 0 0 0 0 0 0", "").unwrap();
        assert!(!bare.has_taxiway());
        assert!(!bare.has_taxi_route());
        assert!(!bare.has_traffic_flow());
        assert!(!bare.has_ground_routes());
        assert!(!bare.has_taxiway_sign());
        assert!(!bare.has_comm_freq());
    }

    #[test]
    fn test_has_row_code_variants() {
        let apt = ksea();
        assert!(apt.has_row_code(1302));
        assert!(apt.has_row_code("1302"));
        assert!(!apt.has_row_code(1301));
        assert!(apt.has_any_row_code([1301, 1300]));
        assert!(!apt.has_any_row_code(Vec::<i32>::new()));
    }

    #[test]
    fn test_land_runway_location() {
        let apt = ksea();
        let lat = apt.latitude().unwrap();
        let lon = apt.longitude().unwrap();
        assert!((lat - 0.5 * (47.46375 + 47.43098)).abs() < 1e-9);
        assert!((lon - 0.5 * (-122.30798 + -122.30807)).abs() < 1e-9);
    }

    #[test]
    fn test_water_runway_location() {
        let apt = Airport::parse("16 0 0 0 W01 Lake Base\n101 49 0 18 47.0 -122.0 36 47.2 -122.4", "").unwrap();
        let (lat, lon) = apt.location().unwrap();
        assert!((lat - 47.1).abs() < 1e-9);
        assert!((lon - -122.2).abs() < 1e-9);
    }

    #[test]
    fn test_helipad_location() {
        let apt = Airport::parse("17 0 0 0 H01 Pad\n102 H1 47.5 -122.5 0 10 10 1 0 0 0.25 0", "").unwrap();
        assert!((apt.latitude().unwrap() - 47.5).abs() < 1e-9);
        assert!((apt.longitude().unwrap() - -122.5).abs() < 1e-9);
    }

    #[test]
    fn test_no_runways() {
        let apt = Airport::parse("1 0 0 0 KAAA Nothing", "").unwrap();
        assert!(matches!(apt.latitude(), Err(AptDatError::NoRunways { id }) if id == "KAAA"));
    }

    #[test]
    fn test_display_and_head_keep_raw_text() {
        let apt = ksea();
        assert_eq!(apt.to_string(), KSEA);
        assert_eq!(apt.head(2), "1    433 1 0 KSEA Seattle-Tacoma Intl\n1302 city Seattle");
        assert_eq!(apt.head(100), KSEA);
        assert_eq!(apt.head(0), "");
    }

    #[test]
    fn test_write_to_layout() {
        let apt = Airport::parse("1 0 0 0 KAAA A\n1302 city X", "").unwrap();
        let mut out = Vec::new();
        apt.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "I\n1100 Generated by WorldEditor\n\n1 0 0 0 KAAA A\n1302 city X\n99\n"
        );
    }

    #[test]
    fn test_write_to_disk_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let err = ksea().write_to_disk(dir.path().join("ksea.txt")).unwrap_err();
        assert!(matches!(err, AptDatError::InvalidExtension(_)));
    }

    #[test]
    fn test_write_to_disk_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("KSEA.dat");
        ksea().write_to_disk(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let reread = crate::AptDat::from_file_text(&text, "KSEA.dat").unwrap();
        assert_eq!(reread.len(), 1);
        assert_eq!(reread[0].text, ksea().text);
    }
}
