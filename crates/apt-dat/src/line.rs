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

//! Classification of individual apt.dat lines.
//!
//! Every line in an apt.dat file starts with a "row code" identifying what the
//! rest of the line describes:
//!
//! ```text
//! 1      433 1 0 KSEA Seattle-Tacoma Intl
//! 100 45.72 1 0 0.25 1 3 0 16L 47.46375 -122.30798 ...
//! 99
//! ```

use std::fmt;

/// Row codes that open a new airport, seaport, or heliport.
const AIRPORT_HEADER_CODES: [i32; 3] = [1, 16, 17];

/// Row code marking the end of the file.
const END_OF_FILE_CODE: i32 = 99;

/// Marker WorldEditor writes into the version line of generated files.
const WED_HEADER_MARKER: &str = "Generated by WorldEditor";

/// The first token of a line.
///
/// Almost always an integer, but file header lines use letters (`I`, `A`)
/// and blank lines carry an empty code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowCode {
    /// An integer row code such as `1` or `100`.
    Numeric(i32),
    /// Anything that does not parse as an integer.
    Text(String),
}

impl RowCode {
    /// Classify a single token.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token.parse::<i32>() {
            Ok(code) => Self::Numeric(code),
            Err(_) => Self::Text(token.to_owned()),
        }
    }

    /// The integer value, if this code is numeric.
    #[must_use]
    pub fn as_numeric(&self) -> Option<i32> {
        match self {
            Self::Numeric(code) => Some(*code),
            Self::Text(_) => None,
        }
    }
}

impl From<i32> for RowCode {
    fn from(code: i32) -> Self {
        Self::Numeric(code)
    }
}

impl From<&str> for RowCode {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

impl From<RunwayType> for RowCode {
    fn from(runway_type: RunwayType) -> Self {
        Self::Numeric(runway_type.row_code())
    }
}

impl fmt::Display for RowCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(code) => write!(f, "{code}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Kinds of runway lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunwayType {
    LandRunway,
    WaterRunway,
    Helipad,
}

impl RunwayType {
    /// The row code used for this runway type.
    #[must_use]
    pub const fn row_code(self) -> i32 {
        match self {
            Self::LandRunway => 100,
            Self::WaterRunway => 101,
            Self::Helipad => 102,
        }
    }

    /// Map a row code back to a runway type.
    #[must_use]
    pub const fn from_row_code(code: i32) -> Option<Self> {
        match code {
            100 => Some(Self::LandRunway),
            101 => Some(Self::WaterRunway),
            102 => Some(Self::Helipad),
            _ => None,
        }
    }
}

/// A single line from an apt.dat file.
///
/// The raw text is preserved exactly (minus the line terminator) so that
/// airports can be written back out unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AptDatLine {
    raw: String,
    row_code: RowCode,
}

impl AptDatLine {
    /// Classify a line of text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let raw = text.into();
        let first = raw.trim().split(' ').next().unwrap_or_default();
        let row_code = RowCode::parse(first);
        Self { raw, row_code }
    }

    /// The line exactly as it was read.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn row_code(&self) -> &RowCode {
        &self.row_code
    }

    /// True if this line represents a land runway, waterway, or helipad.
    #[must_use]
    pub fn is_runway(&self) -> bool {
        self.runway_type().is_some()
    }

    /// True if this line marks the beginning of an airport, seaport, or heliport.
    #[must_use]
    pub fn is_airport_header(&self) -> bool {
        self.row_code
            .as_numeric()
            .is_some_and(|code| AIRPORT_HEADER_CODES.contains(&code))
    }

    /// True if this line is part of the apt.dat file header.
    #[must_use]
    pub fn is_file_header(&self) -> bool {
        matches!(&self.row_code, RowCode::Text(text) if text == "I" || text == "A")
            || self.raw.contains(WED_HEADER_MARKER)
    }

    /// True if this line carries no meaning for any airport in the file.
    #[must_use]
    pub fn is_ignorable(&self) -> bool {
        self.row_code == RowCode::Numeric(END_OF_FILE_CODE)
            || self.is_file_header()
            || self.raw.trim().is_empty()
    }

    /// The runway type, or `None` if this is not a runway line.
    #[must_use]
    pub fn runway_type(&self) -> Option<RunwayType> {
        self.row_code.as_numeric().and_then(RunwayType::from_row_code)
    }

    /// The whitespace-normalized tokens of this line.
    #[must_use]
    pub fn tokens(&self) -> Vec<&str> {
        self.raw.trim().split(' ').filter(|t| !t.is_empty()).collect()
    }

    /// A single token by position.
    #[must_use]
    pub fn token(&self, index: usize) -> Option<&str> {
        self.raw.trim().split(' ').filter(|t| !t.is_empty()).nth(index)
    }
}

impl From<&str> for AptDatLine {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for AptDatLine {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Trimmed, with runs of spaces collapsed to one.
impl fmt::Display for AptDatLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens().join(" "))
    }
}
