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

//! Collections of airports parsed from complete apt.dat files.
//!
//! X-Plane's global apt.dat describes tens of thousands of airports. This
//! module splits a file into [`Airport`]s, answers lookups by ID, name, or
//! arbitrary predicate, and writes collections back out in the layout
//! WorldEditor produces.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::ops::{Add, AddAssign, Index};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, info};

use crate::airport::Airport;
use crate::error::{AptDatError, Result};
use crate::line::AptDatLine;
use crate::{ensure_dat_extension, write_file_footer, write_file_header, WED_LINE_ENDING};

/// Airport attribute used to order a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Airport name (the order shipped by X-Plane).
    #[default]
    Name,
    Id,
    FromFile,
    HasAtc,
    Elevation,
}

impl SortKey {
    /// Every sort key, in display order.
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Id,
        Self::FromFile,
        Self::HasAtc,
        Self::Elevation,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Id => "id",
            Self::FromFile => "from_file",
            Self::HasAtc => "has_atc",
            Self::Elevation => "elevation_ft_amsl",
        }
    }
}

impl FromStr for SortKey {
    type Err = AptDatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "name" => Ok(Self::Name),
            "id" => Ok(Self::Id),
            "from_file" | "file" => Ok(Self::FromFile),
            "has_atc" | "atc" => Ok(Self::HasAtc),
            "elevation_ft_amsl" | "elevation" => Ok(Self::Elevation),
            _ => Err(AptDatError::UnknownSortKey(s.to_owned())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A container of [`Airport`]s, usually read from one apt.dat file.
///
/// Airports are kept in file order until [`AptDat::sort`] is called.
#[derive(Debug, Clone, Default)]
pub struct AptDat {
    pub airports: Vec<Airport>,
    /// The file this collection was read from, if any.
    pub path_to_file: Option<PathBuf>,
}

impl AptDat {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse an apt.dat (or ICAO.dat) file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;

        let mut apt_dat = Self::from_file_text(&text, &path.to_string_lossy())?;
        apt_dat.path_to_file = Some(path.to_path_buf());

        info!("Loaded {} airports from {}", apt_dat.len(), path.display());
        Ok(apt_dat)
    }

    /// Parse the full text of an apt.dat file.
    ///
    /// Each airport header line starts a new airport; ignorable lines (file
    /// headers, blank lines, and the `99` terminator) are dropped.
    pub fn from_file_text(text: &str, from_file: &str) -> Result<Self> {
        let mut airports = Vec::new();
        let mut pending: Vec<AptDatLine> = Vec::new();

        for line in text.lines().map(AptDatLine::new) {
            if line.is_airport_header() {
                if !pending.is_empty() {
                    airports.push(Airport::from_lines(std::mem::take(&mut pending), from_file)?);
                }
                pending.push(line);
            } else if line.is_ignorable() {
                debug!("Skipping line: {:?}", line.raw());
            } else {
                pending.push(line);
            }
        }
        if !pending.is_empty() {
            airports.push(Airport::from_lines(pending, from_file)?);
        }

        Ok(Self {
            airports,
            path_to_file: (!from_file.is_empty()).then(|| PathBuf::from(from_file)),
        })
    }

    /// Write a complete apt.dat file containing every airport.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_file_header(writer)?;
        for airport in &self.airports {
            write!(writer, "{airport}{WED_LINE_ENDING}{WED_LINE_ENDING}")?;
        }
        write_file_footer(writer)?;
        Ok(())
    }

    /// Write the collection to `path`, which must end in `.dat`.
    pub fn write_to_disk(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        ensure_dat_extension(path)?;

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;

        info!("Wrote {} airports to {}", self.len(), path.display());
        Ok(())
    }

    /// Stable sort of the airports by `key`.
    pub fn sort(&mut self, key: SortKey) {
        match key {
            SortKey::Name => self.airports.sort_by(|a, b| a.name.cmp(&b.name)),
            SortKey::Id => self.airports.sort_by(|a, b| a.id.cmp(&b.id)),
            SortKey::FromFile => self.airports.sort_by(|a, b| a.from_file.cmp(&b.from_file)),
            SortKey::HasAtc => self.airports.sort_by_key(|a| a.has_atc),
            SortKey::Elevation => self
                .airports
                .sort_by(|a, b| a.elevation_ft_amsl.total_cmp(&b.elevation_ft_amsl)),
        }
    }

    /// The airport with the given X-Plane ID (case-insensitive).
    ///
    /// Returns [`AptDatError::DuplicateId`] if more than one airport matches,
    /// since no two airports in one apt.dat may share an ID.
    pub fn search_by_id(&self, apt_id: &str) -> Result<Option<&Airport>> {
        let found = self.search_by_predicate(|apt| same_ignoring_case(&apt.id, apt_id));
        match found.as_slice() {
            [] => Ok(None),
            [airport] => Ok(Some(*airport)),
            _ => Err(AptDatError::DuplicateId(apt_id.to_owned())),
        }
    }

    /// All airports whose name matches exactly, ignoring case.
    #[must_use]
    pub fn search_by_name(&self, apt_name: &str) -> Vec<&Airport> {
        self.search_by_predicate(|apt| same_ignoring_case(&apt.name, apt_name))
    }

    /// All airports for which `predicate` returns true.
    #[must_use]
    pub fn search_by_predicate<F>(&self, predicate: F) -> Vec<&Airport>
    where
        F: Fn(&Airport) -> bool,
    {
        self.airports.iter().filter(|apt| predicate(apt)).collect()
    }

    /// Find an airport by ID, falling back to the first airport with a
    /// matching name.
    pub fn lookup(&self, key: &str) -> Result<&Airport> {
        if let Some(airport) = self.search_by_id(key)? {
            return Ok(airport);
        }
        self.search_by_name(key)
            .into_iter()
            .next()
            .ok_or_else(|| AptDatError::NotFound(key.to_owned()))
    }

    /// The X-Plane IDs of every airport (not necessarily ICAO codes).
    #[must_use]
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.airports.iter().map(|apt| apt.id.as_str())
    }

    /// The names of every airport, in collection order.
    #[must_use]
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.airports.iter().map(|apt| apt.name.as_str())
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Airport> {
        self.airports.get(index)
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Airport> {
        self.airports.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

fn same_ignoring_case(a: &str, b: &str) -> bool {
    a.to_uppercase() == b.to_uppercase()
}

/// Two collections are equal when they hold the same airports in the same order.
impl PartialEq for AptDat {
    fn eq(&self, other: &Self) -> bool {
        self.airports == other.airports
    }
}

/// The raw text of every airport, without the file header or footer.
impl fmt::Display for AptDat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, airport) in self.airports.iter().enumerate() {
            if i > 0 {
                f.write_str(WED_LINE_ENDING)?;
            }
            write!(f, "{airport}")?;
        }
        Ok(())
    }
}

impl Index<usize> for AptDat {
    type Output = Airport;

    fn index(&self, index: usize) -> &Airport {
        assert!(
            index < self.airports.len(),
            "Tried to access index {index}, but this AptDat only has {} airports",
            self.airports.len()
        );
        &self.airports[index]
    }
}

impl IntoIterator for AptDat {
    type Item = Airport;
    type IntoIter = std::vec::IntoIter<Airport>;

    fn into_iter(self) -> Self::IntoIter {
        self.airports.into_iter()
    }
}

impl<'a> IntoIterator for &'a AptDat {
    type Item = &'a Airport;
    type IntoIter = std::slice::Iter<'a, Airport>;

    fn into_iter(self) -> Self::IntoIter {
        self.airports.iter()
    }
}

impl FromIterator<Airport> for AptDat {
    fn from_iter<I: IntoIterator<Item = Airport>>(iter: I) -> Self {
        Self {
            airports: iter.into_iter().collect(),
            path_to_file: None,
        }
    }
}

impl Extend<Airport> for AptDat {
    fn extend<I: IntoIterator<Item = Airport>>(&mut self, iter: I) {
        self.airports.extend(iter);
    }
}

// Combining collections performs no de-duplication; callers must keep the
// inputs disjoint.

impl Add for AptDat {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.airports.into_iter().chain(other.airports).collect()
    }
}

impl Add<&AptDat> for &AptDat {
    type Output = AptDat;

    fn add(self, other: &AptDat) -> AptDat {
        self.airports.iter().chain(&other.airports).cloned().collect()
    }
}

impl AddAssign for AptDat {
    fn add_assign(&mut self, other: Self) {
        self.airports.extend(other.airports);
    }
}

impl Add<Airport> for AptDat {
    type Output = Self;

    fn add(self, airport: Airport) -> Self {
        self.airports.into_iter().chain(std::iter::once(airport)).collect()
    }
}

impl AddAssign<Airport> for AptDat {
    fn add_assign(&mut self, airport: Airport) {
        self.airports.push(airport);
    }
}
