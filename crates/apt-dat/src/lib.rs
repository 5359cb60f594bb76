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

//! Tools for reading, inspecting, and manipulating X-Plane airport
//! (`apt.dat`) files.
//!
//! The crate is organised in three layers that build on each other:
//!
//! - **Line layer**: [`AptDatLine`] classifies a single line by its row code
//! - **Airport layer**: [`Airport`] holds the header fields and raw text of
//!   one airport, seaport, or heliport
//! - **Collection layer**: [`AptDat`] splits whole files into airports,
//!   searches them, and writes them back out
//!
//! # Quick Start
//!
//! ```
//! use apt_dat::AptDat;
//!
//! let text = "\
//! I
//! 1100 Generated by WorldEditor
//!
//! 1    433 1 0 KSEA Seattle-Tacoma Intl
//! 100 45.72 1 0 0.25 1 3 0 16L 47.46375 -122.30798 0 0 3 2 1 0 34R 47.43098 -122.30807 0 0 3 2 1 0
//!
//! 99
//! ";
//!
//! let apt_dat = AptDat::from_file_text(text, "apt.dat").unwrap();
//! let ksea = apt_dat.search_by_id("ksea").unwrap().unwrap();
//! assert_eq!(ksea.name, "Seattle-Tacoma Intl");
//! assert!(ksea.has_atc);
//! assert!((ksea.latitude().unwrap() - 47.447365).abs() < 1e-6);
//! ```
//!
//! # Working With Single Airports
//!
//! ```
//! use apt_dat::Airport;
//!
//! let apt = Airport::parse("17 120 0 0 WA01 Harborview\n102 H1 47.60 -122.32 0 10 10 1 0 0 0.25 0", "").unwrap();
//! assert_eq!(apt.id, "WA01");
//! assert_eq!(apt.longitude().unwrap(), -122.32);
//! assert!(!apt.has_comm_freq());
//! ```
//!
//! # Writing Files
//!
//! ```no_run
//! use apt_dat::{AptDat, SortKey};
//!
//! let mut apt_dat = AptDat::from_file("Custom Scenery/Global Airports/Earth nav data/apt.dat")?;
//! apt_dat.sort(SortKey::Id);
//! apt_dat.write_to_disk("sorted.dat")?;
//! # Ok::<(), apt_dat::AptDatError>(())
//! ```

pub mod airport;
pub mod apt_dat;
pub mod error;
pub mod line;

use std::io::Write;
use std::path::Path;

pub use airport::Airport;
pub use apt_dat::{AptDat, SortKey};
pub use error::{AptDatError, Result};
pub use line::{AptDatLine, RowCode, RunwayType};

/// Line terminator WorldEditor uses when writing apt.dat files.
pub const WED_LINE_ENDING: &str = "\n";

/// Version line written after the `I` byte-order marker.
const WED_VERSION_LINE: &str = "1100 Generated by WorldEditor";

/// Write the `I` marker and version line that open every apt.dat file.
fn write_file_header<W: Write + ?Sized>(writer: &mut W) -> std::io::Result<()> {
    write!(
        writer,
        "I{WED_LINE_ENDING}{WED_VERSION_LINE}{WED_LINE_ENDING}{WED_LINE_ENDING}"
    )
}

/// Write the `99` end-of-file marker.
fn write_file_footer<W: Write + ?Sized>(writer: &mut W) -> std::io::Result<()> {
    write!(writer, "99{WED_LINE_ENDING}")
}

fn ensure_dat_extension(path: &Path) -> Result<()> {
    if path.extension().is_some_and(|ext| ext == "dat") {
        Ok(())
    } else {
        Err(AptDatError::InvalidExtension(path.to_path_buf()))
    }
}
