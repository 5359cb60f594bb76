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

//! Error type shared by every layer of the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading, querying, or writing apt.dat data.
#[derive(Debug, Error)]
pub enum AptDatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to find an airport header line in airport from file '{from_file}'")]
    MissingAirportHeader { from_file: String },

    #[error("expected one airport header line in airport from file '{from_file}', found {count}")]
    MultipleAirportHeaders { from_file: String, count: usize },

    #[error("missing required field '{field}' in line: {line}")]
    MissingField { field: &'static str, line: String },

    #[error("invalid value for field '{field}': {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("airport '{id}' has no runway lines")]
    NoRunways { id: String },

    #[error("more than one airport uses the ID '{0}'")]
    DuplicateId(String),

    #[error("no airport with ID or name '{0}'")]
    NotFound(String),

    #[error("output path must end in .dat: {}", .0.display())]
    InvalidExtension(PathBuf),

    #[error("unknown sort key '{0}'")]
    UnknownSortKey(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AptDatError>;
