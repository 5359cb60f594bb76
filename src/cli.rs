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

//! Command-line argument definitions.

use std::path::PathBuf;

use apt_dat::{Airport, SortKey};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "xplane-airports")]
#[command(version, about = "Read, inspect, and rewrite X-Plane apt.dat files", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// apt.dat file to read (defaults to the configured file)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every airport as "id<TAB>name"
    List {
        /// Sort order: name, id, from_file, has_atc, elevation
        #[arg(long)]
        sort: Option<SortKey>,
    },

    /// Print an airport summary followed by the start of its apt.dat text
    Show {
        /// Airport ID or name
        key: String,

        /// Number of apt.dat lines to print
        #[arg(short = 'n', long)]
        lines: Option<usize>,
    },

    /// Print an airport summary
    Info {
        /// Airport ID or name
        key: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Find airports matching every given filter
    Search {
        /// Exact airport name (case-insensitive)
        #[arg(long)]
        name: Option<String>,

        /// Only airports with air traffic control
        #[arg(long)]
        atc: bool,

        /// Required feature (repeatable)
        #[arg(long, value_enum)]
        feature: Vec<Feature>,
    },

    /// Write a single airport to its own .dat file
    Extract {
        /// Airport ID
        id: String,

        /// Output path (must end in .dat)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Concatenate several apt.dat files into one
    Merge {
        /// Input apt.dat files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output path (must end in .dat)
        #[arg(short, long)]
        output: PathBuf,

        /// Sort the merged airports
        #[arg(long)]
        sort: Option<SortKey>,
    },

    /// Show or update the configuration file
    Config {
        /// Remember this apt.dat file as the default
        #[arg(long)]
        set_default: Option<PathBuf>,
    },
}

/// Airport features that `search` can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Feature {
    Taxiway,
    TaxiRoute,
    TrafficFlow,
    GroundRoutes,
    TaxiwaySign,
    CommFreq,
}

impl Feature {
    #[must_use]
    pub fn present_in(self, airport: &Airport) -> bool {
        match self {
            Self::Taxiway => airport.has_taxiway(),
            Self::TaxiRoute => airport.has_taxi_route(),
            Self::TrafficFlow => airport.has_traffic_flow(),
            Self::GroundRoutes => airport.has_ground_routes(),
            Self::TaxiwaySign => airport.has_taxiway_sign(),
            Self::CommFreq => airport.has_comm_freq(),
        }
    }
}
