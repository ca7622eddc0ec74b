//! CSV deployment schedule loader.
//!
//! # CSV format
//!
//! One row per scheduled build.  `institution` names a root-scope
//! institution already registered with the builder.
//!
//! ```csv
//! prototype,name,institution,build_step,lifetime
//! lwr_reactor,reactor_1,usa,0,480
//! lwr_reactor,reactor_2,usa,24,480
//! repository,yucca,usa,120,never
//! ```
//!
//! **`lifetime`** field:
//!
//! | Value   | Meaning                                     |
//! |---------|---------------------------------------------|
//! | *u64*   | `Lifetime::Finite(n)` steps                 |
//! | `never` | `Lifetime::Unbounded`                       |
//! | empty   | inherit the prototype's configured lifetime |

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use rf_core::{Lifetime, Step};

use crate::{SimError, SimResult};

// ── Deployment ────────────────────────────────────────────────────────────────

/// One scheduled build, with the institution still by name (resolved to an
/// id when the builder assembles the scheduler).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployment {
    pub prototype: String,
    pub name: String,
    pub institution: String,
    pub build_step: Step,
    /// `None` inherits the prototype's lifetime.
    pub lifetime: Option<Lifetime>,
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DeployRecord {
    prototype: String,
    name: String,
    institution: String,
    build_step: u64,
    lifetime: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a deployment schedule from a CSV file.
pub fn load_deployments_csv(path: &Path) -> SimResult<Vec<Deployment>> {
    let file = std::fs::File::open(path).map_err(SimError::Io)?;
    load_deployments_reader(file)
}

/// Like [`load_deployments_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or generated schedules.
pub fn load_deployments_reader<R: Read>(reader: R) -> SimResult<Vec<Deployment>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut deployments = Vec::new();

    for result in csv_reader.deserialize::<DeployRecord>() {
        let row = result.map_err(|e| SimError::Parse(e.to_string()))?;
        deployments.push(Deployment {
            prototype: row.prototype,
            name: row.name,
            institution: row.institution,
            build_step: Step(row.build_step),
            lifetime: parse_lifetime(&row.lifetime)?,
        });
    }

    Ok(deployments)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_lifetime(s: &str) -> SimResult<Option<Lifetime>> {
    match s.trim() {
        "" => Ok(None),
        "never" => Ok(Some(Lifetime::Unbounded)),
        n => n
            .parse::<u64>()
            .map(|steps| Some(Lifetime::Finite(steps)))
            .map_err(|_| {
                SimError::Parse(format!(
                    "invalid lifetime {n:?}: expected a step count, \"never\", or empty"
                ))
            }),
    }
}
