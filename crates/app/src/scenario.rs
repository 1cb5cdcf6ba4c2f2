//! Scenario files.
//!
//! A scenario lists the stations sharing the channel, each with its
//! spreading code and (optionally) its message:
//!
//! ```toml
//! trailing = "drop"
//!
//! [[station]]
//! id = "A"
//! code = [-1, -1, -1, 1, 1, -1, 1, 1]
//! message = "GOD"
//! ```
//!
//! With no scenario file the reference four-station setup is used.

use anyhow::{bail, Context};
use cdma_sim_core::code::SpreadingCode;
use cdma_sim_core::decoder::TrailingBits;
use cdma_sim_core::station::{StationId, StationTable};
use serde::Deserialize;
use std::path::Path;

/// One `[[station]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StationEntry {
    pub id: String,
    pub code: Vec<i32>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Parsed scenario file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Trailing-bit policy override
    #[serde(default)]
    pub trailing: Option<String>,

    #[serde(rename = "station", default)]
    pub stations: Vec<StationEntry>,
}

impl Scenario {
    /// Load a scenario from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid scenario file {}", path.display()))
    }

    /// Parse scenario TOML text.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let scenario: Scenario = toml::from_str(content).context("failed to parse TOML")?;
        if scenario.stations.is_empty() {
            bail!("scenario defines no stations");
        }
        Ok(scenario)
    }

    /// The four-station setup used when no scenario is given.
    pub fn reference() -> Self {
        let station = |id: &str, code: [i32; 8], message: &str| StationEntry {
            id: id.to_string(),
            code: code.to_vec(),
            message: Some(message.to_string()),
        };

        Self {
            trailing: None,
            stations: vec![
                station("A", [-1, -1, -1, 1, 1, -1, 1, 1], "GOD"),
                station("B", [-1, -1, 1, -1, 1, 1, 1, -1], "CAT"),
                station("C", [-1, 1, -1, 1, 1, 1, -1, -1], "HAM"),
                station("D", [-1, 1, -1, -1, -1, -1, 1, -1], "SUN"),
            ],
        }
    }

    /// Trailing-bit policy named in the file, if any.
    pub fn trailing_bits(&self) -> anyhow::Result<Option<TrailingBits>> {
        self.trailing
            .as_deref()
            .map(|s| s.parse::<TrailingBits>().map_err(anyhow::Error::msg))
            .transpose()
    }

    /// Build the station table.
    ///
    /// `messages` overrides the file's messages in station order; a station
    /// left without any message is an error.
    pub fn into_table(self, messages: Option<Vec<String>>) -> anyhow::Result<StationTable> {
        let mut overrides = messages.map(Vec::into_iter);
        let mut table = StationTable::new();

        for entry in self.stations {
            let message = match overrides.as_mut().and_then(|it| it.next()) {
                Some(message) => message,
                None => match entry.message {
                    Some(message) => message,
                    None => bail!("station {} has no message", entry.id),
                },
            };

            let code = SpreadingCode::new(&entry.code)
                .with_context(|| format!("invalid code for station {}", entry.id))?;
            let id = StationId::new(entry.id)?;
            table.insert(id, code, message)?;
        }

        Ok(table)
    }
}
