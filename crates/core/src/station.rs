//! Stations and their code/message tables.
//!
//! A [`StationTable`] is the complete input of one simulation: which
//! stations exist, which spreading code each owns, and which message each
//! sends. Tables are plain values handed to the simulation; nothing here is
//! global.

use crate::code::{check_orthogonality, CorrelatedPair, SpreadingCode};
use crate::error::{CodeError, Result, StationError};
use std::collections::BTreeMap;
use std::fmt;

/// Unique, ordered station identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationId(String);

impl StationId {
    /// Create an identifier. Surrounding whitespace is not part of the id.
    ///
    /// # Errors
    /// `StationError::EmptyId` if the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(StationError::EmptyId.into());
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One station's static configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub code: SpreadingCode,
    pub message: String,
}

/// Station → (code, message) mapping with a shared chip length.
///
/// # Invariants
/// - Station identifiers are unique
/// - Every code has the same chip length
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationTable {
    stations: BTreeMap<StationId, Station>,
}

impl StationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a station.
    ///
    /// # Errors
    /// - `StationError::Duplicate` if the identifier is already present
    /// - `CodeError::ChipLengthMismatch` if the code length differs from the
    ///   stations already registered
    pub fn insert(
        &mut self,
        id: StationId,
        code: SpreadingCode,
        message: impl Into<String>,
    ) -> Result<()> {
        if self.stations.contains_key(&id) {
            return Err(StationError::Duplicate(id.to_string()).into());
        }

        if let Some(expected) = self.chip_length() {
            if code.chip_length() != expected {
                return Err(CodeError::ChipLengthMismatch {
                    station: id.to_string(),
                    expected,
                    actual: code.chip_length(),
                }
                .into());
            }
        }

        self.stations.insert(
            id,
            Station {
                code,
                message: message.into(),
            },
        );
        Ok(())
    }

    /// Build a table from separate code and message mappings.
    ///
    /// Every station with a message needs a code. Codes without a message are
    /// ignored: those stations are silent.
    ///
    /// # Errors
    /// `StationError::MissingCode` or any error from [`StationTable::insert`].
    pub fn from_maps(
        codes: &BTreeMap<StationId, SpreadingCode>,
        messages: &BTreeMap<StationId, String>,
    ) -> Result<Self> {
        let mut table = Self::new();
        for (id, message) in messages {
            let code = codes
                .get(id)
                .ok_or_else(|| StationError::MissingCode(id.to_string()))?;
            table.insert(id.clone(), code.clone(), message.clone())?;
        }
        Ok(table)
    }

    /// Shared chip length, or `None` for an empty table.
    pub fn chip_length(&self) -> Option<usize> {
        self.stations.values().next().map(|s| s.code.chip_length())
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn get(&self, id: &StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    /// Stations in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&StationId, &Station)> {
        self.stations.iter()
    }

    /// Pairs of station codes whose cross-correlation exceeds `tolerance`.
    pub fn correlated_pairs(&self, tolerance: u64) -> Vec<CorrelatedPair<StationId>> {
        check_orthogonality(
            self.stations.iter().map(|(id, s)| (id.clone(), &s.code)),
            tolerance,
        )
    }

    /// Fail on the first pair of codes that is not orthogonal within `tolerance`.
    ///
    /// # Errors
    /// `CodeError::NotOrthogonal` naming the offending pair.
    pub fn ensure_orthogonal(&self, tolerance: u64) -> Result<()> {
        match self.correlated_pairs(tolerance).into_iter().next() {
            Some(pair) => Err(CodeError::NotOrthogonal {
                first: pair.first.to_string(),
                second: pair.second.to_string(),
                correlation: pair.correlation,
            }
            .into()),
            None => Ok(()),
        }
    }
}
