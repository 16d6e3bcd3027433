//! Literature-sourced empirical damage-limit tables.
//!
//! Each table maps intervals of a physical parameter (angular distortion,
//! differential settlement, rotation, tilt, tensile strain) to qualitative
//! damage descriptions and ordinal damage levels. Tables are validated at
//! construction; a malformed table is a configuration error and fails loudly
//! here, never mid-classification.

use crate::error::{AssessError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Physical parameter family a limit table applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ParameterFamily {
    /// Angular distortion β [rad].
    Beta,
    /// Differential settlement ΔSmax [m].
    DeltaSMax,
    /// Rotation φ [rad].
    Phi,
    /// Tilt ω [rad].
    Omega,
    /// Tensile strain ε [-].
    Epsilon,
}

impl fmt::Display for ParameterFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterFamily::Beta => "beta",
            ParameterFamily::DeltaSMax => "delta_s_max",
            ParameterFamily::Phi => "phi",
            ParameterFamily::Omega => "omega",
            ParameterFamily::Epsilon => "epsilon",
        };
        write!(f, "{name}")
    }
}

/// One literature source's breakpoint table for a single parameter family.
///
/// Invariants (checked by [`LimitTable::new`]):
/// - breakpoints strictly increasing, starting at 0, ending at +inf
/// - `breakpoints.len() == descriptions.len() + 1 == damage_levels.len() + 1`
#[derive(Debug, Clone, Serialize)]
pub struct LimitTable {
    pub source: String,
    pub breakpoints: Vec<f64>,
    pub descriptions: Vec<String>,
    pub damage_levels: Vec<u8>,
}

impl LimitTable {
    pub fn new(
        source: &str,
        breakpoints: Vec<f64>,
        descriptions: Vec<&str>,
        damage_levels: Vec<u8>,
    ) -> Result<Self> {
        let malformed = |reason: &str| AssessError::MalformedTable {
            table: source.to_string(),
            reason: reason.to_string(),
        };
        if breakpoints.len() < 2 {
            return Err(malformed("needs at least two breakpoints"));
        }
        if breakpoints[0] != 0.0 {
            return Err(malformed("first breakpoint must be 0"));
        }
        if !breakpoints[breakpoints.len() - 1].is_infinite() {
            return Err(malformed("last breakpoint must be +inf"));
        }
        if breakpoints.windows(2).any(|w| w[1] <= w[0]) {
            return Err(malformed("breakpoints must be strictly increasing"));
        }
        if descriptions.len() + 1 != breakpoints.len() {
            return Err(malformed("one description required per interval"));
        }
        if damage_levels.len() != descriptions.len() {
            return Err(malformed("one damage level required per interval"));
        }
        Ok(Self {
            source: source.to_string(),
            breakpoints,
            descriptions: descriptions.into_iter().map(String::from).collect(),
            damage_levels,
        })
    }
}

/// Immutable registry of all limit tables, keyed by parameter family.
///
/// Built once and shared read-only across any number of classification calls.
#[derive(Debug, Clone)]
pub struct LimitTableStore {
    tables: BTreeMap<ParameterFamily, Vec<LimitTable>>,
}

impl LimitTableStore {
    pub fn new() -> Self {
        Self {
            tables: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, family: ParameterFamily, table: LimitTable) {
        self.tables.entry(family).or_default().push(table);
    }

    pub fn tables_for(&self, family: ParameterFamily) -> &[LimitTable] {
        self.tables.get(&family).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The canonical literature tables.
    ///
    /// SRI limits: angular distortion after Boscardin & Cording, Skempton &
    /// McDonald, Bjerrum, Polshin & Tokar, Wood, Bozuzuk and Meyerhof;
    /// differential settlement after Skempton & McDonald; rotation after CUR;
    /// tilt after IGWR. Strain limits after Boscardin & Cording, Son &
    /// Cording, Burland et al., Base et al., Burhouse and Mainstone.
    pub fn standard() -> Result<Self> {
        let inf = f64::INFINITY;
        let mut store = Self::new();

        store.register(
            ParameterFamily::Beta,
            LimitTable::new(
                "Boscardin & Cording (1989)",
                vec![0.0, 1e-3, 1.5e-3, 3.25e-3, 6.5e-3, inf],
                vec![
                    "No damage",
                    "Negligible damage",
                    "Slight",
                    "Moderate to severe",
                    "Severe to very severe",
                ],
                vec![0, 1, 2, 3, 4],
            )?,
        );
        store.register(
            ParameterFamily::Beta,
            LimitTable::new(
                "Skempton & McDonald (1956)",
                vec![0.0, 3.33e-3, 6.66e-3, inf],
                vec![
                    "No damage",
                    "Structural damage in beams or columns",
                    "Cracking in wall panels",
                ],
                vec![0, 3, 4],
            )?,
        );
        store.register(
            ParameterFamily::Beta,
            LimitTable::new(
                "Bjerrum (1963)",
                vec![0.0, 2e-3, 3.33e-3, 6.66e-3, inf],
                vec![
                    "No damage",
                    "Cracking",
                    "Severe cracking in panel walls",
                    "Serious cracking in panel walls and brick walls",
                ],
                vec![0, 1, 3, 4],
            )?,
        );
        store.register(
            ParameterFamily::Beta,
            LimitTable::new(
                "Polshin & Tokar (1957)",
                vec![0.0, 5e-3, inf],
                vec!["No damage", "First visible cracking to no infill walls"],
                vec![0, 1],
            )?,
        );
        store.register(
            ParameterFamily::Beta,
            LimitTable::new(
                "Wood (1958)",
                vec![0.0, 2.2e-3, inf],
                vec![
                    "No damage",
                    "First visible cracking to brick panels and walls",
                ],
                vec![0, 1],
            )?,
        );
        store.register(
            ParameterFamily::Beta,
            LimitTable::new(
                "Bozuzuk (1962)",
                vec![0.0, 1e-3, inf],
                vec!["No damage", "Cracking of clay brick units with mortar"],
                vec![0, 1],
            )?,
        );
        store.register(
            ParameterFamily::Beta,
            LimitTable::new(
                "Meyerhof (1953)",
                vec![0.0, 2.5e-3, inf],
                vec!["No damage", "Cracking"],
                vec![0, 1],
            )?,
        );

        store.register(
            ParameterFamily::DeltaSMax,
            LimitTable::new(
                "Skempton & McDonald (1956), sand",
                vec![0.0, 0.032, inf],
                vec!["No damage", "Damage in sand (all types of foundation)"],
                vec![0, 1],
            )?,
        );
        store.register(
            ParameterFamily::DeltaSMax,
            LimitTable::new(
                "Skempton & McDonald (1956), clay",
                vec![0.0, 0.045, inf],
                vec!["No damage", "Damage in clay (all types of foundation)"],
                vec![0, 1],
            )?,
        );

        store.register(
            ParameterFamily::Phi,
            LimitTable::new(
                "CUR (1996)",
                vec![0.0, 2e-3, 3.3e-3, 10e-3, inf],
                vec![
                    "No damage",
                    "Aesthetic damage",
                    "Structural damage",
                    "Risk for residents",
                ],
                vec![0, 1, 3, 5],
            )?,
        );

        store.register(
            ParameterFamily::Omega,
            LimitTable::new(
                "IGWR (2009)",
                vec![0.0, 1.0 / 66.0, 1.0 / 50.0, 1.0 / 33.0, inf],
                vec![
                    "No damage",
                    "Acceptable damage",
                    "Small damage",
                    "Considerable damage",
                ],
                vec![0, 1, 2, 3],
            )?,
        );

        store.register(
            ParameterFamily::Epsilon,
            LimitTable::new(
                "Boscardin & Cording (1989)",
                vec![0.0, 0.5e-3, 0.75e-3, 1.5e-3, 3e-3, inf],
                vec![
                    "Negligible damage",
                    "Very slight",
                    "Slight",
                    "Moderate to severe",
                    "Severe to very severe",
                ],
                vec![0, 1, 2, 3, 4],
            )?,
        );
        store.register(
            ParameterFamily::Epsilon,
            LimitTable::new(
                "Son and Cording (2005)",
                vec![0.0, 0.5e-3, 0.75e-3, 1.67e-3, 3.33e-3, inf],
                vec![
                    "Negligible damage",
                    "Very slight",
                    "Slight",
                    "Moderate to severe",
                    "Severe to very severe",
                ],
                vec![0, 1, 2, 3, 4],
            )?,
        );
        store.register(
            ParameterFamily::Epsilon,
            LimitTable::new(
                "Burland et al. (1977)",
                vec![0.0, 0.5e-3, inf],
                vec!["No visible cracks", "Visible cracks"],
                vec![0, 1],
            )?,
        );
        store.register(
            ParameterFamily::Epsilon,
            LimitTable::new(
                "Base et al. (1966) deduced by Burland and Wroth (1974)",
                vec![0.0, 0.5e-3, inf],
                vec!["No visible cracks", "Onset of visible cracking"],
                vec![0, 1],
            )?,
        );
        store.register(
            ParameterFamily::Epsilon,
            LimitTable::new(
                "Burhouse (1969) deduced by Burland and Wroth (1974)",
                vec![0.0, 0.38e-3, inf],
                vec!["No visible cracks", "Onset of visible cracking"],
                vec![0, 1],
            )?,
        );
        store.register(
            ParameterFamily::Epsilon,
            LimitTable::new(
                "Mainstone (1971) Information taken from Son (2003)",
                vec![0.0, 0.3e-3, inf],
                vec!["No visible cracking", "Visible cracking"],
                vec![0, 1],
            )?,
        );

        Ok(store)
    }
}

impl Default for LimitTableStore {
    fn default() -> Self {
        Self::new()
    }
}
