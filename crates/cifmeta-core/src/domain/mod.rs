pub mod errors;

pub use errors::{CifError, CifErrorCategory, CifResult, ParserResult};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const DEFAULT_CELL_LENGTH: f64 = 0.0;
pub const DEFAULT_CELL_ANGLE: f64 = 90.0;
pub const DEFAULT_SPACE_GROUP: &str = "P 1";

/// Unit-cell constants: lengths in Ångström, angles in degrees.
///
/// Fields that were not found in a document keep their defaults (`0.0` for
/// lengths, `90.0` for angles), so an all-default value means "no lattice".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for LatticeParameters {
    fn default() -> Self {
        Self {
            a: DEFAULT_CELL_LENGTH,
            b: DEFAULT_CELL_LENGTH,
            c: DEFAULT_CELL_LENGTH,
            alpha: DEFAULT_CELL_ANGLE,
            beta: DEFAULT_CELL_ANGLE,
            gamma: DEFAULT_CELL_ANGLE,
        }
    }
}

impl LatticeParameters {
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }

    pub fn set(&mut self, parameter: LatticeParameter, value: f64) {
        match parameter {
            LatticeParameter::A => self.a = value,
            LatticeParameter::B => self.b = value,
            LatticeParameter::C => self.c = value,
            LatticeParameter::Alpha => self.alpha = value,
            LatticeParameter::Beta => self.beta = value,
            LatticeParameter::Gamma => self.gamma = value,
        }
    }

    pub fn get(&self, parameter: LatticeParameter) -> f64 {
        match parameter {
            LatticeParameter::A => self.a,
            LatticeParameter::B => self.b,
            LatticeParameter::C => self.c,
            LatticeParameter::Alpha => self.alpha,
            LatticeParameter::Beta => self.beta,
            LatticeParameter::Gamma => self.gamma,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatticeParameter {
    A,
    B,
    C,
    Alpha,
    Beta,
    Gamma,
}

impl LatticeParameter {
    pub const ALL: [LatticeParameter; 6] = [
        Self::A,
        Self::B,
        Self::C,
        Self::Alpha,
        Self::Beta,
        Self::Gamma,
    ];

    pub const fn tag(self) -> &'static str {
        match self {
            Self::A => "_cell_length_a",
            Self::B => "_cell_length_b",
            Self::C => "_cell_length_c",
            Self::Alpha => "_cell_angle_alpha",
            Self::Beta => "_cell_angle_beta",
            Self::Gamma => "_cell_angle_gamma",
        }
    }
}

impl Display for LatticeParameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).tag())
    }
}

/// One accepted row of an atom-site table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomSite {
    pub element: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl AtomSite {
    pub fn new(element: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            element: element.into(),
            x,
            y,
            z,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn fractional(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Derived bond between two sites. Reserved for a bond-analysis stage; the
/// extractor never fills it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondInfo {
    pub atom1: String,
    pub atom2: String,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub lattice: LatticeParameters,
    pub space_group: String,
    pub atomic_positions: Vec<AtomSite>,
    pub bond_info: Vec<BondInfo>,
    #[serde(default)]
    space_group_explicit: bool,
}

impl Default for MetadataRecord {
    fn default() -> Self {
        Self {
            lattice: LatticeParameters::default(),
            space_group: DEFAULT_SPACE_GROUP.to_string(),
            atomic_positions: Vec::new(),
            bond_info: Vec::new(),
            space_group_explicit: false,
        }
    }
}

impl MetadataRecord {
    pub fn new(
        lattice: LatticeParameters,
        space_group: Option<String>,
        atomic_positions: Vec<AtomSite>,
    ) -> Self {
        let space_group_explicit = space_group.is_some();
        Self {
            lattice,
            space_group: space_group.unwrap_or_else(|| DEFAULT_SPACE_GROUP.to_string()),
            atomic_positions,
            bond_info: Vec::new(),
            space_group_explicit,
        }
    }

    /// `true` when the label came from the document rather than the `P 1`
    /// default.
    pub fn space_group_is_explicit(&self) -> bool {
        self.space_group_explicit
    }

    pub fn has_lattice(&self) -> bool {
        !self.lattice.is_unset()
    }

    pub fn has_sites(&self) -> bool {
        !self.atomic_positions.is_empty()
    }

    pub fn to_json(&self) -> CifResult<String> {
        serde_json::to_string(self).map_err(|source| {
            CifError::internal(
                "RUN.SERIALIZE",
                format!("failed to serialize metadata record: {}", source),
            )
        })
    }

    pub fn to_json_pretty(&self) -> CifResult<String> {
        serde_json::to_string_pretty(self).map_err(|source| {
            CifError::internal(
                "RUN.SERIALIZE",
                format!("failed to serialize metadata record: {}", source),
            )
        })
    }
}
