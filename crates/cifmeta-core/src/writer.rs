//! Renders a [`MetadataRecord`] back into block-format text.
//!
//! The output uses exactly the vocabulary the extractor recognizes, so
//! rendering and re-parsing reproduces the record up to the written
//! precision. Sites are written as given; no symmetry expansion happens here.

use crate::domain::{DEFAULT_SPACE_GROUP, MetadataRecord};
use crate::parser::scalar::SPACE_GROUP_TAG;
use crate::parser::table::LOOP_START;
use std::fmt::Write;

pub const DEFAULT_BLOCK_NAME: &str = "crystal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    pub block_name: String,
    pub length_precision: usize,
    pub angle_precision: usize,
    pub coordinate_precision: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            block_name: DEFAULT_BLOCK_NAME.to_string(),
            length_precision: 4,
            angle_precision: 3,
            coordinate_precision: 5,
        }
    }
}

impl WriterOptions {
    pub fn with_block_name(mut self, block_name: impl Into<String>) -> Self {
        self.block_name = block_name.into();
        self
    }

    pub fn with_length_precision(mut self, precision: usize) -> Self {
        self.length_precision = precision;
        self
    }

    pub fn with_angle_precision(mut self, precision: usize) -> Self {
        self.angle_precision = precision;
        self
    }

    pub fn with_coordinate_precision(mut self, precision: usize) -> Self {
        self.coordinate_precision = precision;
        self
    }
}

pub fn render_cif(record: &MetadataRecord, options: &WriterOptions) -> String {
    let mut out = String::new();
    let lattice = &record.lattice;
    let lp = options.length_precision;
    let ap = options.angle_precision;
    let cp = options.coordinate_precision;

    // Writing into a String cannot fail.
    let _ = writeln!(out, "data_{}", block_name_token(&options.block_name));
    let _ = writeln!(
        out,
        "{}   '{}'",
        SPACE_GROUP_TAG,
        space_group_value(&record.space_group)
    );
    let _ = writeln!(out, "_cell_length_a   {:.lp$}", lattice.a);
    let _ = writeln!(out, "_cell_length_b   {:.lp$}", lattice.b);
    let _ = writeln!(out, "_cell_length_c   {:.lp$}", lattice.c);
    let _ = writeln!(out, "_cell_angle_alpha   {:.ap$}", lattice.alpha);
    let _ = writeln!(out, "_cell_angle_beta    {:.ap$}", lattice.beta);
    let _ = writeln!(out, "_cell_angle_gamma   {:.ap$}", lattice.gamma);
    out.push('\n');

    out.push_str(LOOP_START);
    out.push('\n');
    for tag in [
        "_atom_site_label",
        "_atom_site_type_symbol",
        "_atom_site_fract_x",
        "_atom_site_fract_y",
        "_atom_site_fract_z",
    ] {
        out.push_str(tag);
        out.push('\n');
    }

    for (index, site) in record.atomic_positions.iter().enumerate() {
        let label = match site.label.as_deref() {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => format!("{}{}", site.element, index + 1),
        };
        let _ = writeln!(
            out,
            "{} {} {:.cp$} {:.cp$} {:.cp$}",
            label, site.element, site.x, site.y, site.z
        );
    }

    out
}

/// The extractor reads a label up to the first quote or line break, so those
/// characters cannot survive a round trip and are dropped.
fn space_group_value(label: &str) -> String {
    let value: String = label
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '\n' | '\r'))
        .collect();
    let value = value.trim();
    if value.is_empty() {
        DEFAULT_SPACE_GROUP.to_string()
    } else {
        value.to_string()
    }
}

fn block_name_token(name: &str) -> String {
    let token: String = name.split_whitespace().collect::<Vec<_>>().join("_");
    if token.is_empty() {
        DEFAULT_BLOCK_NAME.to_string()
    } else {
        token
    }
}
