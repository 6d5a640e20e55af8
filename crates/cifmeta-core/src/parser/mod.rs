pub mod scalar;
pub mod table;

use crate::domain::{CifError, MetadataRecord, ParserResult};

pub use scalar::{scan_lattice, scan_lattice_parameter, scan_space_group};
pub use table::{TableScanner, scan_atom_sites};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Extracts lattice constants, the space-group label and the atom-site table
/// from one CIF-style document.
///
/// Extraction is best-effort: missing or malformed tags keep their defaults
/// and malformed table rows are skipped, so this never fails. A leading byte
/// order mark is ignored.
pub fn parse_metadata(source: &str) -> MetadataRecord {
    let source = source.strip_prefix(BYTE_ORDER_MARK).unwrap_or(source);
    let lattice = scan_lattice(source);
    let space_group = scan_space_group(source);
    let atomic_positions = scan_atom_sites(source);

    tracing::debug!(
        lattice_found = !lattice.is_unset(),
        space_group_found = space_group.is_some(),
        sites = atomic_positions.len(),
        "extracted document metadata"
    );

    MetadataRecord::new(lattice, space_group, atomic_positions)
}

/// Byte-level entry point. Input that is not UTF-8 text is the only
/// condition reported as an error.
pub fn parse_metadata_bytes(bytes: &[u8]) -> ParserResult<MetadataRecord> {
    let source = std::str::from_utf8(bytes).map_err(|source| {
        CifError::input_validation(
            "INPUT.NOT_TEXT",
            format!("input is not valid UTF-8 text: {}", source),
        )
    })?;
    Ok(parse_metadata(source))
}
