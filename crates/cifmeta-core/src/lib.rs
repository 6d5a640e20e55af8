pub mod domain;
pub mod parser;
pub mod writer;

pub use domain::{AtomSite, BondInfo, CifError, LatticeParameters, MetadataRecord};
pub use parser::{parse_metadata, parse_metadata_bytes};
pub use writer::{WriterOptions, render_cif};
