//! `loop_` table scanning.
//!
//! Lines are fed one at a time into a [`TableScanner`], which tracks whether a
//! loop is open, which header tags it declared, and where the atom-site
//! columns sit within those headers. Loops that do not declare coordinate
//! columns are walked through but contribute no sites.

use crate::domain::AtomSite;
use std::fmt::{Display, Formatter};

pub const LOOP_START: &str = "loop_";
pub const TAG_PREFIX: char = '_';
pub const COMMENT_PREFIX: char = '#';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteColumn {
    Label,
    Element,
    X,
    Y,
    Z,
}

impl SiteColumn {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "_atom_site_label" => Some(Self::Label),
            "_atom_site_type_symbol" => Some(Self::Element),
            "_atom_site_fract_x" => Some(Self::X),
            "_atom_site_fract_y" => Some(Self::Y),
            "_atom_site_fract_z" => Some(Self::Z),
            _ => None,
        }
    }
}

/// Header positions of the recognized atom-site columns in the current loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub label: Option<usize>,
    pub element: Option<usize>,
    pub x: Option<usize>,
    pub y: Option<usize>,
    pub z: Option<usize>,
}

impl ColumnMap {
    pub fn record(&mut self, column: SiteColumn, index: usize) {
        let slot = match column {
            SiteColumn::Label => &mut self.label,
            SiteColumn::Element => &mut self.element,
            SiteColumn::X => &mut self.x,
            SiteColumn::Y => &mut self.y,
            SiteColumn::Z => &mut self.z,
        };
        *slot = Some(index);
    }

    pub fn mapped_count(&self) -> usize {
        [self.label, self.element, self.x, self.y, self.z]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    /// All three coordinates plus something to read the element from.
    pub fn describes_sites(&self) -> bool {
        self.mapped_count() >= 4
            && self.x.is_some()
            && self.y.is_some()
            && self.z.is_some()
            && (self.element.is_some() || self.label.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoopState {
    #[default]
    Idle,
    CollectingHeaders,
    ReadingRows,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    NotSiteTable,
    ShortRow { tokens: usize, headers: usize },
    MissingToken(SiteColumn),
    EmptyElement(String),
    InvalidCoordinate { column: SiteColumn, token: String },
}

impl Display for RowRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotSiteTable => f.write_str("loop does not declare atom-site coordinates"),
            Self::ShortRow { tokens, headers } => {
                write!(f, "row has {} tokens for {} headers", tokens, headers)
            }
            Self::MissingToken(column) => write!(f, "row has no token for {:?}", column),
            Self::EmptyElement(token) => {
                write!(f, "token '{}' contains no element letters", token)
            }
            Self::InvalidCoordinate { column, token } => {
                write!(f, "{:?} coordinate '{}' is not a number", column, token)
            }
        }
    }
}

/// Line-driven loop scanner. Holds all state for one document; independent
/// documents use independent scanners.
#[derive(Debug, Default)]
pub struct TableScanner {
    state: LoopState,
    headers: Vec<String>,
    columns: ColumnMap,
    sites: Vec<AtomSite>,
    line_number: usize,
}

impl TableScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> ColumnMap {
        self.columns
    }

    pub fn sites(&self) -> &[AtomSite] {
        &self.sites
    }

    pub fn feed_line(&mut self, raw: &str) {
        self.line_number += 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            return;
        }

        if line == LOOP_START {
            self.open_loop();
            return;
        }

        match self.state {
            LoopState::Idle => {}
            LoopState::CollectingHeaders if line.starts_with(TAG_PREFIX) => {
                self.push_header(line);
            }
            LoopState::CollectingHeaders => {
                self.transition(LoopState::ReadingRows);
                if !self.columns.describes_sites() {
                    tracing::debug!(
                        line = self.line_number,
                        headers = self.headers.len(),
                        "loop has no atom-site coordinate columns"
                    );
                }
                self.read_row(line);
            }
            LoopState::ReadingRows => self.read_row(line),
        }
    }

    pub fn finish(self) -> Vec<AtomSite> {
        self.sites
    }

    fn open_loop(&mut self) {
        self.headers.clear();
        self.columns = ColumnMap::default();
        self.transition(LoopState::CollectingHeaders);
    }

    fn push_header(&mut self, line: &str) {
        let tag = line.split_whitespace().next().unwrap_or(line);
        if let Some(column) = SiteColumn::from_tag(tag) {
            self.columns.record(column, self.headers.len());
        }
        self.headers.push(tag.to_string());
    }

    fn read_row(&mut self, line: &str) {
        if !self.columns.describes_sites() {
            return;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match parse_site_row(&tokens, self.headers.len(), &self.columns) {
            Ok(site) => self.sites.push(site),
            Err(reason) => {
                tracing::debug!(line = self.line_number, %reason, "skipping atom-site row");
            }
        }
    }

    fn transition(&mut self, next: LoopState) {
        tracing::trace!(line = self.line_number, from = ?self.state, to = ?next, "loop state");
        self.state = next;
    }
}

/// Extracts every accepted atom-site row of `source` in document order.
pub fn scan_atom_sites(source: &str) -> Vec<AtomSite> {
    let mut scanner = TableScanner::new();
    for line in source.lines() {
        scanner.feed_line(line);
    }
    scanner.finish()
}

/// Builds one site from a tokenized data row, or reports why the row was
/// rejected. Never yields a partially filled site.
pub fn parse_site_row(
    tokens: &[&str],
    header_count: usize,
    columns: &ColumnMap,
) -> Result<AtomSite, RowRejection> {
    if !columns.describes_sites() {
        return Err(RowRejection::NotSiteTable);
    }
    if tokens.len() < header_count {
        return Err(RowRejection::ShortRow {
            tokens: tokens.len(),
            headers: header_count,
        });
    }

    let symbol_column = if columns.element.is_some() {
        SiteColumn::Element
    } else {
        SiteColumn::Label
    };
    let symbol_token = token_at(tokens, columns.element.or(columns.label), symbol_column)?;
    let element = clean_element_symbol(symbol_token);
    if element.is_empty() {
        return Err(RowRejection::EmptyElement(symbol_token.to_string()));
    }

    let x = coordinate_at(tokens, columns.x, SiteColumn::X)?;
    let y = coordinate_at(tokens, columns.y, SiteColumn::Y)?;
    let z = coordinate_at(tokens, columns.z, SiteColumn::Z)?;

    let mut site = AtomSite::new(element, x, y, z);
    if let Some(label) = columns.label.and_then(|index| tokens.get(index)) {
        site.label = Some((*label).to_string());
    }
    Ok(site)
}

/// Keeps only ASCII letters: `Na1+` becomes `Na`, `O2-` becomes `O`.
pub fn clean_element_symbol(token: &str) -> String {
    token.chars().filter(char::is_ascii_alphabetic).collect()
}

fn token_at<'a>(
    tokens: &[&'a str],
    index: Option<usize>,
    column: SiteColumn,
) -> Result<&'a str, RowRejection> {
    index
        .and_then(|index| tokens.get(index).copied())
        .ok_or(RowRejection::MissingToken(column))
}

fn coordinate_at(
    tokens: &[&str],
    index: Option<usize>,
    column: SiteColumn,
) -> Result<f64, RowRejection> {
    let token = token_at(tokens, index, column)?;
    token
        .parse::<f64>()
        .map_err(|_| RowRejection::InvalidCoordinate {
            column,
            token: token.to_string(),
        })
}
