//! Column layout of one CCROS listing line.
//!
//! ```text
//! #AAA  CN CH   CL   CM  CU CA   CB CK   CD   CF  CG CV CC  CS   AAASAKPK
//!  102  F3 0001 0001 110 01 ???? ?? 0010 0110 000 00 00 000 0000 ? 0 0 1 # QA001:C2
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::field::{check_bit_group, parse_hex_exact, parse_hex_prefix, FieldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Addr,
    Cn,
    Ch,
    Cl,
    Cm,
    Cu,
    Ca,
    Cb,
    Ck,
    Cd,
    Cf,
    Cg,
    Cv,
    Cc,
    Cs,
    Aa,
    As,
    Ak,
    Pk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Hex,
    Bits,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDesc {
    pub field: Field,
    pub name: &'static str,
    pub column: usize,
    pub width: usize,
    pub kind: FieldKind,
}

pub const FIELDS: &[FieldDesc] = &[
    FieldDesc { field: Field::Addr, name: "ADDR", column: 1, width: 3, kind: FieldKind::Hex },
    FieldDesc { field: Field::Cn, name: "CN", column: 6, width: 2, kind: FieldKind::Hex },
    FieldDesc { field: Field::Ch, name: "CH", column: 9, width: 4, kind: FieldKind::Bits },
    FieldDesc { field: Field::Cl, name: "CL", column: 14, width: 4, kind: FieldKind::Bits },
    FieldDesc { field: Field::Cm, name: "CM", column: 19, width: 3, kind: FieldKind::Bits },
    FieldDesc { field: Field::Cu, name: "CU", column: 23, width: 2, kind: FieldKind::Bits },
    FieldDesc { field: Field::Ca, name: "CA", column: 26, width: 4, kind: FieldKind::Bits },
    FieldDesc { field: Field::Cb, name: "CB", column: 31, width: 2, kind: FieldKind::Bits },
    FieldDesc { field: Field::Ck, name: "CK", column: 34, width: 4, kind: FieldKind::Bits },
    FieldDesc { field: Field::Cd, name: "CD", column: 39, width: 4, kind: FieldKind::Bits },
    FieldDesc { field: Field::Cf, name: "CF", column: 44, width: 3, kind: FieldKind::Bits },
    FieldDesc { field: Field::Cg, name: "CG", column: 48, width: 2, kind: FieldKind::Bits },
    FieldDesc { field: Field::Cv, name: "CV", column: 51, width: 2, kind: FieldKind::Bits },
    FieldDesc { field: Field::Cc, name: "CC", column: 54, width: 3, kind: FieldKind::Bits },
    FieldDesc { field: Field::Cs, name: "CS", column: 58, width: 4, kind: FieldKind::Bits },
    FieldDesc { field: Field::Aa, name: "AA", column: 63, width: 1, kind: FieldKind::Bits },
    FieldDesc { field: Field::As, name: "AS", column: 65, width: 1, kind: FieldKind::Bits },
    FieldDesc { field: Field::Ak, name: "AK", column: 67, width: 1, kind: FieldKind::Bits },
    FieldDesc { field: Field::Pk, name: "PK", column: 69, width: 1, kind: FieldKind::Bits },
];

/// Columns that must hold a blank in every record line.
pub const SEPARATORS: &[usize] = &[
    0, 4, 5, 8, 13, 18, 22, 25, 30, 33, 38, 43, 47, 50, 53, 57, 62, 64, 66, 68, 70,
];

pub const COMMENT_COLUMN: usize = 71;
pub const VERSION_COLUMN: usize = 82;
pub const VERSION_WIDTH: usize = 3;
pub const RECORD_LEN: usize = VERSION_COLUMN + VERSION_WIDTH;

impl Field {
    pub fn desc(self) -> &'static FieldDesc {
        // FIELDS is in declaration order
        &FIELDS[self as usize]
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LineError {
    #[error("Line format error")]
    Format,
    #[error("field {name}: {source}")]
    InvalidField {
        name: &'static str,
        #[source]
        source: FieldError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strictness {
    /// Truncating hex parse, no character checks.
    #[default]
    Lenient,
    /// Reject non-hex numerics and bit characters other than `0`, `1`, `?`.
    Strict,
}

/// Exact-match set of accepted 3-character version tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSet {
    tags: BTreeSet<String>,
}

pub const DEFAULT_VERSIONS: &[&str] = &["   ", "004", "005", "006", "007", "010", "014", "025", "A20"];

impl Default for VersionSet {
    fn default() -> Self {
        Self::new(DEFAULT_VERSIONS.iter().copied())
    }
}

impl VersionSet {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { tags: tags.into_iter().map(Into::into).collect() }
    }

    pub fn insert(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    pub fn contains(&self, tag: &[u8]) -> bool {
        std::str::from_utf8(tag).map_or(false, |t| self.tags.contains(t))
    }
}

/// Validated, column-sliced view of one record line.
#[derive(Debug, Clone)]
pub struct LineRecord<'a> {
    raw: &'a [u8],
    version: [u8; VERSION_WIDTH],
}

impl<'a> LineRecord<'a> {
    /// Record columns of `raw`; the caller guarantees every field column is present.
    fn new(raw: &'a [u8]) -> Self {
        let mut version = [b' '; VERSION_WIDTH];
        for (i, v) in version.iter_mut().enumerate() {
            if let Some(&b) = raw.get(VERSION_COLUMN + i) {
                *v = b;
            }
        }
        Self { raw, version }
    }

    pub fn field(&self, field: Field) -> &'a [u8] {
        let d = field.desc();
        &self.raw[d.column..d.column + d.width]
    }

    pub fn version(&self) -> &[u8] {
        &self.version
    }

    /// Free-text comment columns, blank padded when the line ends early.
    pub fn comment(&self) -> String {
        let end = self.raw.len().min(VERSION_COLUMN);
        let text = self.raw.get(COMMENT_COLUMN..end).unwrap_or_default();
        String::from_utf8_lossy(text).trim_end().to_string()
    }

    /// Hex fields whose parse stops before their full width.
    pub fn truncated_hex_fields(&self) -> impl Iterator<Item = &'static FieldDesc> + '_ {
        FIELDS
            .iter()
            .filter(|d| d.kind == FieldKind::Hex)
            .filter(move |d| parse_hex_prefix(self.field(d.field)).1 < d.width)
    }

    pub fn check_strict(&self) -> Result<(), LineError> {
        for d in FIELDS {
            let text = self.field(d.field);
            let res = match d.kind {
                FieldKind::Hex => parse_hex_exact(text).map(|_| ()),
                FieldKind::Bits => check_bit_group(text),
            };
            res.map_err(|source| LineError::InvalidField { name: d.name, source })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum Line<'a> {
    Comment,
    /// Version tag outside the accepted set; silently dropped.
    Unlisted { tag: String },
    Record(LineRecord<'a>),
}

pub fn classify<'a>(
    line: &'a [u8],
    versions: &VersionSet,
    strictness: Strictness,
) -> Result<Line<'a>, LineError> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if line.first() == Some(&b'#') {
        return Ok(Line::Comment);
    }
    let blank = |col: usize| line.get(col) == Some(&b' ');
    if !SEPARATORS.iter().all(|&c| blank(c)) {
        return Err(LineError::Format);
    }
    let record = LineRecord::new(line);
    if !versions.contains(record.version()) {
        let tag = String::from_utf8_lossy(record.version()).into_owned();
        return Ok(Line::Unlisted { tag });
    }
    if strictness == Strictness::Strict {
        record.check_strict()?;
    }
    Ok(Line::Record(record))
}
