//! The eight document information fields and the record holding their values

use std::fmt;
use std::str::FromStr;
use crate::error::Error;

/// One of the eight standard document information keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataKey {
    Title,
    Author,
    Subject,
    Keywords,
    Creator,
    Producer,
    CreationDate,
    ModDate,
}

impl MetadataKey {
    /// All keys in display order
    pub const ALL: [MetadataKey; 8] = [
        MetadataKey::Title,
        MetadataKey::Author,
        MetadataKey::Subject,
        MetadataKey::Keywords,
        MetadataKey::Creator,
        MetadataKey::Producer,
        MetadataKey::CreationDate,
        MetadataKey::ModDate,
    ];

    /// Key name as it appears in the info dictionary
    pub fn pdf_name(self) -> &'static str {
        match self {
            MetadataKey::Title => "Title",
            MetadataKey::Author => "Author",
            MetadataKey::Subject => "Subject",
            MetadataKey::Keywords => "Keywords",
            MetadataKey::Creator => "Creator",
            MetadataKey::Producer => "Producer",
            MetadataKey::CreationDate => "CreationDate",
            MetadataKey::ModDate => "ModDate",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            MetadataKey::CreationDate => "Creation Date",
            MetadataKey::ModDate => "Modification Date",
            other => other.pdf_name(),
        }
    }

    /// Whether the value is expected to hold a PDF date string
    pub fn is_date(self) -> bool {
        matches!(self, MetadataKey::CreationDate | MetadataKey::ModDate)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pdf_name())
    }
}

impl FromStr for MetadataKey {
    type Err = Error;

    /// Case-insensitive; accepts the PDF name, the label, and hyphenated or
    /// underscored spellings such as `creation-date` or `mod_date`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' ' | ':'))
            .collect::<String>()
            .to_lowercase();

        MetadataKey::ALL
            .into_iter()
            .find(|key| {
                key.pdf_name().eq_ignore_ascii_case(&normalized)
                    || key.label().replace(' ', "").eq_ignore_ascii_case(&normalized)
            })
            .ok_or_else(|| Error::UnknownKey(s.to_string()))
    }
}

/// Values for all eight keys
///
/// Every key always has a value; a field missing from the PDF is `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    values: [String; 8],
}

impl MetadataRecord {
    /// Record with every field empty
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: MetadataKey) -> &str {
        &self.values[key.index()]
    }

    pub fn set(&mut self, key: MetadataKey, value: impl Into<String>) {
        self.values[key.index()] = value.into();
    }

    pub fn clear(&mut self, key: MetadataKey) {
        self.values[key.index()].clear();
    }

    pub fn clear_all(&mut self) {
        self.values.iter_mut().for_each(String::clear);
    }

    /// True when all eight fields are empty
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    /// Iterate over `(key, value)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (MetadataKey, &str)> + '_ {
        MetadataKey::ALL
            .into_iter()
            .map(move |key| (key, self.get(key)))
    }
}

impl FromIterator<(MetadataKey, String)> for MetadataRecord {
    fn from_iter<I: IntoIterator<Item = (MetadataKey, String)>>(iter: I) -> Self {
        let mut record = MetadataRecord::new();
        for (key, value) in iter {
            record.set(key, value);
        }
        record
    }
}
