//! Photo records and the normalizer that turns one page of them into a
//! collision-free set of file names, each pointing at the largest rendition
//! of its photo.

pub mod error;
pub mod naming;

pub use error::NormalizeError;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One size rendition of a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeVariant {
    pub height: u32,
    /// Resolution tag (`s`, `m`, `x`, `y`, `z`, `w`, ...). Only logged.
    pub kind: String,
    pub url: String,
}

/// A photo as returned by the source API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRecord {
    pub likes: u64,
    /// Capture time, Unix epoch seconds.
    pub date: i64,
    pub sizes: Vec<SizeVariant>,
}

impl PhotoRecord {
    /// The largest rendition by height.
    ///
    /// Ties go to the last maximal entry in `sizes`: the scan replaces the
    /// current pick whenever a height is greater than *or equal to* it.
    pub fn largest_variant(&self) -> Option<&SizeVariant> {
        let mut max_height = 0;
        let mut selected = None;
        for variant in &self.sizes {
            if variant.height >= max_height {
                max_height = variant.height;
                selected = Some(variant);
            }
        }
        selected
    }
}

/// A generated file name paired with the URL to fetch it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPhoto<'a> {
    pub file_name: &'a str,
    pub url: &'a str,
}

/// One line of the persisted photo log.
///
/// `file_name` is always the undisambiguated `"{likes}.jpg"` name, even when
/// the photo was stored under a date-qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub file_name: String,
    pub size: String,
}

/// Result of one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// File name to URL, in first-insertion order.
    pub photos: IndexMap<String, String>,
    pub log: Vec<LogEntry>,
}

impl Normalized {
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = NamedPhoto<'_>> {
        self.photos.iter().map(|(file_name, url)| NamedPhoto {
            file_name: file_name.as_str(),
            url: url.as_str(),
        })
    }
}

/// Pick the largest rendition of every record and give each a unique name.
///
/// The first record with a given like count is stored as `"{likes}.jpg"`.
/// Later records with the same count get `"{likes}_{d}.{m}.{yyyy}.jpg"` from
/// their UTC capture date. If that dated name is taken too, the earlier entry
/// is overwritten in place.
pub fn normalize(records: &[PhotoRecord]) -> Result<Normalized, NormalizeError> {
    let mut out = Normalized {
        photos: IndexMap::with_capacity(records.len()),
        log: Vec::with_capacity(records.len()),
    };

    for (index, record) in records.iter().enumerate() {
        let variant = record
            .largest_variant()
            .ok_or(NormalizeError::NoVariants { index })?;

        let base = naming::base_file_name(record.likes);

        if out.photos.contains_key(&base) {
            let taken = naming::utc_from_epoch(record.date).ok_or(NormalizeError::InvalidDate {
                index,
                date: record.date,
            })?;
            let dated = naming::dated_file_name(record.likes, &taken);
            if out.photos.contains_key(&dated) {
                tracing::debug!(file_name = %dated, "Dated name already taken, replacing URL");
            }
            out.photos.insert(dated, variant.url.clone());
        } else {
            out.photos.insert(base.clone(), variant.url.clone());
        }

        out.log.push(LogEntry {
            file_name: base,
            size: variant.kind.clone(),
        });
    }

    Ok(out)
}
