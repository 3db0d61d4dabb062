//! Reading and writing the document information dictionary

use std::fs;
use std::path::Path;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info, warn};
use crate::error::{Error, Result};
use crate::record::{MetadataKey, MetadataRecord};

/// Where the trailer's /Info entry points
enum InfoSlot {
    Indirect(ObjectId),
    Direct,
    Missing,
}

fn info_slot(doc: &Document) -> InfoSlot {
    match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Dictionary(_)) => InfoSlot::Indirect(*id),
            _ => InfoSlot::Missing,
        },
        Ok(Object::Dictionary(_)) => InfoSlot::Direct,
        _ => InfoSlot::Missing,
    }
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    match info_slot(doc) {
        InfoSlot::Indirect(id) => doc.get_object(id).ok()?.as_dict().ok(),
        InfoSlot::Direct => doc.trailer.get(b"Info").ok()?.as_dict().ok(),
        InfoSlot::Missing => None,
    }
}

fn info_dictionary_mut(doc: &mut Document) -> Option<&mut Dictionary> {
    match info_slot(doc) {
        InfoSlot::Indirect(id) => doc.get_object_mut(id).ok()?.as_dict_mut().ok(),
        InfoSlot::Direct => doc.trailer.get_mut(b"Info").ok()?.as_dict_mut().ok(),
        InfoSlot::Missing => None,
    }
}

/// Convert an info dictionary entry to text
fn value_to_text(doc: &Document, key: MetadataKey, value: &Object) -> String {
    let value = match value {
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(field = %key, error = %e, "unresolvable info entry, treating as empty");
                return String::new();
            }
        },
        other => other,
    };

    match value {
        Object::String(bytes, _) => lopdf::decode_text_string(value).unwrap_or_else(|e| {
            warn!(field = %key, error = %e, "undecodable text string, reading bytes as UTF-8");
            String::from_utf8_lossy(bytes).into_owned()
        }),
        Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
        Object::Integer(n) => n.to_string(),
        Object::Real(r) => r.to_string(),
        Object::Boolean(b) => b.to_string(),
        _ => {
            warn!(field = %key, "unsupported info entry type, treating as empty");
            String::new()
        }
    }
}

/// Extract the eight fields from an already parsed document
///
/// A missing or malformed info dictionary yields an all-empty record.
pub fn read_info(doc: &Document) -> MetadataRecord {
    let Some(info_dict) = info_dictionary(doc) else {
        debug!("document has no info dictionary");
        return MetadataRecord::new();
    };

    MetadataKey::ALL
        .into_iter()
        .map(|key| {
            let text = info_dict
                .get(key.pdf_name().as_bytes())
                .map(|value| value_to_text(doc, key, value))
                .unwrap_or_default();
            (key, text)
        })
        .collect()
}

/// Write the record into the document's info dictionary
///
/// Non-empty values overwrite or create their entry; empty values remove
/// it. An info dictionary is only created when there is something to put
/// in it. Entries other than the eight fields are left alone.
pub fn apply_info(doc: &mut Document, record: &MetadataRecord) {
    if matches!(info_slot(doc), InfoSlot::Missing) {
        if record.is_empty() {
            return;
        }
        debug!("creating info dictionary");
        let info_id = doc.add_object(Dictionary::new());
        doc.trailer.set("Info", Object::Reference(info_id));
    }

    let Some(info_dict) = info_dictionary_mut(doc) else {
        return;
    };

    for (key, value) in record.iter() {
        if value.is_empty() {
            info_dict.remove(key.pdf_name().as_bytes());
        } else {
            info_dict.set(key.pdf_name(), lopdf::text_string(value));
        }
    }
}

fn open_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    debug!(path = %path.display(), "opening PDF");
    Document::load(path).map_err(|e| Error::pdf(path, e))
}

/// Load the metadata of the PDF at `path`
pub fn load_metadata(path: &Path) -> Result<MetadataRecord> {
    let doc = open_document(path)?;
    Ok(read_info(&doc))
}

/// Load the metadata of a PDF held in memory
pub fn load_metadata_from_bytes(bytes: &[u8]) -> Result<MetadataRecord> {
    let doc = Document::load_mem(bytes).map_err(|e| Error::pdf(Path::new("<memory>"), e))?;
    Ok(read_info(&doc))
}

/// Write `record` into the PDF at `path`, overwriting the file in place
///
/// The file is re-read rather than reusing an earlier handle. The document
/// is serialized completely before the file is touched, so a serialization
/// failure leaves the original bytes intact. lopdf reports serialization
/// failures as I/O errors, so they surface as `UnexpectedIo`.
pub fn save_metadata(path: &Path, record: &MetadataRecord) -> Result<()> {
    let mut doc = open_document(path)?;
    apply_info(&mut doc, record);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(|e| Error::io(path, e))?;

    debug!(path = %path.display(), bytes = buffer.len(), "writing PDF");
    fs::write(path, &buffer).map_err(|e| Error::io(path, e))?;

    info!(path = %path.display(), "metadata saved");
    Ok(())
}

/// Load/save seam between an editing front end and the PDF library
pub trait MetadataStore {
    fn load(&self, path: &Path) -> Result<MetadataRecord>;
    fn save(&self, path: &Path, record: &MetadataRecord) -> Result<()>;
}

/// [`MetadataStore`] backed by lopdf and the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfStore;

impl MetadataStore for LopdfStore {
    fn load(&self, path: &Path) -> Result<MetadataRecord> {
        load_metadata(path)
    }

    fn save(&self, path: &Path, record: &MetadataRecord) -> Result<()> {
        save_metadata(path, record)
    }
}
