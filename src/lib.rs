//! PDF Metadata Editor Library
//!
//! View, edit, save and clear the eight standard document information
//! fields of a PDF file (Title, Author, Subject, Keywords, Creator,
//! Producer, CreationDate, ModDate).
//! This library provides:
//! - A fixed, typed set of metadata keys and a record holding their values
//! - Loading and saving those fields through lopdf
//! - PDF date parsing and formatting
//! - An editing session that front ends can drive
//!
//! # Example
//!
//! ```no_run
//! use pdf_metadata_editor::pdf::{load_metadata, save_metadata};
//! use pdf_metadata_editor::MetadataKey;
//! use std::path::Path;
//!
//! let path = Path::new("report.pdf");
//! let mut record = load_metadata(path).expect("Failed to load metadata");
//!
//! record.set(MetadataKey::Title, "Final Report");
//! // An empty value removes the field from the document
//! record.set(MetadataKey::Keywords, "");
//!
//! save_metadata(path, &record).expect("Failed to save metadata");
//! ```

pub mod error;
pub mod pdf;
pub mod date;
pub mod record;
pub mod session;

// Re-export commonly used items
pub use error::{Error, ErrorKind, Result};
pub use record::{MetadataKey, MetadataRecord};
pub use session::Session;
