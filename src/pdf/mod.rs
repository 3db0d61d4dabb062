//! PDF access module

pub mod metadata;

// Re-export commonly used items
pub use metadata::{
    apply_info, load_metadata, load_metadata_from_bytes, read_info, save_metadata,
    LopdfStore, MetadataStore,
};
