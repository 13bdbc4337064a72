//! Versioned publishing of paginated manuals
//!
//! A publish bumps the stored version, renders the manual with that version
//! in every running head and stores the PDF under a per-version key.

mod options;
mod publish;
pub mod store;
mod types;
mod version;

pub use options::{PublishConfig, RendererConfig, RendererKind, StoreConfig};
pub use publish::Publisher;
pub use store::{
    BlobEntry, BlobStore, FsBlobStore, FsVersionStore, MemoryBlobStore, MemoryVersionStore,
    VersionStore,
};
pub use types::*;
pub use version::{BLOB_PREFIX, BumpKind, VERSION_KEY, VersionMeta};
