//! Filesystem adapter for Upkeep
//! Stores blobs (signatures, generated reports) under a local root directory.

mod blob_store;

pub use blob_store::FsBlobStore;
