//! Store backends used outside of tests.

pub mod file_store;

pub use file_store::FileStore;
