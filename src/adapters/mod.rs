// Adapters layer: concrete implementations for external systems (file input, local storage).

pub mod input;
pub mod storage;

pub use storage::LocalSaver;
