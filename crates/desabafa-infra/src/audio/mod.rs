//! Audio content store backed by a directory on disk.

pub mod fs;

pub use fs::FsAudioStore;
