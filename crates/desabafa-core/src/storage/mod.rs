//! Content store abstraction for audio artifacts.

pub mod audio;
