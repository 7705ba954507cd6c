//! FFI bridge crate for the ProTrack UI shell.

pub mod api;
