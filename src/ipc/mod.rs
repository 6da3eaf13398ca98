//! Line-oriented request loop.
//!
//! Hosts that cannot link the library directly (a launcher process, a
//! script, a test rig) pipe newline-delimited JSON requests through the
//! `homegrid` binary.

pub mod session;
