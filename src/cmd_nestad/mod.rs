//! Subcommand modules for the `nestad` binary.

pub mod boundary2tad;
