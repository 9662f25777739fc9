//! Personal work-time tracker for the terminal. Clock in, take your
//! mandatory breaks, and let the tracker clock you out before the working
//! day gets out of hand. Daily net totals are kept in plain text files that
//! are easy to read and easy to grep.
//!

pub mod cli;
pub mod sinks;
pub mod tracker;
pub mod utils;
