//! Parser and expected-value evaluator for memoria skill text.
//!
//! [skill] turns catalogue ability text into typed effects, [combat] turns a
//! roster of parsed cards into expected numbers, and [data], [server] and
//! [cli] wire both to the catalogue file, a local HTTP API and the command line.

pub mod cli;
pub mod combat;
pub mod config;
pub mod data;
pub mod parallel;
pub mod server;
pub mod skill;
