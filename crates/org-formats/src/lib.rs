//! Format parsers for the Org sequencer.
//!
//! Parses Org song files and sample bank files into the IR.

mod bank_format;
mod error;
mod org_format;

pub use bank_format::{read_bank, write_bank};
pub use error::{AssetError, FormatError, LoadError};
pub use org_format::{read_org, write_org, ORG_MAGIC};
