//! Column-oriented data files exchanged between the engine-side producers
//! and the validator.

pub use self::reader::DataTable;
pub use self::writer::{format_scientific, TableWriter};

mod reader;
mod writer;
