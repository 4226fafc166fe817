//! Input and output formats.
//!
//! Structure sources implement [`traits::StructureFile`] and fill the backbone
//! model; [`tops`] renders analysed chains as TOPS strings.

pub mod backbone_csv;
pub mod tops;
pub mod traits;
