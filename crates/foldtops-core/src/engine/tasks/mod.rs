//! Analysis stages run on one chain, in pipeline order.
//!
//! Each stage is a free `run` function over plain data: hydrogen-bond detection,
//! environment classification, segment assembly, sheet construction, orientation
//! and chirality assignment.

pub mod assembly;
pub mod chirality;
pub mod environment;
pub mod hbond_detection;
pub mod orientation;
pub mod sheets;
