//! Common value types shared by every crate in the workspace

pub mod asset;
pub mod errors;
pub mod identifiers;
pub mod price;
