pub mod properties;
pub mod serialize;
