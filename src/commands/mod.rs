pub mod datasets;
pub mod histogram;
