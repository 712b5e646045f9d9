pub mod common;
pub mod mass;
pub mod stamp;
