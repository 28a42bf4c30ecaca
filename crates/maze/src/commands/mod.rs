pub mod configure;
pub mod plan;
