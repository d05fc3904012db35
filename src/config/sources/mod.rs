pub mod env;
pub mod file;
