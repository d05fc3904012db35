pub mod test_utils;

mod config_integration;
mod nested_computations;
