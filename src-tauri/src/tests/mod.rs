mod lifecycle_tests;
mod test_data_helpers;

pub use test_data_helpers::*;
