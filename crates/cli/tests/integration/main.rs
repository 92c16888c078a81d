mod common;
mod configure_tests;
mod generate_tests;
