pub mod log_builder;
