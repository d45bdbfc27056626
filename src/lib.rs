// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

#[macro_use] extern crate lazy_static;
#[macro_use] extern crate simple_error;

pub mod classifier;
pub mod config;
pub mod parser;
pub mod patterns;
pub mod pipeline;
pub mod preprocess;
pub mod reader;
pub mod renderer;

pub use pipeline::{parse_lines, GcParser, Output, ParseOptions, ParseResult};
