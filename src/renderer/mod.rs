// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

mod types;
mod json;
mod raw;

pub use types::*;
pub use json::{json_renderer, diagnostic_renderer};
pub use raw::raw_renderer;
