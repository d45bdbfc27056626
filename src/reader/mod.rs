// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

pub mod types;
pub mod stdin;
pub mod file;

pub use types::{pump, Reader};
pub use stdin::read_stdin;
pub use file::read_file;
