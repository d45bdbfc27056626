// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use shellexpand;
use simple_error::{SimpleError, SimpleResult};
use tracing::debug;

use crate::config::Config;
use crate::renderer::Message;
use super::types::pump;

/// Reads the log file named by `--input`, with `~` and environment variables
/// expanded
pub fn read_file(
  config: Arc<Config>,
  tx: Sender<Message>
) -> SimpleResult<JoinHandle<SimpleResult<()>>> {
  let path = match &config.input {
    Some(path) => shellexpand::full(path).map_err(SimpleError::from)?.to_string(),
    None => bail!("no input file was given")
  };

  thread::Builder::new().name("read_file".to_string()).spawn(move || {
    debug!(path = %path, "reading log file");
    let file = File::open(&path)
      .map_err(|e| SimpleError::new(format!("could not open {}: {}", path, e)))?;

    pump(&config, BufReader::new(file), &tx)
  }).map_err(SimpleError::from)
}
