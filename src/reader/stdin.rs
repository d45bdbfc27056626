// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::io;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use simple_error::{SimpleError, SimpleResult};

use crate::config::Config;
use crate::renderer::Message;
use super::types::pump;

pub fn read_stdin(
  config: Arc<Config>,
  tx: Sender<Message>
) -> SimpleResult<JoinHandle<SimpleResult<()>>> {
  thread::Builder::new().name("read_stdin".to_string()).spawn(move || {
    let stdin = io::stdin();
    let lock = stdin.lock();

    pump(&config, lock, &tx)
  }).map_err(SimpleError::from)
}
