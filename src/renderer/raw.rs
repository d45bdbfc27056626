// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

use simple_error::{SimpleError, SimpleResult};

use crate::config::Config;
use crate::renderer::types::*;

/// Writes preprocessed lines as-is, one event per line
pub fn raw_renderer(_: Arc<Config>, rx: Receiver<Message>) -> SimpleResult<JoinHandle<()>> {
  thread::Builder::new().name("raw_renderer".to_string()).spawn(move || {
    for message in rx {
      match message {
        Message::Eof => break,
        Message::Canonical(line) => println!("{}", line.text),
        _ => ()
      }
    }
  }).map_err(SimpleError::from)
}
