// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

use serde::Serialize;
use serde_json;
use simple_error::{SimpleError, SimpleResult};

use crate::config::Config;
use crate::pipeline::Output;
use crate::renderer::types::*;

fn print_json<T: Serialize>(value: &T) -> bool {
  match serde_json::to_string(value) {
    Ok(s) => {
      println!("{}", s);
      true
    },
    Err(e) => {
      eprintln!("error converting output to json: {:?}", e);
      false
    }
  }
}

/// Writes each event as a line of JSON
pub fn json_renderer(_: Arc<Config>, rx: Receiver<Message>) -> SimpleResult<JoinHandle<()>> {
  thread::Builder::new().name("json_renderer".to_string()).spawn(move || {
    for message in rx {
      match message {
        Message::Eof => break,
        Message::Output(Output::Event(event)) => if !print_json(&event) {
          break;
        },
        _ => ()
      }
    }
  }).map_err(SimpleError::from)
}

/// Writes a line of JSON for each line that produced no event
pub fn diagnostic_renderer(
  _: Arc<Config>, rx: Receiver<Message>
) -> SimpleResult<JoinHandle<()>> {
  thread::Builder::new().name("diagnostic_renderer".to_string()).spawn(move || {
    for message in rx {
      match message {
        Message::Eof => break,
        Message::Output(Output::Diagnostic(diagnostic)) => if !print_json(&diagnostic) {
          break;
        },
        _ => ()
      }
    }
  }).map_err(SimpleError::from)
}
