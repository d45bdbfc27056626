// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::io::BufRead;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use simple_error::{SimpleError, SimpleResult};
use tracing::warn;

use crate::config::{Config, OutputType};
use crate::pipeline::GcParser;
use crate::preprocess::Preprocessor;
use crate::renderer::Message;

pub type Reader = fn(
  config: Arc<Config>, tx: Sender<Message>
) -> SimpleResult<JoinHandle<SimpleResult<()>>>;

/// The work done on the reader thread for each line
enum Stage {
  Preprocess(Preprocessor),
  Parse(GcParser)
}

impl Stage {
  fn new(config: &Config) -> Stage {
    let options = config.parse_options();

    match config.output {
      OutputType::Canonical => Stage::Preprocess(Preprocessor::new(options.preprocess)),
      _ => Stage::Parse(GcParser::new(options))
    }
  }

  fn push(&mut self, line: &str) -> Vec<Message> {
    match self {
      Stage::Preprocess(p) => p.push(line).into_iter().map(Message::Canonical).collect(),
      Stage::Parse(p) => p.push(line).into_iter().map(Message::Output).collect()
    }
  }

  fn finish(self) -> Vec<Message> {
    match self {
      Stage::Preprocess(p) => p.finish().into_iter().map(Message::Canonical).collect(),
      Stage::Parse(p) => p.finish().into_iter().map(Message::Output).collect()
    }
  }

  fn cancel(self) {
    match self {
      Stage::Preprocess(p) => p.cancel(),
      Stage::Parse(p) => p.cancel()
    }
  }
}

/// Runs each line of `input` through the pipeline and sends the results to
/// the renderer, followed by an Eof message.
pub fn pump<R: BufRead>(config: &Config, input: R, tx: &Sender<Message>) -> SimpleResult<()> {
  let mut stage = Stage::new(config);

  let mut empty = true;
  for line in input.lines() {
    let line = line.map_err(SimpleError::from)?;
    empty = false;

    for message in stage.push(&line) {
      if tx.send(message).is_err() {
        // assume the renderer has quit and stop
        stage.cancel();
        return Ok(());
      }
    }
  }

  if empty {
    warn!("reached end of input without reading any lines");
  }

  for message in stage.finish() {
    if tx.send(message).is_err() {
      return Ok(());
    }
  }

  // not much we can do if this fails
  tx.send(Message::Eof).ok();

  Ok(())
}
