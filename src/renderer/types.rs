// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;

use simple_error::SimpleResult;

use crate::config::Config;
use crate::pipeline::Output;
use crate::preprocess::CanonicalLine;

/// Sent from the reader thread to the renderer thread
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
  /// A preprocessed line, sent when only preprocessing was requested
  Canonical(CanonicalLine),

  Output(Output),

  /// Sent when the end of input is reached
  Eof
}

pub type Renderer = fn(
  config: Arc<Config>, rx: Receiver<Message>
) -> SimpleResult<JoinHandle<()>>;
