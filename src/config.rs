// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::error::Error;
use std::str::FromStr;
use std::sync::Arc;

use atty::{self, Stream};
use structopt::StructOpt;

use crate::parser::Collector;
use crate::pipeline::ParseOptions;
use crate::reader;
use crate::renderer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputType {
  Events,
  Canonical,
  Unknown
}

impl OutputType {
  pub fn get_renderer(self) -> renderer::Renderer {
    match self {
      OutputType::Events => renderer::json_renderer,
      OutputType::Canonical => renderer::raw_renderer,
      OutputType::Unknown => renderer::diagnostic_renderer
    }
  }
}

impl FromStr for OutputType {
  type Err = Box<dyn Error>;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "events" | "json" => Ok(OutputType::Events),
      "canonical" | "raw" => Ok(OutputType::Canonical),
      "unknown" | "diagnostics" => Ok(OutputType::Unknown),
      _ => bail!(format!("invalid output type: {}", s))
    }
  }
}

#[derive(Debug, StructOpt)]
#[structopt(
  name = "gclog",
  rename_all = "kebab-case",
  raw(setting = "structopt::clap::AppSettings::ColoredHelp")
)]
pub struct Config {
  /// Output to write, one of: events, canonical, unknown
  ///{n}{n}
  /// - `events` writes one JSON object per recognized event{n}
  /// - `canonical` writes the preprocessed lines, one event per line{n}
  /// - `unknown` writes a JSON diagnostic for each line that was not parsed
  #[structopt(long, short, default_value = "events", env = "GCLOG_OUTPUT")]
  pub output: OutputType,

  /// Disables reassembly of multi-line events
  ///
  /// Use this for logs written without detailed logging, where every event
  /// is already on a single line.
  #[structopt(long)]
  pub no_preprocess: bool,

  /// Collector family that wrote the log, one of: serial, parallel, cms, g1,
  /// shenandoah, z
  ///
  /// If unset, the family is taken from the log's `Using ...` header when
  /// there is one.
  #[structopt(long, short, env = "GCLOG_COLLECTOR")]
  pub collector: Option<Collector>,

  /// Log file to read. If unset, reads from standard input.
  pub input: Option<String>
}

impl Config {
  pub fn parse_options(&self) -> ParseOptions {
    ParseOptions {
      preprocess: !self.no_preprocess,
      collector: self.collector
    }
  }

  /// Selects a reader for the configured input, or None if there is nothing
  /// to read: no path was given and stdin is an interactive terminal.
  pub fn get_reader(config: Arc<Config>) -> Option<reader::Reader> {
    if config.input.is_some() {
      return Some(reader::read_file);
    }

    if atty::is(Stream::Stdin) {
      None
    } else {
      Some(reader::read_stdin)
    }
  }
}
