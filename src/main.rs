// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::error::Error;
use std::io;
use std::process;
use std::sync::Arc;
use std::sync::mpsc::channel;

use simple_error::SimpleError;
use structopt::StructOpt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use gclog::config::Config;

fn main() -> Result<(), Box<dyn Error>> {
  // stdout carries the output, so logs go to stderr
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "gclog=warn".into()))
    .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
    .init();

  let config = Arc::new(Config::from_args());

  let reader_impl = match Config::get_reader(Arc::clone(&config)) {
    Some(reader_impl) => reader_impl,
    None => {
      eprintln!(
        "{}\n\n{}\n\n{}",
        "error: no input was given, pass a log file or pipe in some input",
        Config::clap().get_matches().usage(),
        "For more information, see --help"
      );

      process::exit(1);
    }
  };
  let renderer_impl = config.output.get_renderer();

  let (tx, rx) = channel();
  let renderer = renderer_impl(Arc::clone(&config), rx)?;
  let reader = reader_impl(Arc::clone(&config), tx)?;

  let read_result = reader.join();
  if renderer.join().is_err() {
    return Err(SimpleError::new("renderer thread did not exit cleanly").into());
  }

  match read_result {
    Ok(result) => Ok(result?),
    Err(_) => Err(SimpleError::new("reader thread did not exit cleanly").into())
  }
}
