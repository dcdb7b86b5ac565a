//! Command-line configuration
//!
//! With no arguments the binary narrates every routine to stdout and exits. The
//! optional flags only change how the same run is presented:
//!
//! ```text
//! heapwalk            plain narration on stdout
//! heapwalk --tui      replay the recorded stages in a terminal viewer
//! heapwalk -v         debug logging on stderr
//! heapwalk --heap-limit 16
//!                     cap the bytes held at once; exceeding it is fatal
//! ```

use crate::constants::DEFAULT_HEAP_LIMIT;
use crate::errors::ConfigError;

/// How the recorded run is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Plain,
    Tui,
}

/// Settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: OutputMode,
    pub verbose: bool,
    pub heap_limit: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            mode: OutputMode::Plain,
            verbose: false,
            heap_limit: DEFAULT_HEAP_LIMIT,
        }
    }
}

/// What the binary was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(RunConfig),
    Help,
}

/// Parse arguments, excluding the program name
pub fn parse_args<I, S>(args: I) -> Result<Command, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut config = RunConfig::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_ref() {
            "--tui" => config.mode = OutputMode::Tui,
            "--heap-limit" => {
                let value = args
                    .next()
                    .ok_or_else(|| ConfigError::MissingValue("--heap-limit".to_string()))?;
                let value = value.as_ref();
                config.heap_limit = value.parse().map_err(|_| ConfigError::InvalidValue {
                    option: "--heap-limit".to_string(),
                    value: value.to_string(),
                })?;
            }
            "-v" | "--verbose" => config.verbose = true,
            "-h" | "--help" => return Ok(Command::Help),
            other => return Err(ConfigError::UnknownArgument(other.to_string())),
        }
    }
    Ok(Command::Run(config))
}

/// Usage text for `program`
pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [--tui] [-v|--verbose] [--heap-limit BYTES]\n\
         \n\
         Walks through manual heap allocation: byte views, growth and two leaks.\n\
         \n\
         Options:\n\
         \x20 --tui          Step through the recorded stages in a terminal viewer\n\
         \x20 -v, --verbose  Log allocator activity to stderr\n\
         \x20 --heap-limit BYTES\n\
         \x20                Most bytes held at once (default 10 MB)\n\
         \x20 -h, --help     Show this message"
    )
}
