// heapwalk: a narrated walk through manual heap allocation

use std::io::{self, Write};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use heapwalk::config::{parse_args, usage, Command, OutputMode, RunConfig};
use heapwalk::logging::init_logging;
use heapwalk::runner::DemoRunner;
use heapwalk::ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("heapwalk");

    let config = match parse_args(args.iter().skip(1)) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            println!("{}", usage(program_name));
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("{}", usage(program_name));
            std::process::exit(2);
        }
    };

    if let Err(e) = init_logging(&config) {
        eprintln!("Warning: logging unavailable: {}", e);
    }

    match config.mode {
        OutputMode::Plain => run_plain(&config),
        OutputMode::Tui => run_tui(&config),
    }
}

/// Narrate each stage to stdout as soon as it has run
fn run_plain(config: &RunConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut runner = DemoRunner::new(config.heap_limit);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    while !runner.is_finished() {
        match runner.step() {
            Ok(stage) => runner.narrator().write_stage(stage, &mut out)?,
            Err(e) => {
                // Whatever the failed stage narrated before the error
                runner.narrator().write_stage(runner.stage(), &mut out)?;
                out.flush()?;
                eprintln!("Fatal: {}", e);
                std::process::exit(1);
            }
        }
    }

    out.flush()?;
    Ok(())
}

/// Record the whole run, then replay it in the viewer
fn run_tui(config: &RunConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut runner = DemoRunner::new(config.heap_limit);
    let failure = runner.run().err();
    if let Some(e) = &failure {
        eprintln!("Fatal: {}", e);
        if runner.history().is_empty() {
            std::process::exit(1);
        }
        eprintln!("Entering viewer with partial history...");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(runner);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    if failure.is_some() {
        std::process::exit(1);
    }
    Ok(())
}
