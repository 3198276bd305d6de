use std::io::Stdout;
use std::path::Path;

use clap::Args;
use rooti_core::{Config, CoreError, MemoryLog, Session};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::load_config;
use crate::driver::TickDriver;
use crate::render::Renderer;
use crate::shell::{self, ShellCommand, HELP};

#[derive(Args)]
pub struct RunArgs {
    /// Routine to load instead of the configured preset, e.g. study:50,break:10
    #[arg(long)]
    routine: Option<String>,
    /// Do not tick in real time; advance the clock with `tick [n]`
    #[arg(long)]
    manual_clock: bool,
}

pub fn run(args: RunArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;
    if let Some(list) = &args.routine {
        config.routine.segments = shell::parse_routine(list)?;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(shell_loop(config, args.manual_clock));
    // The stdin reader may still be parked in a blocking read.
    runtime.shutdown_background();
    result
}

async fn shell_loop(config: Config, manual_clock: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::from_config(&config, MemoryLog::new());
    let (mut driver, mut ticks) = TickDriver::new(manual_clock);
    let mut renderer = Renderer::new(std::io::stdout(), config.pause.categories.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    renderer.routine(session.routine().segments())?;
    renderer.command_events(&[session.display()])?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match shell::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(command)) => {
                        execute(&mut session, &mut driver, &mut renderer, &config, command)?;
                    }
                    Err(message) => renderer.error(&message)?,
                }
            }
            Some(handle) = ticks.recv() => {
                let events = session.tick(handle);
                driver.follow(&events);
                renderer.tick_events(&events)?;
            }
        }
    }

    tracing::debug!(entries = session.sink().len(), "shell closed");
    Ok(())
}

fn execute(
    session: &mut Session<MemoryLog>,
    driver: &mut TickDriver,
    renderer: &mut Renderer<Stdout>,
    config: &Config,
    command: ShellCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let events = match command {
        ShellCommand::Add { kind, minutes } => {
            let minutes = minutes.unwrap_or_else(|| config.default_minutes(kind).to_string());
            match session.add_segment_input(kind, &minutes) {
                Ok((_, events)) => events,
                // Same as remove/clear while running: nothing happens.
                Err(CoreError::EditingLocked) => return Ok(()),
                Err(e) => {
                    renderer.error(&e.to_string())?;
                    return Ok(());
                }
            }
        }
        // Position 0 does not exist; treat it like any other bad index.
        ShellCommand::Remove(n) => session.remove_segment(n.checked_sub(1).unwrap_or(usize::MAX)),
        ShellCommand::Clear => session.clear_segments(),
        ShellCommand::Start => session.start(),
        ShellCommand::Pause => session.pause(true),
        ShellCommand::Toggle => session.toggle(),
        ShellCommand::Reset => session.reset(),
        ShellCommand::Log => session.log_current_session(),
        ShellCommand::Status => vec![session.snapshot()],
        ShellCommand::List => {
            renderer.routine(session.routine().segments())?;
            return Ok(());
        }
        ShellCommand::Logs => {
            renderer.logs(session.sink().entries())?;
            return Ok(());
        }
        ShellCommand::Delete(n) => {
            let id = n
                .checked_sub(1)
                .and_then(|i| session.sink().entries().get(i))
                .map(|e| e.id);
            if let Some(id) = id {
                session.sink_mut().remove(id);
            }
            renderer.logs(session.sink().entries())?;
            return Ok(());
        }
        ShellCommand::Category(text) => session.submit_pause_category(&text),
        ShellCommand::Preset(n) => session.submit_pause_preset(n),
        ShellCommand::Cancel => session.cancel_pause_category(),
        ShellCommand::Tick(n) => {
            let mut events = Vec::new();
            for _ in 0..n {
                let Some(handle) = session.engine().tick_handle() else {
                    break;
                };
                let tick_events = session.tick(handle);
                driver.follow(&tick_events);
                events.extend(tick_events);
            }
            renderer.tick_events(&events)?;
            renderer.command_events(&[session.display()])?;
            return Ok(());
        }
        ShellCommand::Help => {
            renderer.line(HELP)?;
            return Ok(());
        }
        ShellCommand::Quit => return Ok(()),
    };

    driver.follow(&events);
    renderer.command_events(&events)?;
    Ok(())
}
