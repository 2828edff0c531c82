use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use jobsearch_core::{update, AppState, AppViewModel, Msg};
use jobsearch_logging::{search_info, search_warn};

use super::config;
use super::effects::EffectRunner;
use super::input::{parse_line, Command};
use super::logging;
use super::ui;

pub fn run_app() -> anyhow::Result<()> {
    let config = config::load_from_env().context("loading configuration")?;
    logging::initialize(config.log_destination);
    search_info!("Starting jobsearch against {}", config.api_base);

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(&config, msg_tx.clone()).context("starting fetch engine")?;

    println!("{}", ui::constants::HELP_TEXT);
    spawn_input_reader(msg_tx.clone());
    msg_tx
        .send(Msg::Started)
        .context("queueing start message")?;
    drop(msg_tx);

    let mut state = AppState::with_settings(config.search_settings());
    while let Ok(msg) = msg_rx.recv() {
        let stop = matches!(msg, Msg::Shutdown);
        let (next, effects) = update(state, msg);
        state = next;
        runner.run(effects);

        if state.consume_dirty() {
            draw(&state.view());
        }
        if stop {
            break;
        }
    }

    runner.shutdown();
    search_info!("Shut down");
    Ok(())
}

fn spawn_input_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    search_warn!("Failed to read input: {}", err);
                    break;
                }
            };
            let msg = match parse_line(&line) {
                Command::Dispatch(msg) => msg,
                Command::Quit => break,
                Command::Help => {
                    println!("{}", ui::constants::HELP_TEXT);
                    continue;
                }
                Command::Invalid(reason) => {
                    println!("{reason} (try {})", ui::constants::CMD_HELP);
                    continue;
                }
            };
            if msg_tx.send(msg).is_err() {
                return;
            }
        }
        let _ = msg_tx.send(Msg::Shutdown);
    });
}

fn draw(view: &AppViewModel) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in ui::render::render(view) {
        if writeln!(out, "{line}").is_err() {
            return;
        }
    }
    let _ = out.flush();
}
