use anyhow::Result;
use colored::Colorize;
use modelclock::prelude::*;
use modelclock::{ENGINE_NAME, VERSION as LIB_VERSION};
use rustyline::highlight::Highlighter;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::collections::HashMap;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");
const FRAME_DT: f64 = 1.0 / 30.0;

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct CommandHighlighter;

impl Highlighter for CommandHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            let colored_command = command.yellow().bold();
            let colored_rest = rest.yellow();
            Cow::Owned(format!("{} {}", colored_command, colored_rest))
        } else {
            Cow::Owned(line.yellow().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    println!("{}", "modelshell".cyan().bold());
    let version_string = format!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );
    println!("{}", version_string.dimmed());
}

/// Loads a `TimebaseConfig` from `modelshell.toml` (or the file named in
/// `MODELSHELL_CONFIG`). A missing file yields the defaults.
fn load_config() -> Result<TimebaseConfig> {
    let path = env::var("MODELSHELL_CONFIG").unwrap_or_else(|_| "modelshell".to_string());
    let settings = config::Config::builder()
        .add_source(config::File::with_name(&path).required(false))
        .build()?;
    Ok(settings.try_deserialize()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    print_banner();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let cfg = load_config()?;
    let clock = Arc::new(Mutex::new(Timebase::new(cfg)?));

    // Shared flag for the tick echo.
    let watching = Arc::new(AtomicBool::new(false));

    // Stand-in for the host render loop: a background task advancing the
    // clock at ~30 fps.
    {
        let clock = clock.clone();
        let watching = watching.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs_f64(FRAME_DT));
            let mut frame: u64 = 0;
            loop {
                ticker.tick().await;
                let t = {
                    let mut clock = clock.lock().unwrap();
                    clock.advance(FRAME_DT);
                    clock.model_time()
                };
                frame += 1;
                if watching.load(Ordering::Relaxed) && frame % 15 == 0 {
                    println!("\n<-- [TICK] t = {:.3} s", t);
                }
            }
        });
    }

    info!("Driving {} in the background at ~30 fps...", ENGINE_NAME.cyan());

    // The shell's state management variables.
    let mut active_cues: HashMap<usize, CueId> = HashMap::new();
    let mut next_handle: usize = 0;

    let mut rl: Editor<CommandHighlighter, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CommandHighlighter));

    println!(
        "{} is running. Type 'help' for commands or 'exit' to quit.",
        ENGINE_NAME.cyan()
    );

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        let readline = rl.readline(&prompt);
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let args = line.trim().split_whitespace().collect::<Vec<_>>();

                if let Some(command) = args.first() {
                    match *command {
                        "play" => {
                            clock.lock().unwrap().play();
                            println!("--> Playing.");
                        }
                        "pause" => {
                            clock.lock().unwrap().pause();
                            println!("--> Paused.");
                        }
                        "toggle" => {
                            let running = {
                                let mut clock = clock.lock().unwrap();
                                clock.toggle();
                                clock.running()
                            };
                            println!("--> Now {}.", if running { "playing" } else { "paused" });
                        }
                        "rate" => match args.get(1).map(|s| s.parse::<f64>()) {
                            Some(Ok(r)) => {
                                clock.lock().unwrap().set_rate(r);
                                println!("--> Rate set to {}.", r);
                            }
                            _ => println!("Usage: rate <MODEL_SECONDS_PER_REAL_SECOND>"),
                        },
                        "reverse" => {
                            clock.lock().unwrap().reverse();
                            println!("--> Playing in reverse.");
                        }
                        "forward" => {
                            clock.lock().unwrap().forward();
                            println!("--> Playing forward.");
                        }
                        "seek" => match args.get(1).map(|s| s.parse::<f64>()) {
                            Some(Ok(t)) => {
                                let landed = {
                                    let mut clock = clock.lock().unwrap();
                                    clock.seek(t);
                                    clock.model_time()
                                };
                                println!("--> Seeked to t = {:.3} s (no cues fired).", landed);
                            }
                            _ => println!("Usage: seek <SECONDS>"),
                        },
                        "window" => {
                            let bounds = (
                                args.get(1).map(|s| s.parse::<f64>()),
                                args.get(2).map(|s| s.parse::<f64>()),
                            );
                            if let (Some(Ok(t_min)), Some(Ok(t_max))) = bounds {
                                match clock.lock().unwrap().set_window(t_min, t_max) {
                                    Ok(()) => {
                                        println!("--> Window set to [{}, {}].", t_min, t_max)
                                    }
                                    Err(e) => println!("Error: {}", e),
                                }
                            } else {
                                println!("Usage: window <T_MIN> <T_MAX>  (inf allowed for T_MAX)");
                            }
                        }
                        "wrap" => {
                            let mode = match args.get(1).copied() {
                                Some("clamp") => Some(WrapMode::Clamp),
                                Some("loop") => Some(WrapMode::Loop),
                                Some("pingpong") => Some(WrapMode::PingPong),
                                _ => None,
                            };
                            if let Some(mode) = mode {
                                match clock.lock().unwrap().set_wrap(mode) {
                                    Ok(()) => println!("--> Wrap mode set to {:?}.", mode),
                                    Err(e) => println!("Error: {}", e),
                                }
                            } else {
                                println!("Usage: wrap <clamp|loop|pingpong>");
                            }
                        }
                        "cue" => match args.get(1).map(|s| s.parse::<f64>()) {
                            Some(Ok(t)) => {
                                let id = clock.lock().unwrap().on(t, move |at| {
                                    println!("\n<-- [CUE] instant cue fired at t = {:.3} s", at);
                                });
                                let handle = next_handle;
                                active_cues.insert(handle, id);
                                next_handle += 1;
                                println!("--> Added instant cue at t = {} s with handle: #{}", t, handle);
                            }
                            _ => println!("Usage: cue <SECONDS>"),
                        },
                        "range" => {
                            let bounds = (
                                args.get(1).map(|s| s.parse::<f64>()),
                                args.get(2).map(|s| s.parse::<f64>()),
                            );
                            if let (Some(Ok(t0)), Some(Ok(t1))) = bounds {
                                let id = clock.lock().unwrap().on_range(
                                    t0,
                                    t1,
                                    move |t| {
                                        println!("\n<-- [RANGE] entered [{}, {}] at t = {:.3} s", t0, t1, t)
                                    },
                                    move |t| {
                                        println!("\n<-- [RANGE] left [{}, {}] at t = {:.3} s", t0, t1, t)
                                    },
                                );
                                let handle = next_handle;
                                active_cues.insert(handle, id);
                                next_handle += 1;
                                println!("--> Added range cue over [{}, {}] with handle: #{}", t0, t1, handle);
                            } else {
                                println!("Usage: range <T0> <T1>");
                            }
                        }
                        "cues" => {
                            println!("Active cues:");
                            for (handle, id) in &active_cues {
                                println!("  Handle #{}: {:?}", handle, id);
                            }
                        }
                        "clear" => {
                            clock.lock().unwrap().clear_cues();
                            active_cues.clear();
                            println!("--> All cues cleared.");
                        }
                        "status" => {
                            let clock = clock.lock().unwrap();
                            let window = clock.window();
                            println!("  time:    {:.3} s", clock.model_time());
                            println!("  rate:    {:+.3}", clock.rate());
                            println!("  state:   {}", if clock.running() { "playing" } else { "paused" });
                            println!("  wrap:    {:?}", clock.wrap_mode());
                            println!("  window:  [{}, {}]", window.t_min, window.t_max);
                        }
                        "watch" => match args.get(1).copied() {
                            Some("on") => {
                                watching.store(true, Ordering::Relaxed);
                                println!("--> Started echoing the tick stream.");
                            }
                            Some("off") => {
                                watching.store(false, Ordering::Relaxed);
                                println!("--> Stopped echoing the tick stream.");
                            }
                            _ => println!("Usage: watch <on|off>"),
                        },
                        "help" => {
                            println!("Available commands:");
                            println!("  play | pause | toggle    - Control the running state.");
                            println!("  rate <R>                 - Set playback speed (negative reverses).");
                            println!("  reverse | forward        - Force playback direction.");
                            println!("  seek <T>                 - Jump to a time without firing cues.");
                            println!("  window <A> <B>           - Replace the time window.");
                            println!("  wrap <clamp|loop|pingpong> - Set the boundary behavior.");
                            println!("  cue <T>                  - Add an instant cue at T seconds.");
                            println!("  range <T0> <T1>          - Add an enter/exit range cue.");
                            println!("  cues                     - List cue handles.");
                            println!("  clear                    - Remove all cues.");
                            println!("  status                   - Show the clock state.");
                            println!("  watch <on|off>           - Echo model time while it runs.");
                            println!("  exit                     - Quits the shell.");
                        }
                        "exit" => break,
                        "" => {}
                        _ => println!("Unknown command: '{}'. Type 'help'.", line),
                    }
                }
            }
            Err(_) => {
                println!("Exiting modelshell...");
                break;
            }
        }
    }

    Ok(())
}
