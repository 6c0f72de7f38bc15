use anyhow::Result;
use colored::Colorize;
use ringclock::prelude::*;
use ringclock::{ENGINE_NAME, VERSION as LIB_VERSION};
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct MyHighlighter;

impl Highlighter for MyHighlighter {
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
    // `logo.txt` sits in the root of the `rdx-ringshell` crate.
    const LOGO_TEXT: &str = include_str!("../logo.txt");
    println!("{}", LOGO_TEXT.cyan());

    let version_string = format!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );
    let rule = "-".repeat(72);

    println!("{}", rule.dimmed());
    println!("{}", version_string);
    let license_blurb = "
    This software is provided 'as is', without warranty of any kind.
    Distributed under the MIT OR Apache-2.0 license. Use at your own risk.
    ";
    println!("{}", license_blurb.dimmed());
    println!("{}", rule.dimmed());
}

/// Spawns a task printing system events, and registers the live renderer
/// that is controlled by the shared `watching` flag.
async fn spawn_event_listeners(engine: &DialEngine, watching: Arc<AtomicBool>) {
    let mut system_rx = engine.subscribe_system_events();
    tokio::spawn(async move {
        while let Ok(event) = system_rx.recv().await {
            println!("\n<-- [SYSTEM EVENT] {:?}\n>> ", event);
        }
    });

    let renderer = TextRenderer::default();
    engine
        .on_render(move |state| {
            if watching.load(Ordering::Relaxed) {
                println!("\n{}", renderer.render(state));
            }
        })
        .await;
}

/// Prints every item of one ring with its fixed angle.
fn print_ring(ring: &RingState) {
    println!(
        "{} ring: {} items over {:?}, rotation {}",
        ring.kind.to_string().bold(),
        ring.items.len(),
        ring.sweep,
        ring.rotation
            .map(|r| format!("{r:+.2}°"))
            .unwrap_or_else(|| "none".to_string())
    );
    for (index, item) in ring.items.iter().enumerate() {
        let line = format!("  #{:<3} {:>4}  {:+8.2}°", index, item.label, item.angle);
        if ring.active == Some(index) {
            println!("{}", line.bold());
        } else {
            println!("{}", line.dimmed());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    print_banner();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let config_path = env::args().nth(1).map(PathBuf::from);
    let config = DialConfig::load(config_path.as_deref())?;
    let engine = DialEngine::new(config);
    let engine_handle = engine.clone();

    // Shared flag for the live renderer.
    let watching = Arc::new(AtomicBool::new(false));
    spawn_event_listeners(&engine_handle, watching.clone()).await;

    info!("Spawning {} in the background...", ENGINE_NAME.cyan());
    tokio::spawn(async move {
        if let Err(e) = engine.run().await {
            eprintln!("\nEngine stopped with an error: {}", e);
        }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    // The shell's state management variables.
    let mut active_listeners: HashMap<usize, (RingKind, ListenerId)> = HashMap::new();
    let mut next_handle: usize = 0;
    let renderer = TextRenderer::default();

    let mut rl = Editor::new()?;
    let helper = MyHighlighter {};
    rl.set_helper(Some(helper));

    println!("{} is running. Type 'help' for commands or 'exit' to quit.", ENGINE_NAME.cyan());

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        let readline = rl.readline(&prompt);
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let args = line.split_whitespace().collect::<Vec<_>>();

                if let Some(command) = args.first() {
                    match *command {
                        "set" => {
                            if args.len() > 1 {
                                // A manual date would be overwritten by the next tick.
                                engine_handle.set_auto_advance(false);
                                match engine_handle.set_date(&args[1..].join(" ")).await {
                                    Ok(state) => print!("{}", renderer.render(&state)),
                                    Err(e) => println!("--> {} The dial is cleared.", e),
                                }
                            } else {
                                println!("Usage: set <DATE>   e.g. set 2024-02-29T00:00:00");
                            }
                        }
                        "now" => {
                            let state = engine_handle.sync_now().await;
                            print!("{}", renderer.render(&state));
                        }
                        "tick" => match args.get(1) {
                            Some(&"on") => {
                                engine_handle.set_auto_advance(true);
                                println!("--> Following the wall clock.");
                            }
                            Some(&"off") => {
                                engine_handle.set_auto_advance(false);
                                println!("--> Dial frozen.");
                            }
                            _ => println!("Usage: tick on|off"),
                        },
                        "show" => {
                            let state = engine_handle.state().await;
                            print!("{}", renderer.render(&state));
                        }
                        "ring" => match args.get(1).map(|s| s.parse::<RingKind>()) {
                            Some(Ok(kind)) => {
                                let state = engine_handle.state().await;
                                match state.ring(kind) {
                                    Some(ring) => print_ring(ring),
                                    None => println!("--> The dial has no {} ring.", kind),
                                }
                            }
                            Some(Err(e)) => println!("Error: {}.", e),
                            None => println!("Usage: ring <day|month|weekday|hour|minute|second>"),
                        },
                        "watch" => match args.get(1) {
                            Some(&"on") => {
                                watching.store(true, Ordering::Relaxed);
                                println!("--> Printing the dial on every change.");
                            }
                            Some(&"off") => {
                                watching.store(false, Ordering::Relaxed);
                                println!("--> Stopped printing the dial.");
                            }
                            _ => println!("Usage: watch on|off"),
                        },
                        "listen" => match args.get(1).map(|s| s.parse::<RingKind>()) {
                            Some(Ok(kind)) => {
                                let listener_id = engine_handle
                                    .on_active_change(
                                        kind,
                                        move |from, to| {
                                            println!("<-- [{}] {:?} -> {:?}", kind, from, to)
                                        },
                                        false,
                                    )
                                    .await;
                                let handle = next_handle;
                                active_listeners.insert(handle, (kind, listener_id));
                                next_handle += 1;
                                println!("--> Listening to the {} ring with handle: #{}", kind, handle);
                            }
                            Some(Err(e)) => println!("Error: {}.", e),
                            None => println!("Usage: listen <RING>"),
                        },
                        "unlisten" => {
                            if let Some(handle_str) = args.get(1) {
                                if let Ok(handle) = handle_str.parse::<usize>() {
                                    if let Some((_, id)) = active_listeners.remove(&handle) {
                                        if engine_handle.remove_active_listener(id).await {
                                            println!("--> Listener successfully removed.");
                                        } else {
                                            println!("--> Error: Listener not found in engine.");
                                        }
                                    } else {
                                        println!("Error: Invalid handle #{}. Use 'list' to see active listeners.", handle);
                                    }
                                } else {
                                    println!("Error: Handle must be a number (e.g., '0', '1').");
                                }
                            } else {
                                println!("Usage: unlisten <HANDLE>");
                            }
                        }
                        "list" => {
                            println!("Active Listeners:");
                            for (handle, (kind, id)) in &active_listeners {
                                println!("  Handle #{}: {} ring {:?}", handle, kind, id);
                            }
                        }
                        "help" => {
                            println!("Available commands:");
                            println!("  set <DATE>            - Shows DATE and stops following the wall clock.");
                            println!("  now                   - Resyncs the dial to the wall clock once.");
                            println!("  tick on|off           - Follows the wall clock every tick, or freezes.");
                            println!("  show                  - Prints the dial.");
                            println!("  ring <RING>           - Prints every item of one ring.");
                            println!("  watch on|off          - Prints the dial whenever it changes.");
                            println!("  listen <RING>         - Reports each move of a ring's active item.");
                            println!("  list                  - Shows active listeners and their handles.");
                            println!("  unlisten <H>          - Removes a listener by its handle.");
                            println!("  exit                  - Quits the shell.");
                        }
                        "exit" => break,
                        _ => println!("Unknown command: '{}'. Type 'help'.", line),
                    }
                }
            }
            Err(_) => {
                println!("Exiting ringshell...");
                break;
            }
        }
    }

    Ok(())
}
