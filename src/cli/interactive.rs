// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Line-driven capture loop
//!
//! Commands are read from stdin while a recognition request runs in the
//! background, so the camera can be closed before the result arrives.

use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::render::{advisory_line, results_panel, status_line};
use crate::capture::{CaptureController, CaptureSession};

/// Arguments for the interactive command
#[derive(Args, Debug)]
pub struct InteractiveArgs {
    /// Camera source: an image file or a directory of captured frames
    #[arg(long)]
    pub camera: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Open,
    Close,
    Capture,
    Status,
    Dismiss,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "t" | "toggle" => Ok(Command::Toggle),
            "o" | "open" => Ok(Command::Open),
            "c" | "close" => Ok(Command::Close),
            "s" | "snap" | "capture" => Ok(Command::Capture),
            "status" => Ok(Command::Status),
            "ok" | "dismiss" => Ok(Command::Dismiss),
            "h" | "?" | "help" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command '{}'", other)),
        }
    }
}

const HELP: &str = "Commands: open, close, toggle, capture, status, dismiss, help, quit";

/// Run the loop until `quit` or end of input
pub async fn run(mut controller: CaptureController) -> Result<()> {
    let permission = controller.initialize().await;
    if !permission.is_granted() {
        print_advisory(controller.session());
        return Err(anyhow!("camera permission denied"));
    }

    println!("🥗 NutraScan");
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let pending = controller.is_pending();
        tokio::select! {
            _ = async { controller.complete().await; }, if pending => {
                print_outcome(controller.session());
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}. {}", e, HELP);
                        continue;
                    }
                };
                if command == Command::Quit {
                    break;
                }
                handle_command(&mut controller, command).await;
            }
        }
    }

    if controller.is_pending() {
        debug!("Exiting with a recognition request still running");
    }
    controller.shutdown();
    Ok(())
}

async fn handle_command(controller: &mut CaptureController, command: Command) {
    match command {
        Command::Toggle => {
            controller.toggle_camera();
            println!("{}", status_line(controller.session()));
        }
        Command::Open | Command::Close => {
            let want_open = command == Command::Open;
            if controller.session().camera_open() != want_open {
                controller.toggle_camera();
            }
            println!("{}", status_line(controller.session()));
        }
        Command::Capture => {
            if controller.session().in_flight() {
                println!("⏳ Still processing the previous image");
            } else if !controller.session().camera_open() {
                println!("Open the camera first");
            } else if controller.capture().await {
                println!("⏳ Processing your image...");
            } else {
                print_advisory(controller.session());
            }
        }
        Command::Status => {
            println!("{}", status_line(controller.session()));
            if let Some(panel) = controller.session().result().and_then(results_panel) {
                print!("{}", panel);
            }
        }
        Command::Dismiss => {
            controller.dismiss_advisory();
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

/// Print the results panel or the advisory left by a finished cycle
pub fn print_outcome(session: &CaptureSession) {
    if let Some(panel) = session.result().and_then(results_panel) {
        print!("{}", panel);
    }
    print_advisory(session);
}

fn print_advisory(session: &CaptureSession) {
    if let Some(advisory) = session.advisory() {
        println!("{}", advisory_line(advisory));
    }
}
