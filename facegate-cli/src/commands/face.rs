//! Face command - face login from a recorded prediction stream
//!
//! The CLI has no camera pipeline; it replays recognizer predictions from
//! a JSON file (or stdin) and drives them through the same session logic
//! the desktop app uses.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use facegate_core::{FaceLoginOutcome, Prediction};

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum FaceCommands {
    /// Log in by replaying a recognizer prediction stream
    Login {
        /// JSON file of predictions ("-" for stdin)
        events: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: FaceCommands) -> Result<()> {
    match command {
        FaceCommands::Login { events, json } => login(&events, json),
    }
}

fn login(events: &PathBuf, json: bool) -> Result<()> {
    let ctx = get_context()?;
    if !ctx.config.face_login_enabled {
        anyhow::bail!("face login is disabled in settings");
    }

    let raw = if events.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(events)
            .with_context(|| format!("Failed to read events file: {:?}", events))?
    };
    let predictions: Vec<Prediction> =
        serde_json::from_str(&raw).context("Events file is not a valid prediction list")?;

    let outcome = ctx.face_auth_session().resolve(predictions);

    if json {
        let label = match &outcome {
            FaceLoginOutcome::Authenticated(user) => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "outcome": "authenticated",
                        "username": user.username,
                    }))?
                );
                ctx.directory.complete_face_login(&user.username)?;
                return Ok(());
            }
            FaceLoginOutcome::UnknownFace => "unknown_face",
            FaceLoginOutcome::MaxAttemptsReached => "max_attempts",
            FaceLoginOutcome::NoFaceDetected => "no_face_detected",
            FaceLoginOutcome::Cancelled => "cancelled",
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "outcome": label }))?
        );
        return Ok(());
    }

    match outcome {
        FaceLoginOutcome::Authenticated(user) => {
            ctx.directory.complete_face_login(&user.username)?;
            output::success(&format!("Welcome {}!", user.username));
        }
        FaceLoginOutcome::UnknownFace => output::error("Unknown face detected"),
        FaceLoginOutcome::MaxAttemptsReached => {
            output::error("Maximum recognition attempts reached")
        }
        FaceLoginOutcome::NoFaceDetected => output::warning("No face detected"),
        FaceLoginOutcome::Cancelled => output::warning("Face login cancelled"),
    }
    Ok(())
}
