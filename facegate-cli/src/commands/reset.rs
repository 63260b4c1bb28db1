//! Reset command - password reset code lifecycle

use anyhow::Result;
use clap::Subcommand;
use dialoguer::Password;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum ResetCommands {
    /// Request a reset code for an email address
    Request {
        /// Account email address
        email: String,
    },
    /// Confirm a reset code and set a new password
    Confirm {
        /// Account email address
        email: String,
        /// The reset code that was delivered
        code: String,
    },
}

pub fn run(command: ResetCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        ResetCommands::Request { email } => {
            let code = ctx.reset_flow.request_reset(&email)?;
            // Out-of-band delivery surrogate; a real deployment would
            // hand this to a mailer instead of printing it.
            output::info(&format!("Reset code for {email}: {code}"));
            output::warning("The code expires in 5 minutes");
        }
        ResetCommands::Confirm { email, code } => {
            // Pre-check before prompting, the way the desktop app gates
            // its reset form; reset_password re-verifies regardless.
            if !ctx.reset_flow.verify_code(&email, &code) {
                output::error("Invalid or expired reset code");
                anyhow::bail!("reset code verification failed");
            }

            let new_password = Password::new()
                .with_prompt("New password")
                .with_confirmation("Confirm new password", "Passwords do not match")
                .interact()?;

            ctx.reset_flow.reset_password(&email, &code, &new_password)?;
            output::success("Password has been reset, you can now log in");
        }
    }
    Ok(())
}
