//! Register command - create a new user account

use anyhow::Result;
use dialoguer::{Input, Password};
use facegate_core::services::email_verification_code;

use super::get_context;
use crate::output;

pub fn run(username: &str, email: &str) -> Result<()> {
    let ctx = get_context()?;

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    // No email transport here: the code is surfaced for out-of-band
    // delivery and confirmed interactively.
    let code = email_verification_code();
    output::info(&format!("Verification code for {email}: {code}"));

    let entered: String = Input::new()
        .with_prompt(format!("Enter the 6-digit code sent to {email}"))
        .interact_text()?;
    if entered.trim() != code {
        output::error("Invalid verification code, registration cancelled");
        anyhow::bail!("email verification failed");
    }

    ctx.directory.register(username, &password, email)?;
    output::success(&format!("User {username} registered successfully"));
    Ok(())
}
