//! Login command - password login and identity display

use anyhow::Result;
use colored::Colorize;
use dialoguer::Password;

use super::get_context;
use crate::output;

pub fn run(username: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let password = Password::new().with_prompt("Password").interact()?;
    let user = ctx.directory.login(username, &password)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "username": user.username,
                "email": user.email,
                "registeredAt": user.registered_at,
                "faceEnrolled": user.has_face(),
            }))?
        );
        return Ok(());
    }

    output::success("Login successful");
    println!();
    println!("{}", "Identity".bold());
    println!("  Username:   {}", user.username);
    println!("  Email:      {}", user.email);
    println!(
        "  Registered: {}",
        user.registered_at.format("%d/%m/%Y %H:%M")
    );
    if user.has_face() {
        println!("  Face login: enrolled");
    }
    Ok(())
}
