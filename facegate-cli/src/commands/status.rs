//! Status command - show directory status and summary

use anyhow::Result;
use colored::Colorize;

use super::{get_context, get_data_dir};

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;

    let user_count = ctx.directory.user_count();
    let enrolled_count = ctx.directory.enrolled_users().len();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "users": user_count,
                "faceEnrolled": enrolled_count,
                "faceLoginEnabled": ctx.config.face_login_enabled,
            }))?
        );
        return Ok(());
    }

    println!("{}", "FaceGate Status".bold());
    println!();
    println!("  Data directory:     {}", get_data_dir()?.display());
    println!("  Registered users:   {user_count}");
    println!("  Face enrollments:   {enrolled_count}");
    println!(
        "  Face login:         {}",
        if ctx.config.face_login_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    Ok(())
}
