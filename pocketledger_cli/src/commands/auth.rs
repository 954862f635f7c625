use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use clap::Args;
use pocketledger_lib::SessionPreferences;

use super::Context;
use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Password; read from stdin when omitted
    #[arg(long)]
    pub password: Option<String>,
}

pub async fn login(args: &LoginArgs, ctx: &Context) -> Result<()> {
    let email = args.email.trim();
    if email.is_empty() || !email.contains('@') {
        bail!("invalid email '{}'", args.email);
    }
    let password = match &args.password {
        Some(password) => password.clone(),
        None => read_password()?,
    };
    if password.is_empty() {
        bail!("password cannot be empty");
    }

    let prefs = ctx.resolve(ctx.client.login(email, &password).await)?;
    eprintln!("Signed in as {}", display_name(&prefs, email));
    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn logout(ctx: &Context) -> Result<()> {
    ctx.resolve(ctx.client.logout())?;
    eprintln!("Signed out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    let Some(prefs) = ctx.client.session().preferences() else {
        eprintln!("Not signed in. Run `pocketledger login`.");
        return Ok(());
    };
    match ctx.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "username": prefs.username,
            "email": prefs.email,
            "expiresAt": prefs.expires_at,
        })),
        _ => {
            println!("{}", display_name(&prefs, "unknown user"));
            if let Some(expires_at) = prefs.expires_at {
                println!("Session expires {}", expires_at.format("%Y-%m-%d %H:%M UTC"));
            }
        }
    }
    Ok(())
}

fn display_name(prefs: &SessionPreferences, fallback: &str) -> String {
    match (&prefs.username, &prefs.email) {
        (Some(name), Some(email)) => format!("{} <{}>", name, email),
        (Some(name), None) => name.clone(),
        (None, Some(email)) => email.clone(),
        (None, None) => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_username_and_email() {
        let full = SessionPreferences {
            username: Some("ada".to_string()),
            email: Some("ada@example.com".to_string()),
            expires_at: None,
        };
        assert_eq!(display_name(&full, "x"), "ada <ada@example.com>");
        assert_eq!(display_name(&SessionPreferences::default(), "x"), "x");
    }
}
