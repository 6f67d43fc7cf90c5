//! Auth command handlers: login, register, logout, whoami.

use std::io::IsTerminal;

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};

use showroom_config::ConfigError;
use showroom_core::{Credentials, Registration, User};

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;
use crate::session::Session;

use super::util::{or_dash, prompt_err};

fn detail(user: &User) -> String {
    [
        format!("ID:          {}", user.id),
        format!("Name:        {}", user.name),
        format!("Email:       {}", user.email),
        format!("Dealership:  {}", or_dash(user.dealership.as_deref())),
        format!("Verified:    {}", user.verified),
    ]
    .join("\n")
}

// ── Credential prompts ──────────────────────────────────────────────

fn email(session: &Session) -> Result<String, CliError> {
    let resolved = &session.resolved;
    match showroom_config::resolve_email(&resolved.profile, &resolved.name) {
        Ok(email) => Ok(email),
        Err(ConfigError::NoCredentials { profile }) if !std::io::stdin().is_terminal() => {
            Err(CliError::NoCredentials { profile })
        }
        Err(ConfigError::NoCredentials { .. }) => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(prompt_err),
        Err(other) => Err(other.into()),
    }
}

fn password(session: &Session) -> Result<SecretString, CliError> {
    let resolved = &session.resolved;
    match showroom_config::resolve_password(&resolved.profile, &resolved.name) {
        Ok(password) => Ok(password),
        Err(ConfigError::NoCredentials { profile }) if !std::io::stdin().is_terminal() => {
            Err(CliError::NoCredentials { profile })
        }
        Err(ConfigError::NoCredentials { .. }) => prompt_password("Password: "),
        Err(other) => Err(other.into()),
    }
}

fn prompt_password(label: &str) -> Result<SecretString, CliError> {
    let value = rpassword::prompt_password(label).map_err(prompt_err)?;
    if value.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(value))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: AuthArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Login => {
            let session = Session::connect(global)?;
            let profile = session.resolved.name.clone();
            let credentials = Credentials {
                email: email(&session)?,
                password: password(&session)?,
            };

            let result = session.controller.login(&credentials).await;
            let user = match result {
                Ok(user) => user,
                Err(err) => {
                    session.finish(true).await;
                    return Err(auth_error(err.into(), &profile));
                }
            };
            session.persist(&user)?;
            finish_sign_in(session, &user, global).await
        }

        AuthCommand::Register { name, dealership } => {
            let session = Session::connect(global)?;
            let email = email(&session)?;
            let password = prompt_password("Password: ")?;
            let again = prompt_password("Confirm password: ")?;
            if password.expose_secret() != again.expose_secret() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "passwords do not match".into(),
                });
            }

            let registration = Registration {
                name,
                email,
                password,
                dealership,
            };
            let result = session.controller.register(&registration).await;
            let user = match result {
                Ok(user) => user,
                Err(err) => {
                    session.finish(true).await;
                    return Err(err.into());
                }
            };
            session.persist(&user)?;
            finish_sign_in(session, &user, global).await
        }

        AuthCommand::Logout => {
            let session = Session::connect(global)?;
            if session.restore_cookie()? {
                session.controller.logout().await?;
            }
            session.forget()?;
            let color = session.color();
            session.finish(true).await;
            output::success("Logged out", color, global.quiet);
            Ok(())
        }

        AuthCommand::Whoami => {
            let session = Session::connect(global)?;
            let user = session.cached_user()?.ok_or_else(|| CliError::NotLoggedIn {
                profile: session.resolved.name.clone(),
            })?;
            let out = output::render_single(&global.output, &user, detail, |u| u.email.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Wait for the bootstrap loads a verified login kicks off, then report.
async fn finish_sign_in(session: Session, user: &User, global: &GlobalOpts) -> Result<(), CliError> {
    let color = session.color();
    session.controller.settle().await;
    let state = session.controller.snapshot();
    session.finish(global.quiet).await;

    if user.verified {
        output::success(
            &format!(
                "Logged in as {} ({} vehicles, {} contacts)",
                user.email,
                state.inventory.vehicles.len(),
                state.contacts.contacts.len()
            ),
            color,
            global.quiet,
        );
    } else {
        output::warning(
            &format!(
                "{} is not verified yet. Follow the link in the verification email, then log in again.",
                user.email
            ),
            color,
        );
    }
    Ok(())
}

/// Name the profile in authentication failures.
fn auth_error(err: CliError, profile: &str) -> CliError {
    match err {
        CliError::AuthFailed { message, .. } => CliError::AuthFailed {
            profile: profile.to_owned(),
            message,
        },
        other => other,
    }
}
