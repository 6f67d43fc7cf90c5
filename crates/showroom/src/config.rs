//! CLI configuration: a thin layer over `showroom_config` that applies
//! `GlobalOpts` flag overrides (--server, --email, --insecure, --timeout).

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use showroom_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

/// A profile with flag overrides applied, plus the global defaults it
/// falls back to.
#[derive(Debug)]
pub struct ResolvedProfile {
    pub name: String,
    pub profile: Profile,
    pub defaults: Defaults,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// The comma-separated profile names, or `(none)`.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Load the active profile and layer CLI flags over it.
///
/// Without a matching profile, `--server` alone is enough to build an
/// ad hoc one.
pub fn resolve(global: &GlobalOpts) -> Result<ResolvedProfile, CliError> {
    let mut cfg = load_config_or_default();
    let name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.remove(&name) {
        Some(profile) => profile,
        None => match global.server {
            Some(ref server) => Profile {
                server: server.clone(),
                ..Profile::default()
            },
            None if global.profile.is_some() => {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name,
                });
            }
            None => {
                return Err(CliError::NoConfig {
                    path: config_path().display().to_string(),
                });
            }
        },
    };

    apply_overrides(&mut profile, global);

    Ok(ResolvedProfile {
        name,
        profile,
        defaults: cfg.defaults,
    })
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if let Some(ref email) = global.email {
        profile.email = Some(email.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}
