//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Confirm, Input, Password, Select};
use fritzmesh_core::DebugMode;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile, SourceKind};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "poll_interval = {}", cfg.defaults.poll_interval);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let source = match p.source_kind() {
            SourceKind::File => "file",
            SourceKind::Http => "http",
        };
        let _ = writeln!(out, "source = \"{source}\"");
        if let Some(ref path) = p.mesh_file {
            let _ = writeln!(out, "mesh_file = \"{}\"", path.display());
        }
        if let Some(ref path) = p.hosts_file {
            let _ = writeln!(out, "hosts_file = \"{}\"", path.display());
        }
        if let Some(ref url) = p.mesh_url {
            let _ = writeln!(out, "mesh_url = \"{url}\"");
        }
        if let Some(ref url) = p.hosts_url {
            let _ = writeln!(out, "hosts_url = \"{url}\"");
        }
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(interval) = p.poll_interval {
            let _ = writeln!(out, "poll_interval = {interval}");
        }
        if let Some(ref mode) = p.debug_mode {
            let _ = writeln!(out, "debug_mode = \"{mode}\"");
        }
        if let Some(ref path) = p.debug_dump_path {
            let _ = writeln!(out, "debug_dump_path = \"{}\"", path.display());
        }
    }

    out
}

/// Delegate to the shared config crate's save function.
fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: "must be 'true' or 'false'".into(),
    })
}

fn parse_secs(field: &str, value: &str) -> Result<u64, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: "must be a number (seconds)".into(),
    })
}

/// Apply one `config set` key to a profile.
fn apply_setting(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key.replace('-', "_").as_str() {
        "source" => {
            profile.source = Some(match value.to_ascii_lowercase().as_str() {
                "file" => SourceKind::File,
                "http" => SourceKind::Http,
                _ => {
                    return Err(CliError::Validation {
                        field: "source".into(),
                        reason: "must be 'file' or 'http'".into(),
                    });
                }
            });
        }
        "mesh_file" => profile.mesh_file = Some(value.into()),
        "hosts_file" => profile.hosts_file = Some(value.into()),
        "mesh_url" => profile.mesh_url = Some(value),
        "hosts_url" => profile.hosts_url = Some(value),
        "username" => profile.username = Some(value),
        "password_env" => profile.password_env = Some(value),
        "insecure" => profile.insecure = Some(parse_bool("insecure", &value)?),
        "timeout" => profile.timeout = Some(parse_secs("timeout", &value)?),
        "poll_interval" => profile.poll_interval = Some(parse_secs("poll_interval", &value)?),
        "debug_mode" => {
            if value.parse::<DebugMode>().is_err() {
                return Err(CliError::Validation {
                    field: "debug_mode".into(),
                    reason: "must be 'off', 'log', 'file', or 'log_and_file'".into(),
                });
            }
            profile.debug_mode = Some(value);
        }
        "debug_dump_path" => profile.debug_dump_path = Some(value.into()),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: source, mesh_file, hosts_file, \
                     mesh_url, hosts_url, username, password_env, insecure, timeout, \
                     poll_interval, debug_mode, debug_dump_path"
                ),
            });
        }
    }
    Ok(())
}

/// Store a password in the system keyring under the profile's key.
fn store_in_keyring(profile_name: &str, secret: &str) -> Result<(), CliError> {
    let entry = keyring::Entry::new(
        fritzmesh_config::KEYRING_SERVICE,
        &fritzmesh_config::keyring_key(profile_name),
    )
    .map_err(|e| CliError::Validation {
        field: "keyring".into(),
        reason: format!("failed to access keyring: {e}"),
    })?;
    entry.set_password(secret).map_err(|e| CliError::Validation {
        field: "keyring".into(),
        reason: format!("failed to store password in keyring: {e}"),
    })
}

/// Offer to store a password in the system keyring or return it for plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_password_storage(profile_name: &str, secret: String) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        store_in_keyring(profile_name, &secret)?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret))
    }
}

/// Guided prompts for a new profile.
fn prompt_profile(profile_name: &str) -> Result<Profile, CliError> {
    let kinds = &["Router over HTTP", "Captured JSON files"];
    let kind = Select::new()
        .with_prompt("Mesh source")
        .items(kinds)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if kind == 1 {
        let mesh_file: String = Input::new()
            .with_prompt("Mesh snapshot file")
            .interact_text()
            .map_err(prompt_err)?;
        let hosts_file: String = Input::new()
            .with_prompt("Host list file (empty to skip)")
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_err)?;
        return Ok(Profile {
            source: Some(SourceKind::File),
            mesh_file: Some(mesh_file.into()),
            hosts_file: (!hosts_file.is_empty()).then(|| hosts_file.into()),
            ..Profile::default()
        });
    }

    let mesh_url: String = Input::new()
        .with_prompt("Mesh snapshot URL")
        .default("http://fritz.box/mesh.json".into())
        .interact_text()
        .map_err(prompt_err)?;
    let hosts_url: String = Input::new()
        .with_prompt("Host list URL (empty to skip)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let mut profile = Profile {
        source: Some(SourceKind::Http),
        mesh_url: Some(mesh_url),
        hosts_url: (!hosts_url.is_empty()).then_some(hosts_url),
        ..Profile::default()
    };

    let wants_auth = Confirm::new()
        .with_prompt("Does the source require a username and password?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    if wants_auth {
        let user: String = Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?;
        let pass = Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(prompt_err)?;
        if user.is_empty() || pass.is_empty() {
            return Err(CliError::Validation {
                field: "credentials".into(),
                reason: "username and password cannot be empty".into(),
            });
        }
        profile.username = Some(user);
        profile.password = prompt_password_storage(profile_name, pass)?;
    }

    Ok(profile)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("fritzmesh configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let profile = prompt_profile(&profile_name)?;

            // Keep any existing profiles alongside the new one.
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: fritzmesh topology");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config_redacted, |_| {
                "config".into()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            apply_setting(profile, &key, value)?;
            save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: fritzmesh config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
                available.sort();
                return Err(CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── Set password ────────────────────────────────────────────
        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            let pass = Password::new()
                .with_prompt(format!("Password for profile '{profile_name}'"))
                .interact()
                .map_err(prompt_err)?;
            if pass.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }
            store_in_keyring(&profile_name, &pass)?;
            eprintln!("✓ Password stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
