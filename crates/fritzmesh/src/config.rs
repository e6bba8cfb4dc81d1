//! CLI configuration: thin wrapper around `fritzmesh_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--mesh-file, --mesh-url, etc.).

use fritzmesh_core::MeshConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use fritzmesh_config::{
    Config, Profile, SourceKind, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Whether any flag names a source on its own.
fn flags_name_source(global: &GlobalOpts) -> bool {
    global.mesh_file.is_some() || global.mesh_url.is_some()
}

/// Overlay global flags onto a profile. Flags win over profile values.
pub fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref path) = global.mesh_file {
        profile.source = Some(SourceKind::File);
        profile.mesh_file = Some(path.clone());
    }
    if let Some(ref url) = global.mesh_url {
        profile.source = Some(SourceKind::Http);
        profile.mesh_url = Some(url.clone());
    }
    if let Some(ref path) = global.hosts_file {
        profile.hosts_file = Some(path.clone());
    }
    if let Some(ref url) = global.hosts_url {
        profile.hosts_url = Some(url.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(secs) = global.timeout {
        profile.timeout = Some(secs);
    }
}

/// Build a `MeshConfig` from the config file, active profile, and flag overrides.
pub fn build_mesh_config(global: &GlobalOpts) -> Result<MeshConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => {
            let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            names.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None if flags_name_source(global) => Profile::default(),
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    apply_overrides(&mut profile, global);
    tracing::debug!(profile = %profile_name, source = ?profile.source_kind(), "resolved profile");

    let mut mesh_config =
        fritzmesh_config::profile_to_mesh_config(&profile, &profile_name, &cfg.defaults)?;
    mesh_config.enrich = !global.no_enrich;
    Ok(mesh_config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use std::path::PathBuf;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["fritzmesh"];
        argv.extend_from_slice(args);
        argv.push("topology");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_profile_source() {
        let mut profile = Profile {
            mesh_url: Some("http://fritz.box/mesh.json".into()),
            ..Profile::default()
        };
        apply_overrides(
            &mut profile,
            &global(&["--mesh-file", "capture.json", "--timeout", "3", "-k"]),
        );
        assert_eq!(profile.source_kind(), SourceKind::File);
        assert_eq!(profile.mesh_file, Some(PathBuf::from("capture.json")));
        assert_eq!(profile.timeout, Some(3));
        assert_eq!(profile.insecure, Some(true));
    }

    #[test]
    fn profile_flag_beats_default_profile() {
        let cfg = Config {
            default_profile: Some("home".into()),
            ..Config::default()
        };
        assert_eq!(active_profile_name(&global(&[]), &cfg), "home");
        assert_eq!(active_profile_name(&global(&["-p", "lab"]), &cfg), "lab");
    }
}
