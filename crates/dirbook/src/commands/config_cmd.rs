//! Configuration command handlers. These run without a directory session.

use tabled::Tabled;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Profiles => profiles(global),
        ConfigCommand::SetPassword { profile } => set_password(profile, global),
    }
}

#[derive(Tabled, serde::Serialize)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Default")]
    default: String,
}

fn profiles(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let default_name = cfg.default_profile.clone().unwrap_or_default();

    let mut rows: Vec<ProfileRow> = cfg
        .profiles
        .iter()
        .map(|(name, profile)| ProfileRow {
            name: name.clone(),
            host: profile.host.clone(),
            default: if *name == default_name { "*".into() } else { String::new() },
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    if rows.is_empty() {
        return Err(CliError::NoConfig {
            path: config::config_path().display().to_string(),
        });
    }

    let rendered = output::render_list(
        &global.output,
        &rows,
        |row| ProfileRow {
            name: row.name.clone(),
            host: row.host.clone(),
            default: row.default.clone(),
        },
        |row| row.name.clone(),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn set_password(profile_flag: Option<String>, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let name = profile_flag.unwrap_or_else(|| config::active_profile_name(global, &cfg));

    if !cfg.profiles.contains_key(&name) {
        let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name,
            available: available.join(", "),
        });
    }

    let password = rpassword::prompt_password(format!("Bind password for profile '{name}': "))?;
    dirbook_config::store_password(&name, &password)?;

    output::print_output(
        &output::status_line("Password stored in keyring", output::should_color(&global.color)),
        global.quiet,
    );
    Ok(())
}
