use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 18] = [
        "RUST_LOG",
        "YCM_HOST",
        "YCM_PORT",
        "YCM_DATABASE_URL",
        "YCM_RUN_MIGRATIONS",
        "YCM_NAME_MAPPINGS_FILE",
        "YCM_USE_X_FORWARDED_FOR",
        "YCM_USE_FORWARDED",
        "YCM_WEBHOOK_HMAC_CHECKS",
        "YCM_WEBHOOK_HMAC_HEADER",
        "YCM_WEBHOOK_IP_WHITELIST",
        "YCM_MAIL_RELAY_URL",
        "YCM_MAIL_FROM",
        "YCM_ADMIN_EMAIL",
        "YCM_ORGANIZATION_NAME",
        "YCM_INVITE_DOMAIN",
        "YCM_ORGANIZATION_TIMEZONE",
        "YCM_INVITE_RECIPIENT_OVERRIDE",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
