use std::{env, env::VarError};

/// The server takes no command-line arguments. Anything on the command line prints the help text and a summary
/// of the current (non-secret) environment, so operators can see what the server would start with.
///
/// Returns whether help was printed, in which case the caller should not start the server.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        print_help();
        print_env_summary();
    }
    has_cli_args
}

fn print_help() {
    const HELP: &str = include_str!("./cli-help.txt");
    println!("\n{HELP}\n");
}

// Only variables on this list are ever echoed. Secrets stay off it.
fn print_env_summary() {
    const DISPLAY_ENVS: [&str; 8] = [
        "RUST_LOG",
        "TBS_HOST",
        "TBS_PORT",
        "TBS_DATABASE_URL",
        "TBS_SITE_URL",
        "TBS_TOKEN_LIFETIME",
        "TBS_STRIPE_API_URL",
        "TBS_STRIPE_SIGNATURE_CHECKS",
    ];
    println!("Current environment values (EXCLUDING variables that contain secrets):");
    for name in DISPLAY_ENVS {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    }
}
