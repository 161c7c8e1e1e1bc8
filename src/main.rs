use colored::*;
use std::process;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli_args = match occctl::cli::parse_args() {
        Ok(cli_args) => cli_args,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(e.exit_code());
        }
    };

    // Command output already reports each step, so logs stay at WARN unless asked for.
    let default_level = match cli_args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("OCCCTL_LOG")
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = occctl::cli::run(cli_args).await {
        let code = e.exit_code();
        if code == 0 {
            println!("{}", e);
        } else {
            eprintln!("{}: {}", "Error".red().bold(), e);
        }
        process::exit(code);
    }
}
