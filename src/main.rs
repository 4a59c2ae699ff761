mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use lessguard::{config, lint, output, rules};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Lint {
            paths,
            fix,
            format,
            output: output_path,
            strict,
            config: config_path,
        } => {
            if let Some(missing) = paths.iter().find(|p| !p.exists()) {
                eprintln!("Error: path does not exist: {}", missing.display());
                std::process::exit(2);
            }

            let mut config = config::Config::load(config_path.as_deref()).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(2);
            });

            if strict {
                config.strict = true;
            }

            let reports = lint::lint_paths(&paths, &config, fix);
            let formatted = output::format_reports(&reports, &format);

            if let Some(out_path) = output_path {
                std::fs::write(&out_path, &formatted).unwrap_or_else(|e| {
                    eprintln!("Error writing output: {e}");
                    std::process::exit(2);
                });
                eprintln!("Output written to {}", out_path.display());
            } else {
                print!("{formatted}");
            }

            let passed = reports.iter().all(|r| r.passed);
            std::process::exit(if passed { 0 } else { 1 });
        }

        Commands::ListRules => {
            let infos = rules::rule_infos();
            println!("{}", "Built-in Rules".bold().underline());
            println!();

            for info in &infos {
                let fixable = if info.fixable {
                    "FIX".green().bold().to_string()
                } else {
                    "   ".to_string()
                };
                println!(
                    "  [{fixable}] {name:<34} {description}",
                    name = info.name,
                    description = info.description,
                );
            }

            println!();
            println!("  Total: {} rules", infos.len());
        }

        Commands::Explain { rule } => match rules::rule_infos().iter().find(|r| r.name == rule) {
            Some(info) => {
                println!("{}", info.name.bold());
                println!();
                println!("  Description:  {}", info.description);
                println!(
                    "  Fixable:      {}",
                    if info.fixable { "yes" } else { "no" }
                );
                if let Some(url) = info.url {
                    println!("  Docs:         {url}");
                }
            }
            None => {
                eprintln!("Unknown rule: {rule}");
                eprintln!("Use 'lessguard list-rules' to see all available rules.");
                std::process::exit(2);
            }
        },
    }
}
