use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use oxicjs_require::Config;
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "oxicjs")]
#[command(about = "Tools for moving CommonJS code onto static ES imports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rewrite require calls into static imports
    Transform(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Transform(cfg) => {
            let num_threads = rayon::current_num_threads();
            info!("Running transform on {:?} (using {} threads)", cfg.files, num_threads);
            debug!(
                "Config: root={:?}, ignore={:?}, extensions={:?}, out_dir={:?}",
                cfg.root, cfg.ignore, cfg.extensions, cfg.out_dir
            );

            let json = cfg.json;
            let print_code = cfg.out_dir.is_none();
            let report = oxicjs_require::run_transform(cfg)?;
            debug!("{} modules transformed, {} failed", report.transformed(), report.failed());

            let elapsed_ms = start.elapsed().as_millis();

            if json {
                oxicjs_require::print_json(&mut stdout, &report)?;
            } else {
                if print_code {
                    oxicjs_require::print_code(&mut stdout, &report)?;
                }
                oxicjs_require::print_modules(&mut stdout, &report)?;
                oxicjs_require::print_summary(&mut stdout, &report)?;
                writeln!(
                    stdout,
                    "\n{} Finished in {}ms on {} files (using {} threads).",
                    "●".bright_blue(),
                    elapsed_ms.to_string().cyan(),
                    report.files_analyzed.to_string().cyan(),
                    num_threads.to_string().cyan()
                )?;
            }
            stdout.flush()?;

            // Non-zero exit to fail CI
            if report.failed() > 0 {
                std::process::exit(1);
            }

            Ok(())
        }
    }
}
