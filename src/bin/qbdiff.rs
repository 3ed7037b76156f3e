//! `qbdiff OLDFILE NEWFILE DELTAFILE`: create a binary patch.

use std::fs;
use std::process::ExitCode;

use argh::FromArgs;

/// Quick Binary Diff: creates a binary patch DELTAFILE from OLDFILE to NEWFILE.
#[derive(FromArgs)]
struct Args {
    /// the prior version of the file
    #[argh(positional)]
    old_file: String,

    /// the new version of the file
    #[argh(positional)]
    new_file: String,

    /// where to write the resulting patch
    #[argh(positional)]
    delta_file: String,

    /// increase logging verbosity (debug level)
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// suppress all logging but errors
    #[argh(switch, short = 'q')]
    quiet: bool,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();
    let level = if args.quiet {
        log::LevelFilter::Error
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new().filter_level(level).init();

    let old = match fs::read(&args.old_file) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", args.old_file);
            return ExitCode::FAILURE;
        }
    };
    let new = match fs::read(&args.new_file) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", args.new_file);
            return ExitCode::FAILURE;
        }
    };

    let mut delta_file = match fs::File::create(&args.delta_file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!(
                "Failed to open delta file {} for writing: {e}",
                args.delta_file
            );
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = qbdelta::compute(&old, &new, &mut delta_file) {
        eprintln!(
            "Failed to create delta ({}: {e})",
            qbdelta::error_message(e.kind())
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
