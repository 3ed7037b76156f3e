//! `qbpatch OLDFILE NEWFILE DELTAFILE`: apply a binary patch.

use std::fs;
use std::process::ExitCode;

use argh::FromArgs;

/// Quick Binary Diff: reconstructs NEWFILE from OLDFILE and DELTAFILE.
#[derive(FromArgs)]
struct Args {
    /// the prior version of the file
    #[argh(positional)]
    old_file: String,

    /// where to write the reconstructed file
    #[argh(positional)]
    new_file: String,

    /// the patch produced by qbdiff
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
    let patch = match fs::read(&args.delta_file) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", args.delta_file);
            return ExitCode::FAILURE;
        }
    };

    let mut new_data = Vec::new();
    if let Err(e) = qbdelta::apply(&old, &patch, &mut new_data) {
        eprintln!("Failed to apply delta ({}: {e})", qbdelta::error_message(e.kind()));
        return ExitCode::FAILURE;
    }

    if let Err(e) = fs::write(&args.new_file, &new_data) {
        eprintln!("Failed to write {}: {e}", args.new_file);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
