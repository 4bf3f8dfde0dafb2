//! Provides the main entry point to the program.
use ::log::error;
use human_panic::setup_panic;
use solar_model::cli::run_cli;
use solar_model::log::errors_are_logged;

fn main() {
    setup_panic!();

    if let Err(err) = run_cli() {
        // The logger may not be set up yet, or may be silenced
        if errors_are_logged() {
            error!("{err:?}");
        } else {
            eprintln!("Error: {err:?}");
        }

        // Terminate program, signalling an error
        std::process::exit(1);
    }
}
