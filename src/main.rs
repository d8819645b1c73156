//! dev - the general-purpose dev tool
//!
//! A thin CLI over Bazel: every subcommand maps onto one or more `bazel`
//! invocations whose output and exit status are relayed back to the user.
//!
//! ## Architecture
//!
//! ```text
//! cli → commands/* → bazel::Bazel → exec::CommandRunner → bazel
//! ```

mod bazel;
mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod utils;

use clap::Parser;

use cli::Cli;
use utils::terminal;

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    terminal::init_logging(cli.debug, console::colors_enabled_stderr());

    if let Err(err) = cli.execute() {
        terminal::print_error(&err);
        std::process::exit(1);
    }
}
