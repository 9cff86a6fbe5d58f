//! WF3D Terminal - rotating wireframe viewer for OBJ models
//!
//! Controls:
//!   - N/Tab, P: Next / previous model
//!   - +/-: Scale the model
//!   - R: Reload the current model
//!   - Q/ESC: Quit

use clap::Parser;
use wf3d_terminal::cli;

fn main() -> eyre::Result<()> {
    let args = cli::Args::parse();
    cli::init_logging(&args)?;

    cli::exec(args)
}
