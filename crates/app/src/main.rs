// CLI modules
mod args;
mod op;
mod ops;
mod process;
mod state;
mod version;

use args::Args;
use clap::{Parser, Subcommand};
use op::Op;
use ops::{Cat, Flush, Init, Ls, Mkdir, Put, Rm, Rmdir, Stat, Touch, Version};

command_enum! {
    (Init, Init),
    (Ls, Ls),
    (Cat, Cat),
    (Stat, Stat),
    (Put, Put),
    (Mkdir, Mkdir),
    (Rm, Rm),
    (Rmdir, Rmdir),
    (Touch, Touch),
    (Flush, Flush),
    (Version, Version),
}

fn main() {
    let args = Args::parse();

    let ctx = op::OpContext::new(args.config_path, args.bucket);
    let guards = process::init_logging(&ctx.log_config());

    match args.command.execute(&ctx) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {}", e);
            // exit skips destructors
            drop(guards);
            std::process::exit(1);
        }
    }
}
