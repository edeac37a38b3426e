// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loads a configuration directory and prints the merged result.
//!
//! To run this example:
//! ```bash
//! mkdir -p /tmp/cfg
//! printf 'testUrl: http://default\n---\nprofiles: dev\ntestUrl: http://dev\n' > /tmp/cfg/application.yml
//!
//! cargo run --example load_config -- --config-path /tmp/cfg --profiles dev
//!
//! # Environment variables work as well
//! CONFIG_PATH=/tmp/cfg ACTIVE_PROFILES=dev LOG_LEVEL=debug cargo run --example load_config
//! ```

use clap::Parser;
use profilecfg::domain::flatten;
use profilecfg::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "load_config", about = "Print the merged configuration")]
struct Cli {
    #[command(flatten)]
    loader: LoaderArgs,

    /// Only print this dot path
    #[arg(long, value_name = "PATH")]
    key: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = cli.loader.into_options()?;
    profilecfg::logging::init(options.log_level.as_deref())?;

    let loader = ConfigLoader::new(options)?;
    let config = loader.load()?;

    match cli.key {
        Some(key) => println!("{} = {}", key, loader.get(&key)?),
        None => {
            for (path, value) in flatten(&config) {
                println!("{} = {}", path, value);
            }
        }
    }

    Ok(())
}
