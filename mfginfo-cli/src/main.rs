// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use flexi_logger::{FileSpec, Logger};
use mfginfo::layout::LayoutConfig;
use mfginfo::layout::mac::MacAddr;
use mfginfo::registry::CellRegistry;
use mfginfo::store::Store;
use serde_aco::help_text;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long)]
    /// Loglevel specification, see
    /// https://docs.rs/flexi_logger/latest/flexi_logger/struct.LogSpecification.html.
    /// If not set, environment variable $RUST_LOG is used.
    pub log_spec: Option<String>,

    #[arg(long)]
    pub log_to_file: bool,

    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every cell of a blob.
    Dump(DumpArgs),
    /// Print the value of one cell.
    Read(ReadArgs),
    /// Derive a MAC address from a base address and an index.
    Derive(DeriveArgs),
}

#[derive(Args, Debug, Clone)]
struct DumpArgs {
    #[arg(short, long)]
    blob: PathBuf,

    #[arg(short, long, long_help = help_text::<LayoutConfig>("Layout of the blob"))]
    layout: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct ReadArgs {
    #[arg(short, long)]
    blob: PathBuf,

    #[arg(short, long, long_help = help_text::<LayoutConfig>("Layout of the blob"))]
    layout: Option<String>,

    /// Name of the cell, e.g. mfg-mac.
    cell: String,

    #[arg(short, long, default_value_t = 0)]
    index: u32,
}

#[derive(Args, Debug, Clone)]
struct DeriveArgs {
    /// Base MAC address, e.g. 00:11:22:33:44:00.
    base: String,

    #[arg(short, long, default_value_t = 0)]
    index: u32,
}

fn parse_layout(layout: Option<&str>) -> Result<LayoutConfig> {
    let config = match layout {
        Some(s) => serde_aco::from_arg(s)?,
        None => LayoutConfig::default(),
    };
    Ok(config)
}

fn attach(blob: &Path, layout: Option<&str>) -> Result<CellRegistry> {
    let config = parse_layout(layout)?;
    let store = Store::open(blob)?;
    log::debug!("{}: source holds {} bytes", blob.display(), store.size()?);
    Ok(CellRegistry::attach(&store, &config)?)
}

fn main_dump(args: DumpArgs) -> Result<()> {
    let registry = attach(&args.blob, args.layout.as_deref())?;
    for cell in registry.cells() {
        let kind = match cell.transform {
            Some(_) => "mac",
            None => "raw",
        };
        println!(
            "{:24} offset {:#06x} len {:4} {kind}",
            cell.name, cell.offset, cell.len
        );
    }
    Ok(())
}

fn main_read(args: ReadArgs) -> Result<()> {
    let registry = attach(&args.blob, args.layout.as_deref())?;
    let value = registry.read(&args.cell, args.index)?;
    match std::str::from_utf8(&value) {
        Ok(s) if !s.chars().any(char::is_control) => println!("{s}"),
        _ => {
            let hex = value
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(":");
            println!("{hex}");
        }
    }
    Ok(())
}

fn main_derive(args: DeriveArgs) -> Result<()> {
    let base: MacAddr = serde_aco::from_arg(&args.base)?;
    println!("{}", base.offset_by(args.index));
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let logger = if let Some(ref spec) = cli.log_spec {
        Logger::try_with_str(spec)
    } else {
        Logger::try_with_env_or_str("warn")
    }?;
    let logger = if cli.log_to_file {
        logger.log_to_file(
            FileSpec::default()
                .suppress_timestamp()
                .o_directory(cli.log_dir),
        )
    } else {
        logger
    };
    let _handle = logger.start()?;
    log::debug!(
        "{} {} started...",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    );
    let Some(cmd) = cli.cmd else {
        return Ok(());
    };

    match cmd {
        Command::Dump(args) => main_dump(args)?,
        Command::Read(args) => main_read(args)?,
        Command::Derive(args) => main_derive(args)?,
    }
    Ok(())
}
