// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use mpptrans::adapters::inventory::InventoryFormat;

#[derive(Parser, Debug)]
#[command(
    name = "mpphook",
    version,
    about = "Translate Cray mpp* resource requests into PBS select/place and node_set",
    long_about = None,
    after_help = "Configuration precedence: defaults < config file < command-line flags.\n\
Config path precedence: defaults < MPPHOOK_CONFIG_PATH < command-line flags.\n\
Paths in the config file are resolved relative to the config file directory."
)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        value_name = "PATH",
        help = "Path to a TOML config file. When omitted, mpphook uses MPPHOOK_CONFIG_PATH if set, otherwise the default config file location if available."
    )]
    pub config: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::SetTrue,
        help = "Enable debug logging. Overrides `verbose` from the config file."
    )]
    pub verbose: bool,
    #[arg(long, global = true, help = "Print results as JSON.")]
    pub json: bool,
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Run the hook on a captured queuejob/resvsub event.
    Translate(TranslateArgs),
    /// Show the select/place produced for a set of mpp* values.
    Select(SelectArgs),
    /// Expand an mppnodes expression into node ids.
    Expand(ExpandArgs),
}

#[derive(Args, Debug)]
pub struct TranslateArgs {
    #[arg(
        long,
        value_name = "PATH",
        help = "Event snapshot as JSON; `-` reads standard input."
    )]
    pub event: PathBuf,
    #[arg(
        long,
        value_name = "PATH",
        help = "Vnode listing (JSON or `pbsnodes -av` output). Overrides `inventory_path` from the config file."
    )]
    pub inventory: Option<PathBuf>,
    #[arg(
        long,
        value_name = "FORMAT",
        help = "Vnode listing format: json or pbsnodes. Defaults to the file extension."
    )]
    pub inventory_format: Option<InventoryFormat>,
}

#[derive(Args, Debug, Default)]
pub struct SelectArgs {
    #[arg(long, value_name = "N")]
    pub mppwidth: Option<NonZeroU32>,
    #[arg(long, value_name = "N")]
    pub mppdepth: Option<NonZeroU32>,
    #[arg(long, value_name = "N")]
    pub mppnppn: Option<NonZeroU32>,
    #[arg(long)]
    pub mpparch: Option<String>,
    #[arg(long)]
    pub mpphost: Option<String>,
    #[arg(long)]
    pub mppmem: Option<String>,
    #[arg(long, value_name = "LABEL[,LABEL..]")]
    pub mpplabels: Option<String>,
    #[arg(long, help = "Vnode the job must launch from.")]
    pub vnode: Option<String>,
    #[arg(long, help = "Host the job must launch from.")]
    pub host: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Node list such as `5-7,9`.
    pub mppnodes: String,
}

pub struct ParsedCli {
    pub cli: Cli,
    pub verbose_override: Option<bool>,
}

pub fn parse_cli() -> ParsedCli {
    let matches = Cli::command().get_matches();
    let verbose_override = matches.get_flag("verbose").then_some(true);
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    ParsedCli {
        cli,
        verbose_override,
    }
}
