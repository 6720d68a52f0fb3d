// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::process::ExitCode;

use mpptrans::app::errors::AppError;

mod args;
mod commands;
mod config;
mod logging;
mod output;

use args::Cmd;

const EXIT_LOCAL_ERROR: u8 = 2;

fn log_config_report(report: &config::ConfigReport) {
    match (&report.config_path, report.config_path_source) {
        (Some(path), Some(source)) => {
            tracing::info!(
                "config path: {} (source={}, present={})",
                path.display(),
                source.as_str(),
                report.config_file_present
            );
        }
        (Some(path), None) => {
            tracing::info!(
                "config path: {} (present={})",
                path.display(),
                report.config_file_present
            );
        }
        (None, _) => {
            tracing::info!("config path: (none)");
        }
    }
    match &report.inventory_path.value {
        Some(path) => tracing::info!(
            "config inventory_path: {} (source={})",
            path.display(),
            report.inventory_path.source.as_str()
        ),
        None => tracing::info!(
            "config inventory_path: (none) (source={})",
            report.inventory_path.source.as_str()
        ),
    }
    tracing::info!(
        "config inventory_format: {} (source={})",
        report
            .inventory_format
            .value
            .map(|format| format.as_str())
            .unwrap_or("by extension"),
        report.inventory_format.source.as_str()
    );
    tracing::info!(
        "config nid_attribute: {} (source={})",
        report.nid_attribute.value,
        report.nid_attribute.source.as_str()
    );
    tracing::info!(
        "config host_attribute: {} (source={})",
        report.host_attribute.value,
        report.host_attribute.source.as_str()
    );
    tracing::info!(
        "config verbose: {} (source={})",
        report.verbose.value,
        report.verbose.source.as_str()
    );
}

fn main() -> ExitCode {
    let parsed = args::parse_cli();
    let cli = parsed.cli;
    let output = output::for_mode(cli.json);

    let (inventory, inventory_format) = match &cli.cmd {
        Cmd::Translate(args) => (args.inventory.clone(), args.inventory_format),
        _ => (None, None),
    };
    let config::LoadResult { config, report } = match config::load_with_report(
        cli.config.clone(),
        config::Overrides {
            inventory_path: inventory,
            inventory_format,
            verbose: parsed.verbose_override,
        },
    ) {
        Ok(loaded) => loaded,
        Err(err) => {
            let _ = output.render_error(&AppError::local(format!("{err:#}")));
            return ExitCode::from(EXIT_LOCAL_ERROR);
        }
    };
    logging::init(config.verbose);
    log_config_report(&report);

    let result = match commands::dispatch(&cli.cmd, &config) {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(code = err.code(), "{err}");
            let _ = output.render_error(&err);
            return ExitCode::from(EXIT_LOCAL_ERROR);
        }
    };
    if let Err(err) = output.render(&result) {
        tracing::error!(code = err.code(), "{err}");
        return ExitCode::from(EXIT_LOCAL_ERROR);
    }
    ExitCode::from(result.exit_code())
}
