// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use crate::app::ports::{DiagnosticsPort, Severity};

/// Sends hook diagnostics to `tracing` under the `mpptrans::hook` target.
#[derive(Clone, Default)]
pub struct TracingDiagnostics;

impl TracingDiagnostics {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticsPort for TracingDiagnostics {
    fn record(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!(target: "mpptrans::hook", "{message}"),
            Severity::Info => tracing::info!(target: "mpptrans::hook", "{message}"),
            Severity::Warning => tracing::warn!(target: "mpptrans::hook", "{message}"),
            Severity::Error => tracing::error!(target: "mpptrans::hook", "{message}"),
        }
    }
}
