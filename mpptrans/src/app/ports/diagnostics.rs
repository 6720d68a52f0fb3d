// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Server log sink for hook diagnostics. Not needed for correctness.
pub trait DiagnosticsPort: Send + Sync {
    fn record(&self, severity: Severity, message: &str);
}
