// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::fmt;

use thiserror::Error as ThisError;

pub mod codes {
    pub const INVALID_ARGUMENT: &str = "invalid_argument";
    pub const NOT_FOUND: &str = "not_found";
    pub const INVENTORY_ERROR: &str = "inventory_error";
    pub const SNAPSHOT_ERROR: &str = "snapshot_error";
    pub const INTERNAL_ERROR: &str = "internal_error";
    pub const LOCAL_ERROR: &str = "local_error";
}

/// Prefix the scheduler shows in front of every translation reject.
pub const REJECT_PREFIX: &str = "The following error was encountered: \n";

/// Reasons a translation rejects the job or reservation.
///
/// Every variant is terminal for the current event.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum TranslateError {
    #[error("Event Job or Resv parameter is not set")]
    MissingEntity,

    #[error("mpp resources cannot be used with \"select\" or \"place\"")]
    Conflict,

    #[error(
        "Bad range '{token}', the first number ({lower}) must be less than second number ({upper})"
    )]
    BadRange { token: String, lower: i64, upper: i64 },

    #[error("Bad range '{token}', both ends of the range must be integers")]
    InvalidRangeBound { token: String },

    #[error("No matching vnodes for the given mppnodes {node_list}")]
    NoMatch { node_list: String },

    #[error("{resource} must be a positive integer, got '{value}'")]
    InvalidValue { resource: &'static str, value: String },
}

impl TranslateError {
    /// Message handed back to the scheduler with the reject.
    pub fn reject_reason(&self) -> String {
        match self {
            TranslateError::MissingEntity => self.to_string(),
            _ => format!("{REJECT_PREFIX}{self}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppErrorKind {
    InvalidArgument,
    NotFound,
    Internal,
}

impl AppErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AppErrorKind::InvalidArgument => "invalid_argument",
            AppErrorKind::NotFound => "not_found",
            AppErrorKind::Internal => "internal",
        }
    }
}

/// Failure of the machinery around a translation (reading snapshots,
/// querying the inventory, rendering output). Not a verdict.
#[derive(Debug, Clone)]
pub struct AppError {
    kind: AppErrorKind,
    code: &'static str,
    message: String,
    context: Option<String>,
}

impl AppError {
    pub fn with_message(
        kind: AppErrorKind,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
            context: None,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::with_message(AppErrorKind::InvalidArgument, codes::INVALID_ARGUMENT, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(AppErrorKind::NotFound, codes::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(AppErrorKind::Internal, codes::INTERNAL_ERROR, message)
    }

    pub fn inventory(message: impl Into<String>) -> Self {
        Self::with_message(AppErrorKind::Internal, codes::INVENTORY_ERROR, message)
    }

    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::with_message(AppErrorKind::InvalidArgument, codes::SNAPSHOT_ERROR, message)
    }

    pub fn local(message: impl Into<String>) -> Self {
        Self::with_message(AppErrorKind::Internal, codes::LOCAL_ERROR, message)
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn kind(&self) -> AppErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ctx) = &self.context {
            write!(f, "{} ({})", self.message, ctx)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;
