// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod diagnostics;
pub mod entity;
pub mod inventory;

pub use diagnostics::{DiagnosticsPort, Severity};
pub use entity::EntityPort;
pub use inventory::InventoryPort;
