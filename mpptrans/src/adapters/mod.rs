// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod diagnostics;
pub mod inventory;
pub mod snapshot;
pub mod value;
