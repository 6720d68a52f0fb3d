// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use crate::app::errors::AppResult;
use crate::app::types::Vnode;

/// Server-wide vnode listing, the equivalent of `pbsnodes -av`.
pub trait InventoryPort: Send + Sync {
    fn vnodes(&self) -> AppResult<Vec<Vnode>>;
}
