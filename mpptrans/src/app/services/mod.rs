// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod guard;
pub mod legacy;
pub mod nodes;
pub mod select;
