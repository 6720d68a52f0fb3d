// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

//! Translation of legacy Cray `mpp*` resource requests into the PBS
//! `select`/`place` language, and resolution of `mppnodes` into a vnode
//! `node_set`.
//!
//! The core under [`app`] works on snapshots handed over through the ports
//! in [`app::ports`]; [`adapters`] holds the in-memory and file-backed
//! implementations used by the host binary and by tests.

pub mod adapters;
pub mod app;
