// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

//! Resource and attribute names shared by the translator and its adapters.

pub const MPPWIDTH: &str = "mppwidth";
pub const MPPDEPTH: &str = "mppdepth";
pub const MPPNPPN: &str = "mppnppn";
pub const MPPARCH: &str = "mpparch";
pub const MPPHOST: &str = "mpphost";
pub const MPPMEM: &str = "mppmem";
pub const MPPLABELS: &str = "mpplabels";
pub const MPPNODES: &str = "mppnodes";

pub const VNODE: &str = "vnode";
pub const HOST: &str = "host";

pub const SELECT: &str = "select";
pub const PLACE: &str = "place";

pub const NCPUS: &str = "ncpus";
pub const MPIPROCS: &str = "mpiprocs";
pub const ARCH: &str = "arch";
pub const MEM: &str = "mem";
pub const VNTYPE: &str = "vntype";
pub const CRAY_HOST: &str = "PBScrayhost";
pub const CRAY_LABEL_PREFIX: &str = "PBScraylabel_";
pub const CRAY_COMPUTE: &str = "cray_compute";

/// Vnode attribute holding the Cray node id matched against `mppnodes`.
pub const DEFAULT_NID_ATTRIBUTE: &str = "PBScraynid";
/// Vnode attribute holding the Cray host matched against `mpphost`.
pub const DEFAULT_HOST_ATTRIBUTE: &str = CRAY_HOST;
