// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::num::NonZeroU32;

use crate::app::resources::{
    ARCH, CRAY_COMPUTE, CRAY_HOST, CRAY_LABEL_PREFIX, HOST, MEM, MPIPROCS, NCPUS, VNODE, VNTYPE,
};
use crate::app::types::{
    ChunkGroup, LegacyRequest, Placement, Provenance, SelectSpec, Sourced, Translation,
};

const ONE: NonZeroU32 = NonZeroU32::MIN;

/// Build the `select`/`place` equivalent of a legacy request.
///
/// Chunk layout:
/// 1. a `1:ncpus=1[:vnode=V][:host=H]` group when the request pins a vnode or
///    host, so the job launches from it;
/// 2. the translated group: chunk count from `mppwidth`, then `ncpus`,
///    `mpiprocs`, `arch`, `PBScrayhost`, `mem`, labels and `vntype`.
///
/// `ncpus` is only emitted when the user gave `mppdepth` or `mppnppn`, so
/// queue and server defaults still apply otherwise. `mpiprocs` and
/// `place=scatter` follow a user-given `mppnppn` only.
pub fn build(legacy: &LegacyRequest) -> Translation {
    let mut chunks = Vec::with_capacity(2);
    let mut consumed_pins = Vec::new();

    if legacy.pinned_vnode.is_some() || legacy.pinned_host.is_some() {
        let mut pin = ChunkGroup {
            count: Some(1),
            resources: Vec::new(),
        };
        pin.push(NCPUS, 1);
        if let Some(vnode) = &legacy.pinned_vnode {
            pin.push(VNODE, vnode);
            consumed_pins.push(VNODE);
        }
        if let Some(host) = &legacy.pinned_host {
            pin.push(HOST, host);
            consumed_pins.push(HOST);
        }
        chunks.push(pin);
    }

    let nppn = Sourced::or_default(legacy.units_per_node, ONE);
    let depth = Sourced::or_default(legacy.depth, ONE);

    let mut chunk = ChunkGroup::default();
    if let Some(width) = legacy.width {
        chunk.count = Some(chunk_count(width, nppn.value));
    }
    if !(nppn.is_defaulted() && depth.is_defaulted()) {
        let ncpus = u64::from(depth.value.get()) * u64::from(nppn.value.get());
        chunk.push(NCPUS, ncpus);
    }
    if nppn.provenance == Provenance::UserSupplied && nppn.value >= ONE {
        chunk.push(MPIPROCS, nppn.value);
    }
    if let Some(arch) = &legacy.arch {
        chunk.push(ARCH, arch);
    }
    if let Some(host) = &legacy.host {
        chunk.push(CRAY_HOST, host);
    }
    if let Some(mem) = &legacy.mem {
        chunk.push(MEM, mem);
    }
    for label in &legacy.labels {
        chunk.push(format!("{CRAY_LABEL_PREFIX}{label}"), "True");
    }
    chunk.push(VNTYPE, CRAY_COMPUTE);
    chunks.push(chunk);

    let place = (!nppn.is_defaulted()).then_some(Placement::Scatter);

    Translation {
        select: SelectSpec { chunks },
        place,
        units_per_node: nppn,
        depth,
        consumed_pins,
    }
}

/// `ceil(width / nppn)`.
pub fn chunk_count(width: NonZeroU32, nppn: NonZeroU32) -> u64 {
    let width = u64::from(width.get());
    let nppn = u64::from(nppn.get());
    (width + nppn - 1) / nppn
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(v: u32) -> Option<NonZeroU32> {
        NonZeroU32::new(v)
    }

    fn select_of(req: &LegacyRequest) -> String {
        build(req).select.to_string()
    }

    #[test]
    fn width_nppn_arch_scenario() {
        let req = LegacyRequest {
            width: nz(16),
            units_per_node: nz(4),
            arch: Some("XT".to_string()),
            ..Default::default()
        };
        let out = build(&req);
        assert_eq!(
            out.select.to_string(),
            "4:ncpus=4:mpiprocs=4:arch=XT:vntype=cray_compute"
        );
        assert_eq!(out.place, Some(Placement::Scatter));
        assert!(out.consumed_pins.is_empty());
    }

    #[test]
    fn chunk_count_rounds_up() {
        assert_eq!(chunk_count(NonZeroU32::new(10).unwrap(), NonZeroU32::new(3).unwrap()), 4);
        assert_eq!(chunk_count(NonZeroU32::new(9).unwrap(), NonZeroU32::new(3).unwrap()), 3);
        assert_eq!(chunk_count(NonZeroU32::MAX, NonZeroU32::MIN), u64::from(u32::MAX));
    }

    #[test]
    fn width_only_leaves_ncpus_to_defaults() {
        let req = LegacyRequest {
            width: nz(8),
            ..Default::default()
        };
        let out = build(&req);
        assert_eq!(out.select.to_string(), "8:vntype=cray_compute");
        assert_eq!(out.place, None);
        assert!(out.units_per_node.is_defaulted());
        assert!(out.depth.is_defaulted());
    }

    #[test]
    fn explicit_nppn_without_depth_sets_ncpus() {
        let req = LegacyRequest {
            units_per_node: nz(4),
            ..Default::default()
        };
        assert_eq!(select_of(&req), "ncpus=4:mpiprocs=4:vntype=cray_compute");
    }

    #[test]
    fn explicit_depth_without_nppn_sets_ncpus_only() {
        let req = LegacyRequest {
            width: nz(6),
            depth: nz(3),
            ..Default::default()
        };
        let out = build(&req);
        assert_eq!(out.select.to_string(), "6:ncpus=3:vntype=cray_compute");
        assert_eq!(out.place, None);
    }

    #[test]
    fn user_given_nppn_of_one_still_scatters() {
        let req = LegacyRequest {
            width: nz(2),
            units_per_node: nz(1),
            ..Default::default()
        };
        let out = build(&req);
        assert_eq!(out.select.to_string(), "2:ncpus=1:mpiprocs=1:vntype=cray_compute");
        assert_eq!(out.place, Some(Placement::Scatter));
    }

    #[test]
    fn depth_times_nppn() {
        let req = LegacyRequest {
            width: nz(12),
            depth: nz(2),
            units_per_node: nz(3),
            ..Default::default()
        };
        assert_eq!(select_of(&req), "4:ncpus=6:mpiprocs=3:vntype=cray_compute");
    }

    #[test]
    fn host_mem_and_labels_in_order() {
        let req = LegacyRequest {
            host: Some("cray1".to_string()),
            mem: Some("2gb".to_string()),
            labels: vec!["red".to_string(), "blue".to_string()],
            ..Default::default()
        };
        assert_eq!(
            select_of(&req),
            "PBScrayhost=cray1:mem=2gb:PBScraylabel_red=True:PBScraylabel_blue=True:vntype=cray_compute"
        );
    }

    #[test]
    fn pins_lead_the_select() {
        let req = LegacyRequest {
            width: nz(4),
            pinned_vnode: Some("login1".to_string()),
            pinned_host: Some("sdb".to_string()),
            ..Default::default()
        };
        let out = build(&req);
        assert_eq!(
            out.select.to_string(),
            "1:ncpus=1:vnode=login1:host=sdb+4:vntype=cray_compute"
        );
        assert_eq!(out.consumed_pins, vec![VNODE, HOST]);
    }

    #[test]
    fn host_pin_only() {
        let req = LegacyRequest {
            arch: Some("XT".to_string()),
            pinned_host: Some("sdb".to_string()),
            ..Default::default()
        };
        let out = build(&req);
        assert_eq!(out.select.to_string(), "1:ncpus=1:host=sdb+arch=XT:vntype=cray_compute");
        assert_eq!(out.consumed_pins, vec![HOST]);
    }

    #[test]
    fn building_twice_is_identical() {
        let req = LegacyRequest {
            width: nz(10),
            depth: nz(2),
            units_per_node: nz(3),
            labels: vec!["gpu".to_string()],
            ..Default::default()
        };
        assert_eq!(build(&req), build(&req));
    }
}
