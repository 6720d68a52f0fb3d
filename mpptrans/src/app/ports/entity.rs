// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

/// Attribute store of the job or reservation the event concerns.
///
/// Reads see the state at the time of the call; writes are applied in the
/// order they are made and are not rolled back when the event is rejected.
pub trait EntityPort {
    /// Job id for a queued job, `qmove` reference for a reservation.
    /// Present when the entity already existed before this event.
    fn existing_ref(&self) -> Option<&str>;

    fn resource(&self, name: &str) -> Option<&str>;
    fn set_resource(&mut self, name: &str, value: String);
    fn clear_resource(&mut self, name: &str);

    fn node_set(&self) -> Option<&str>;
    fn set_node_set(&mut self, value: String);
}
