// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Latest-known fix, shared between the stream reader and its consumers.
//!
//! The store holds at most one fragment per sentence type, always the most
//! recently decoded one. It is created once at startup and handed to every
//! task as an `Arc<FixStore>`.
//!
//! All three operations take the lock for a single assignment or clone, and
//! the lock is never held across an `.await`. Readers therefore always see
//! the store as of one instant; there is no guarantee that fragments of
//! different types describe the same receiver epoch.

use std::sync::{PoisonError, RwLock};

use mifi_gps_proto::fragment::{FixFragment, Gga, Gsa, Gsv, Rmc, Vtg};
use serde::Serialize;

/// A point-in-time copy of every slot in the [`FixStore`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FixSnapshot {
    /// Latest position/velocity fragment.
    pub rmc: Option<Rmc>,
    /// Latest fix data fragment (altitude, quality).
    pub gga: Option<Gga>,
    /// Latest satellite geometry fragment.
    pub gsa: Option<Gsa>,
    /// Latest satellites-in-view fragment.
    pub gsv: Option<Gsv>,
    /// Latest track-made-good fragment.
    pub vtg: Option<Vtg>,
}

impl FixSnapshot {
    /// Returns `true` if no slot holds a fragment.
    pub fn is_empty(&self) -> bool {
        self.rmc.is_none()
            && self.gga.is_none()
            && self.gsa.is_none()
            && self.gsv.is_none()
            && self.vtg.is_none()
    }

    fn apply(&mut self, fragment: FixFragment) {
        match fragment {
            FixFragment::Rmc(rmc) => self.rmc = Some(rmc),
            FixFragment::Gga(gga) => self.gga = Some(gga),
            FixFragment::Gsa(gsa) => self.gsa = Some(gsa),
            FixFragment::Gsv(gsv) => self.gsv = Some(gsv),
            FixFragment::Vtg(vtg) => self.vtg = Some(vtg),
        }
    }
}

/// Lock-protected holder of the latest fragment of each type.
#[derive(Debug, Default)]
pub struct FixStore {
    slots: RwLock<FixSnapshot>,
}

impl FixStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot matching the fragment's type.
    pub fn update(&self, fragment: FixFragment) {
        // A poisoned lock cannot hold a torn value: every write is one
        // assignment, so recovering the guard is sound.
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.apply(fragment);
    }

    /// Copy all slots out under a read lock.
    pub fn snapshot(&self) -> FixSnapshot {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Empty every slot, signalling that no current data is available.
    pub fn clear(&self) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        *slots = FixSnapshot::default();
    }
}
