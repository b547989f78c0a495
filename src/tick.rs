//! Per-frame coordination of rendering and preview generation.
//!
//! Call [`TickCoordinator::tick`] once per display refresh from whatever
//! recurring scheduler the host has (`requestAnimationFrame`, a winit redraw,
//! a game loop). Each tick does one unit of work at most: a render pass when
//! the scene changed, otherwise one snapshot.

use tracing::trace;

use crate::cube::{Rasterizer, Scene};
use crate::snapshot::SnapshotCache;
use crate::{Catalog, PlaybackPosition};

/// What a tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The scene was dirty and has been rendered; snapshots were skipped
    Rendered,
    /// A snapshot was stored for this slot
    Filled(PlaybackPosition),
    /// The rasterizer had nothing yet for this slot; it is retried later
    Deferred(PlaybackPosition),
    /// Nothing to render and every slot is filled
    Idle,
}

/// Counters of work performed across ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub ticks: u64,
    pub renders: u64,
    pub fills: u64,
    pub deferrals: u64,
}

/// Splits each frame between rendering and preview generation.
#[derive(Clone, Debug, Default)]
pub struct TickCoordinator {
    stats: TickStats,
}

impl TickCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one tick.
    ///
    /// Rendering always wins: a dirty scene starves snapshot work for this
    /// tick. At most one rasterization happens per call.
    pub fn tick<I, Sc, R>(
        &mut self,
        scene: &mut Sc,
        cache: &mut SnapshotCache<I>,
        catalog: &Catalog,
        rasterizer: &mut R,
    ) -> TickOutcome
    where
        Sc: Scene + ?Sized,
        R: Rasterizer<Image = I>,
    {
        self.stats.ticks += 1;

        if scene.is_dirty() {
            scene.render();
            self.stats.renders += 1;
            return TickOutcome::Rendered;
        }

        let Some(position) = cache.next_pending_slot() else {
            return TickOutcome::Idle;
        };

        if cache.fill(catalog, rasterizer, position) {
            self.stats.fills += 1;
            TickOutcome::Filled(position)
        } else {
            trace!(?position, "snapshot deferred");
            self.stats.deferrals += 1;
            TickOutcome::Deferred(position)
        }
    }

    #[inline]
    pub fn stats(&self) -> TickStats {
        self.stats
    }
}
