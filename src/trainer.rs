//! Top-level trainer: playback engine, preview cache and tick coordinator.

use crate::cube::{CubeEngine, Rasterizer, Scene};
use crate::playback::PlaybackEngine;
use crate::snapshot::SnapshotCache;
use crate::store::PersistenceStore;
use crate::tick::{TickCoordinator, TickOutcome};
use crate::{Catalog, PlaybackPosition, TrainerConfig};

/// Everything an algorithm trainer screen needs behind its widgets.
///
/// Playback calls are forwarded to the [`PlaybackEngine`]. Edits also clear
/// the edited entry's preview so the next idle tick regenerates it.
pub struct Trainer<C, S, R: Rasterizer> {
    engine: PlaybackEngine<C, S>,
    snapshots: SnapshotCache<R::Image>,
    rasterizer: R,
    coordinator: TickCoordinator,
}

impl<C, S, R> Trainer<C, S, R>
where
    C: CubeEngine,
    S: PersistenceStore,
    R: Rasterizer,
{
    pub fn new(cube: C, store: S, catalog: Catalog, rasterizer: R) -> Self {
        Self::with_config(cube, store, catalog, rasterizer, TrainerConfig::default())
    }

    pub fn with_config(
        cube: C,
        store: S,
        catalog: Catalog,
        rasterizer: R,
        config: TrainerConfig,
    ) -> Self {
        let engine = PlaybackEngine::with_config(cube, store, catalog, config);
        let snapshots = SnapshotCache::for_catalog(engine.catalog());
        Self {
            engine,
            snapshots,
            rasterizer,
            coordinator: TickCoordinator::new(),
        }
    }

    /// Run one display-refresh tick. See [`TickCoordinator::tick`].
    pub fn tick<Sc: Scene + ?Sized>(&mut self, scene: &mut Sc) -> TickOutcome {
        self.coordinator.tick(
            scene,
            &mut self.snapshots,
            self.engine.catalog(),
            &mut self.rasterizer,
        )
    }

    /// Replace the selected entry's notation, persist it and drop its preview.
    pub fn edit(&mut self, exp: &str) {
        if let Some(position) = self.engine.edit(exp) {
            self.snapshots.invalidate(position);
        }
    }

    pub fn restore_default(&mut self) {
        if let Some(position) = self.engine.restore_default() {
            self.snapshots.invalidate(position);
        }
    }

    pub fn load(&mut self) {
        self.engine.load();
    }

    pub fn step_forward(&mut self) {
        self.engine.step_forward();
    }

    pub fn step_backward(&mut self) {
        self.engine.step_backward();
    }

    pub fn toggle_play(&mut self) {
        self.engine.toggle_play();
    }

    /// Forward the cube's turn-completion callback.
    pub fn on_idle(&mut self) {
        self.engine.on_idle();
    }

    pub fn select_group(&mut self, tab: usize) {
        self.engine.select_group(tab);
    }

    pub fn select(&mut self, position: PlaybackPosition) {
        self.engine.select(position);
    }

    #[inline]
    pub fn engine(&self) -> &PlaybackEngine<C, S> {
        &self.engine
    }

    #[inline]
    pub fn snapshots(&self) -> &SnapshotCache<R::Image> {
        &self.snapshots
    }

    #[inline]
    pub fn cube_mut(&mut self) -> &mut C {
        self.engine.cube_mut()
    }

    #[inline]
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    #[inline]
    pub fn coordinator(&self) -> &TickCoordinator {
        &self.coordinator
    }
}
