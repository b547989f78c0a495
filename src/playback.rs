//! Playback engine for algorithm sequences.

use tracing::{debug, warn};

use crate::cube::CubeEngine;
use crate::notation::{self, TwistAction};
use crate::store::{self, PersistenceStore};
use crate::{AlgorithmEntry, Catalog, PlaybackPosition, TrainerConfig};

/// Steps a cube through the selected algorithm.
///
/// The engine owns the catalog, the selected position, the parsed actions of
/// the selected entry and a progress pointer. It never animates anything
/// itself: turns are handed to the [`CubeEngine`], and auto-play advances only
/// when the host reports a finished turn through [`on_idle`](Self::on_idle).
///
/// ## Example
///
/// ```rust
/// use cube_alg_player::{
///     AlgorithmEntry, AlgorithmGroup, Catalog, CubeEngine, MemoryStore, PlaybackEngine,
///     StripMask,
/// };
///
/// #[derive(Default)]
/// struct Cube {
///     turns: usize,
/// }
///
/// impl CubeEngine for Cube {
///     fn reset(&mut self, _strip: &StripMask) {}
///     fn apply_turn(&mut self, _exp: &str, _reverse: bool, _times: u32, animated: bool) {
///         if animated {
///             self.turns += 1;
///         }
///     }
/// }
///
/// let catalog = Catalog::new(vec![AlgorithmGroup::new(
///     "PLL",
///     StripMask::none(),
///     vec![AlgorithmEntry::new("A", "R U R' U'")],
/// )])
/// .unwrap();
///
/// let mut engine = PlaybackEngine::new(Cube::default(), MemoryStore::new(), catalog);
/// assert_eq!(engine.actions().len(), 4);
///
/// engine.toggle_play();
/// while engine.is_playing() {
///     // The host calls this whenever an animated turn completes
///     engine.on_idle();
/// }
/// assert_eq!(engine.progress(), 4);
/// assert_eq!(engine.cube().turns, 4);
/// ```
#[derive(Debug)]
pub struct PlaybackEngine<C, S> {
    cube: C,
    store: S,
    config: TrainerConfig,
    catalog: Catalog,
    /// Selected entry
    position: PlaybackPosition,
    /// Parsed notation of the selected entry
    actions: Vec<TwistAction>,
    /// Index of the next action to apply going forward
    progress: usize,
    playing: bool,
}

impl<C: CubeEngine, S: PersistenceStore> PlaybackEngine<C, S> {
    /// Create an engine with the default storage keys.
    pub fn new(cube: C, store: S, catalog: Catalog) -> Self {
        Self::with_config(cube, store, catalog, TrainerConfig::default())
    }

    /// Create an engine, apply stored overrides to the catalog, restore the
    /// last-viewed position and load it.
    pub fn with_config(cube: C, store: S, mut catalog: Catalog, config: TrainerConfig) -> Self {
        catalog.apply_overrides(&store, &config);

        let mut position = store::load_position(&store, &config);
        if !catalog.contains(position) {
            if position != PlaybackPosition::default() {
                warn!(?position, "stored position is out of range, starting at the first entry");
            }
            position = PlaybackPosition::default();
        }

        let mut engine = Self {
            cube,
            store,
            config,
            catalog,
            position,
            actions: Vec::new(),
            progress: 0,
            playing: false,
        };
        engine.load();
        engine
    }

    /// Reload the selected entry and position the cube at its start state.
    ///
    /// The entry's current notation is used: the stored override applied at
    /// startup, or the latest [`edit`](Self::edit) even if persisting it
    /// failed. Progress returns to 0 and auto-play stops.
    pub fn load(&mut self) {
        let position = self.position;
        let exp = self
            .catalog
            .entry(position)
            .map(|entry| entry.exp.clone())
            .unwrap_or_default();
        debug!(?position, %exp, "loading algorithm");
        self.actions = notation::parse(&exp);
        self.reposition();
    }

    /// Replace the selected entry's notation and persist it.
    ///
    /// Returns the position of the edited entry so the caller can invalidate
    /// its preview, or `None` when nothing is selected.
    pub fn edit(&mut self, exp: &str) -> Option<PlaybackPosition> {
        let position = self.position;
        let entry = self.catalog.entry_mut(position)?;
        entry.exp = exp.to_string();
        if let Err(err) = store::save_override(&mut self.store, &self.config, &entry.name, exp) {
            warn!(name = %entry.name, error = %err, "failed to persist notation override");
        }
        debug!(?position, %exp, "notation edited");

        self.actions = notation::parse(exp);
        self.reposition();
        Some(position)
    }

    /// Edit the selected entry back to the author's notation.
    pub fn restore_default(&mut self) -> Option<PlaybackPosition> {
        let default_exp = self.entry()?.default_exp.clone();
        self.edit(&default_exp)
    }

    /// Apply the next action as an animated turn.
    ///
    /// Cancels auto-play. Does nothing when the sequence is fully played.
    pub fn step_forward(&mut self) {
        if self.is_finished() {
            return;
        }
        self.set_playing(false);
        self.advance();
    }

    /// Undo the last applied action as an animated turn.
    ///
    /// Cancels auto-play. Does nothing at the start of the sequence.
    pub fn step_backward(&mut self) {
        if self.progress == 0 {
            return;
        }
        self.set_playing(false);
        self.progress -= 1;
        let undo = self.actions[self.progress].inverse();
        self.cube.apply(&undo, true);
    }

    /// Start or stop auto-play. Starting applies the next turn immediately.
    pub fn toggle_play(&mut self) {
        if self.playing {
            self.set_playing(false);
        } else {
            self.set_playing(true);
            self.on_idle();
        }
    }

    /// Handle completion of an animated turn.
    ///
    /// This is the only thing that drives auto-play: while playing, each
    /// call applies the next action. Reaching the end stops playback.
    pub fn on_idle(&mut self) {
        if self.is_finished() {
            self.set_playing(false);
        }
        if self.playing {
            self.advance();
        }
    }

    /// Switch to the first entry of group `tab`.
    ///
    /// Selecting the current group restarts the current entry instead.
    /// Unknown groups are ignored.
    pub fn select_group(&mut self, tab: usize) {
        if tab == self.position.group {
            self.load();
        } else {
            self.select(PlaybackPosition::new(tab, 0));
        }
    }

    /// Switch to `position`, load it and persist the selection.
    ///
    /// Positions outside the catalog are ignored.
    pub fn select(&mut self, position: PlaybackPosition) {
        if !self.catalog.contains(position) {
            debug!(?position, "ignoring selection outside the catalog");
            return;
        }
        self.position = position;
        self.load();
        if let Err(err) = store::save_position(&mut self.store, &self.config, position) {
            warn!(?position, error = %err, "failed to persist position");
        }
    }

    fn advance(&mut self) {
        let action = &self.actions[self.progress];
        self.cube.apply(action, true);
        self.progress += 1;
    }

    /// Reset the cube and replay the inverse sequence instantly, leaving it
    /// in the state the algorithm starts from.
    fn reposition(&mut self) {
        self.set_playing(false);
        self.progress = 0;
        self.cube.finish();
        match self.catalog.group(self.position.group) {
            Some(group) => self.cube.reset(&group.strip),
            None => self.cube.reset(&Default::default()),
        }
        for action in notation::invert(&self.actions) {
            self.cube.apply(&action, false);
        }
    }

    fn set_playing(&mut self, playing: bool) {
        if self.playing != playing {
            debug!(playing, progress = self.progress, "playback state changed");
            self.playing = playing;
            self.cube.set_interactive(!playing);
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether every action has been applied.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.progress == self.actions.len()
    }

    /// Index of the next action to apply, in `0..=actions().len()`.
    #[inline]
    pub fn progress(&self) -> usize {
        self.progress
    }

    #[inline]
    pub fn actions(&self) -> &[TwistAction] {
        &self.actions
    }

    #[inline]
    pub fn position(&self) -> PlaybackPosition {
        self.position
    }

    /// The selected entry, if the catalog has one at the current position.
    pub fn entry(&self) -> Option<&AlgorithmEntry> {
        self.catalog.entry(self.position)
    }

    pub fn name(&self) -> Option<&str> {
        self.entry().map(|e| e.name.as_str())
    }

    /// The author's notation for the selected entry.
    pub fn default_notation(&self) -> Option<&str> {
        self.entry().map(|e| e.default_exp.as_str())
    }

    /// The notation currently being played.
    pub fn exp(&self) -> Option<&str> {
        self.entry().map(|e| e.exp.as_str())
    }

    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[inline]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    #[inline]
    pub fn cube(&self) -> &C {
        &self.cube
    }

    #[inline]
    pub fn cube_mut(&mut self) -> &mut C {
        &mut self.cube
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }
}
