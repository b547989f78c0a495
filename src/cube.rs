//! Interfaces to the host's cube simulation, renderer and rasterizer.
//!
//! None of these are implemented here. The host wires its 3D engine in
//! through these traits.

use crate::notation::TwistAction;
use crate::StripMask;

/// The cube-state simulation.
///
/// Animated turns complete asynchronously; the host must call
/// [`PlaybackEngine::on_idle`](crate::PlaybackEngine::on_idle) once for every
/// animated turn that finishes. Non-animated turns apply immediately and
/// produce no completion callback.
pub trait CubeEngine {
    /// Return to the solved base state and apply `strip`.
    fn reset(&mut self, strip: &StripMask);

    /// Queue one turn.
    fn apply_turn(&mut self, exp: &str, reverse: bool, times: u32, animated: bool);

    /// Complete every queued or in-flight turn instantly.
    fn finish(&mut self) {}

    /// Enable or disable manual turning by the user.
    ///
    /// Called with `false` while auto-play runs.
    fn set_interactive(&mut self, _enabled: bool) {}

    /// Queue `action` as one turn.
    fn apply(&mut self, action: &TwistAction, animated: bool) {
        self.apply_turn(&action.exp, action.reverse, action.times, animated);
    }
}

/// The on-screen renderer.
pub trait Scene {
    /// Whether the scene changed since the last render.
    fn is_dirty(&self) -> bool;

    /// Draw one frame and clear the dirty flag.
    fn render(&mut self);
}

/// Produces a preview image of the cube after applying a notation to the
/// base state described by a strip mask.
pub trait Rasterizer {
    type Image;

    /// Render a preview. `None` means "not available yet"; the request is
    /// retried on a later tick.
    fn snapshot(&mut self, strip: &StripMask, notation: &str) -> Option<Self::Image>;
}
