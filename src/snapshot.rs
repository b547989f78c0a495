//! Lazily filled preview images, one slot per catalog entry.
//!
//! Slots are filled one at a time in a fixed order: groups by index, entries
//! by index within a group. A group is only visited once every earlier group
//! is complete, so the fill order is reproducible for a given catalog.

use tracing::{debug, trace};

use crate::cube::Rasterizer;
use crate::{Catalog, PlaybackPosition};

/// Preview cache for a [`Catalog`].
#[derive(Clone, Debug)]
pub struct SnapshotCache<I> {
    slots: Vec<Vec<Option<I>>>,
}

impl<I> Default for SnapshotCache<I> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<I> SnapshotCache<I> {
    /// Create an empty cache with one slot per entry of `catalog`.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let slots = catalog
            .groups()
            .iter()
            .map(|group| {
                let mut slots = Vec::new();
                slots.resize_with(group.len(), || None);
                slots
            })
            .collect();
        Self { slots }
    }

    /// First slot still waiting for an image.
    pub fn next_pending_slot(&self) -> Option<PlaybackPosition> {
        self.slots.iter().enumerate().find_map(|(group, slots)| {
            slots
                .iter()
                .position(Option::is_none)
                .map(|index| PlaybackPosition::new(group, index))
        })
    }

    /// Render the preview for `position` and store it.
    ///
    /// Returns `false` when the rasterizer had nothing yet or the position is
    /// not part of the catalog; the slot stays pending either way.
    pub fn fill<R>(
        &mut self,
        catalog: &Catalog,
        rasterizer: &mut R,
        position: PlaybackPosition,
    ) -> bool
    where
        R: Rasterizer<Image = I>,
    {
        let group = catalog.group(position.group);
        let (Some(group), Some(entry)) = (group, catalog.entry(position)) else {
            return false;
        };
        let Some(slot) = self.slot_mut(position) else {
            return false;
        };

        match rasterizer.snapshot(&group.strip, &entry.exp) {
            Some(image) => {
                debug!(?position, name = %entry.name, "snapshot filled");
                *slot = Some(image);
                true
            }
            None => {
                trace!(?position, "snapshot not ready, will retry");
                false
            }
        }
    }

    /// Clear one slot so it is regenerated. Other slots are untouched.
    pub fn invalidate(&mut self, position: PlaybackPosition) {
        if let Some(slot) = self.slot_mut(position) {
            *slot = None;
        }
    }

    /// Remove every cached image.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            *slot = None;
        }
    }

    /// Get the image for `position`, if it has been rendered.
    pub fn get(&self, position: PlaybackPosition) -> Option<&I> {
        self.slots.get(position.group)?.get(position.index)?.as_ref()
    }

    /// Returns `true` when `position` has an image.
    pub fn has(&self, position: PlaybackPosition) -> bool {
        self.get(position).is_some()
    }

    /// Images of one group in entry order; `None` for pending slots.
    pub fn group(&self, group: usize) -> &[Option<I>] {
        self.slots.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(filled, total)` slot counts.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.slots.iter().map(Vec::len).sum();
        let filled = self.slots.iter().flatten().filter(|s| s.is_some()).count();
        (filled, total)
    }

    /// Get fill percentage (0-100)
    pub fn percent(&self) -> u8 {
        let (filled, total) = self.progress();
        if total == 0 {
            100
        } else {
            ((filled as f32 / total as f32) * 100.0) as u8
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.next_pending_slot().is_none()
    }

    fn slot_mut(&mut self, position: PlaybackPosition) -> Option<&mut Option<I>> {
        self.slots.get_mut(position.group)?.get_mut(position.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_catalog, FakeRasterizer};

    fn pos(group: usize, index: usize) -> PlaybackPosition {
        PlaybackPosition::new(group, index)
    }

    #[test]
    fn test_fill_order_is_sequential() {
        let catalog = sample_catalog();
        let mut cache = SnapshotCache::for_catalog(&catalog);
        let mut rasterizer = FakeRasterizer::default();

        let mut order = Vec::new();
        while let Some(next) = cache.next_pending_slot() {
            assert!(cache.fill(&catalog, &mut rasterizer, next));
            order.push(next);
        }

        assert_eq!(order, vec![pos(0, 0), pos(0, 1), pos(1, 0)]);
        assert!(cache.is_complete());
        assert_eq!(rasterizer.calls, 3);
        assert_eq!(cache.progress(), (3, 3));
    }

    #[test]
    fn test_fill_uses_strip_and_exp() {
        let catalog = sample_catalog();
        let mut cache = SnapshotCache::for_catalog(&catalog);
        let mut rasterizer = FakeRasterizer::default();

        cache.fill(&catalog, &mut rasterizer, pos(1, 0));
        assert_eq!(cache.get(pos(1, 0)).map(String::as_str), Some("1|(R U)2"));
        assert!(!cache.has(pos(0, 0)));
        assert_eq!(cache.group(1).len(), 1);
        assert!(cache.group(9).is_empty());
    }

    #[test]
    fn test_unavailable_image_stays_pending() {
        let catalog = sample_catalog();
        let mut cache = SnapshotCache::for_catalog(&catalog);
        let mut rasterizer = FakeRasterizer {
            unavailable: 1,
            ..Default::default()
        };

        assert!(!cache.fill(&catalog, &mut rasterizer, pos(0, 0)));
        assert_eq!(cache.next_pending_slot(), Some(pos(0, 0)));
        assert!(cache.fill(&catalog, &mut rasterizer, pos(0, 0)));
        assert_eq!(cache.next_pending_slot(), Some(pos(0, 1)));
    }

    #[test]
    fn test_invalidate_single_slot() {
        let catalog = sample_catalog();
        let mut cache = SnapshotCache::for_catalog(&catalog);
        let mut rasterizer = FakeRasterizer::default();
        while let Some(next) = cache.next_pending_slot() {
            cache.fill(&catalog, &mut rasterizer, next);
        }

        cache.invalidate(pos(0, 1));
        assert!(cache.has(pos(0, 0)));
        assert!(!cache.has(pos(0, 1)));
        assert!(cache.has(pos(1, 0)));
        assert_eq!(cache.next_pending_slot(), Some(pos(0, 1)));
        assert_eq!(cache.progress(), (2, 3));

        // Out-of-range positions are ignored
        cache.invalidate(pos(4, 4));
        assert!(!cache.fill(&catalog, &mut rasterizer, pos(4, 4)));
    }

    #[test]
    fn test_clear_and_percent() {
        let catalog = sample_catalog();
        let mut cache = SnapshotCache::for_catalog(&catalog);
        let mut rasterizer = FakeRasterizer::default();
        assert_eq!(cache.percent(), 0);

        cache.fill(&catalog, &mut rasterizer, pos(0, 0));
        assert_eq!(cache.percent(), 33);

        cache.clear();
        assert_eq!(cache.progress(), (0, 3));
        assert_eq!(SnapshotCache::<String>::default().percent(), 100);
    }
}
