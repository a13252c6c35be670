//! Region-set cache keyed by image identity.
//!
//! Analysis runs once per decoded image; layout passes then reuse the
//! shared [`PatchRegionSet`].

use std::collections::HashMap;
use std::sync::Arc;

use patchwork_types::bitmap::Bitmap;
use patchwork_types::error::Result;

use crate::analyzer::{analyze, analyze_or_fixed};
use crate::region::PatchRegionSet;

/// Caller-assigned identity of a decoded image (resource id, path hash, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u64);

/// Hit / miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Analyzed region sets keyed by image.
#[derive(Debug, Default)]
pub struct PatchCache {
    entries: HashMap<ImageId, Arc<PatchRegionSet>>,
    stats: CacheStats,
}

impl PatchCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached regions for `id`, analyzing `bitmap` on first use. Images that
    /// fail analysis are cached as fixed blocks.
    pub fn get_or_analyze(&mut self, id: ImageId, bitmap: &dyn Bitmap) -> Arc<PatchRegionSet> {
        if let Some(set) = self.entries.get(&id) {
            self.stats.hits += 1;
            return Arc::clone(set);
        }
        self.stats.misses += 1;
        let set = Arc::new(analyze_or_fixed(bitmap));
        self.entries.insert(id, Arc::clone(&set));
        set
    }

    /// Like [`get_or_analyze`](Self::get_or_analyze) but surfaces format
    /// errors instead of falling back. Failures are not cached.
    pub fn get_or_try_analyze(
        &mut self,
        id: ImageId,
        bitmap: &dyn Bitmap,
    ) -> Result<Arc<PatchRegionSet>> {
        if let Some(set) = self.entries.get(&id) {
            self.stats.hits += 1;
            return Ok(Arc::clone(set));
        }
        self.stats.misses += 1;
        let set = Arc::new(analyze(bitmap)?);
        self.entries.insert(id, Arc::clone(&set));
        Ok(set)
    }

    /// Register externally built regions (e.g. from cap insets).
    pub fn insert(&mut self, id: ImageId, set: PatchRegionSet) -> Arc<PatchRegionSet> {
        let set = Arc::new(set);
        self.entries.insert(id, Arc::clone(&set));
        set
    }

    /// The cached set for `id`, without analyzing.
    pub fn get(&self, id: ImageId) -> Option<Arc<PatchRegionSet>> {
        self.entries.get(&id).cloned()
    }

    /// Drop the entry for an image that was reloaded or released.
    pub fn invalidate(&mut self, id: ImageId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Drop every entry. Stats are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit and miss counters so far.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Axis;
    use crate::test_utils::bordered;
    use patchwork_types::color::Color;
    use patchwork_types::geometry::{Size, Thickness};

    #[test]
    fn second_lookup_hits() {
        let bmp = bordered(6, 6, &[(2, 4)], &[(2, 4)], &[], &[]);
        let mut cache = PatchCache::new();
        let a = cache.get_or_analyze(ImageId(1), &bmp);
        let b = cache.get_or_analyze(ImageId(1), &bmp);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalid_image_cached_as_fixed_block() {
        let mut bmp = bordered(6, 6, &[(2, 4)], &[(2, 4)], &[], &[]);
        bmp.set_pixel(3, 0, Color::rgb(0, 255, 0));
        let mut cache = PatchCache::new();
        let set = cache.get_or_analyze(ImageId(7), &bmp);
        assert_eq!(set.stretch_count(Axis::X), 0);
        assert!(cache.get(ImageId(7)).is_some());
    }

    #[test]
    fn strict_lookup_does_not_cache_failures() {
        let mut bmp = bordered(6, 6, &[(2, 4)], &[(2, 4)], &[], &[]);
        bmp.set_pixel(0, 3, Color::rgb(0, 0, 255));
        let mut cache = PatchCache::new();
        assert!(cache.get_or_try_analyze(ImageId(3), &bmp).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_and_clear() {
        let mut cache = PatchCache::new();
        cache.insert(
            ImageId(1),
            PatchRegionSet::from_cap_insets(Size::new(10, 10), Thickness::uniform(2)),
        );
        cache.insert(ImageId(2), PatchRegionSet::fixed_block(Size::new(4, 4)));
        assert!(cache.invalidate(ImageId(1)));
        assert!(!cache.invalidate(ImageId(1)));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
