//! Recording fakes shared by the unit tests.

use crate::cube::{CubeEngine, Rasterizer, Scene};
use crate::store::{MemoryStore, PersistenceStore};
use crate::{AlgorithmEntry, AlgorithmGroup, Catalog, StoreError, StripMask};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CubeCall {
    Finish,
    Reset(StripMask),
    Turn {
        exp: String,
        reverse: bool,
        times: u32,
        animated: bool,
    },
}

impl CubeCall {
    pub(crate) fn turn(exp: &str, reverse: bool, times: u32, animated: bool) -> Self {
        CubeCall::Turn {
            exp: exp.to_string(),
            reverse,
            times,
            animated,
        }
    }
}

#[derive(Debug)]
pub(crate) struct RecordingCube {
    pub(crate) calls: Vec<CubeCall>,
    pub(crate) interactive: bool,
}

impl Default for RecordingCube {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            interactive: true,
        }
    }
}

impl RecordingCube {
    /// Animated turns recorded so far.
    pub(crate) fn animated(&self) -> Vec<CubeCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, CubeCall::Turn { animated: true, .. }))
            .cloned()
            .collect()
    }
}

impl CubeEngine for RecordingCube {
    fn reset(&mut self, strip: &StripMask) {
        self.calls.push(CubeCall::Reset(strip.clone()));
    }

    fn apply_turn(&mut self, exp: &str, reverse: bool, times: u32, animated: bool) {
        self.calls.push(CubeCall::turn(exp, reverse, times, animated));
    }

    fn finish(&mut self) {
        self.calls.push(CubeCall::Finish);
    }

    fn set_interactive(&mut self, enabled: bool) {
        self.interactive = enabled;
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeScene {
    pub(crate) dirty: bool,
    pub(crate) renders: usize,
}

impl Scene for FakeScene {
    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn render(&mut self) {
        self.renders += 1;
        self.dirty = false;
    }
}

/// Images are `"<stripped faces>|<notation>"` strings.
#[derive(Debug, Default)]
pub(crate) struct FakeRasterizer {
    pub(crate) calls: usize,
    /// Number of upcoming calls that report "not ready"
    pub(crate) unavailable: usize,
}

impl Rasterizer for FakeRasterizer {
    type Image = String;

    fn snapshot(&mut self, strip: &StripMask, notation: &str) -> Option<String> {
        self.calls += 1;
        if self.unavailable > 0 {
            self.unavailable -= 1;
            return None;
        }
        Some(format!("{}|{}", strip.0.len(), notation))
    }
}

/// Store whose writes always fail; reads come from the seeded values.
#[derive(Debug, Default)]
pub(crate) struct ReadOnlyStore {
    pub(crate) seeded: MemoryStore,
}

impl PersistenceStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Option<String> {
        self.seeded.get(key)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}

/// Two groups: "PLL" with entries A and B, "OLL" with entry C.
pub(crate) fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        AlgorithmGroup::new(
            "PLL",
            StripMask::none(),
            vec![
                AlgorithmEntry::new("A", "R U R' U'"),
                AlgorithmEntry::new("B", "F2"),
            ],
        ),
        AlgorithmGroup::new(
            "OLL",
            StripMask::none().with_face("D", vec![0, 1, 2]),
            vec![AlgorithmEntry::new("C", "(R U)2")],
        ),
    ])
    .expect("sample catalog has unique names")
}
