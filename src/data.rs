//! Core data structures for algorithm libraries.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::store::{self, PersistenceStore};
use crate::TrainerConfig;

/// Stickers to grey out per face, e.g. `{"U": [0, 1, 2]}`.
///
/// Groups use this to show only the pieces relevant to their algorithms.
/// It is also the base-state key for preview snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StripMask(pub BTreeMap<String, Vec<u32>>);

impl StripMask {
    /// Mask that strips nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Add stripped sticker indices for `face`.
    pub fn with_face(mut self, face: impl Into<String>, stickers: Vec<u32>) -> Self {
        self.0.insert(face.into(), stickers);
        self
    }

    /// Stripped sticker indices for `face`, if any.
    pub fn face(&self, face: &str) -> Option<&[u32]> {
        self.0.get(face).map(|v| v.as_slice())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A named algorithm.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AlgorithmEntry {
    /// Name, unique within its group (e.g. "T-Perm")
    pub name: String,
    /// Author-provided notation
    #[serde(rename = "default")]
    pub default_exp: String,
    /// Current notation, possibly edited by the user
    #[serde(default, skip_serializing)]
    pub exp: String,
}

impl AlgorithmEntry {
    /// Create an entry whose current notation is its default.
    pub fn new(name: impl Into<String>, default_exp: impl Into<String>) -> Self {
        let default_exp = default_exp.into();
        Self {
            name: name.into(),
            exp: default_exp.clone(),
            default_exp,
        }
    }

    /// Whether the current notation differs from the author's.
    #[inline]
    pub fn is_customized(&self) -> bool {
        self.exp != self.default_exp
    }
}

/// An ordered list of algorithms sharing one strip mask.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AlgorithmGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub strip: StripMask,
    pub algs: Vec<AlgorithmEntry>,
}

impl AlgorithmGroup {
    pub fn new(name: impl Into<String>, strip: StripMask, algs: Vec<AlgorithmEntry>) -> Self {
        Self {
            name: name.into(),
            strip,
            algs,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.algs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.algs.is_empty()
    }
}

/// Currently selected entry: group index and entry index within it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PlaybackPosition {
    pub group: usize,
    pub index: usize,
}

impl PlaybackPosition {
    pub fn new(group: usize, index: usize) -> Self {
        Self { group, index }
    }
}

#[cfg(feature = "toml")]
#[derive(serde::Deserialize)]
struct CatalogFile {
    groups: Vec<AlgorithmGroup>,
}

/// The algorithm library: every group, in display order.
///
/// Loaded once at startup. Only the entries' `exp` field changes afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    groups: Vec<AlgorithmGroup>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate names within a group.
    pub fn new(mut groups: Vec<AlgorithmGroup>) -> CatalogResult<Self> {
        for (group_index, group) in groups.iter_mut().enumerate() {
            let mut seen = HashSet::new();
            for entry in &mut group.algs {
                if !seen.insert(entry.name.clone()) {
                    return Err(CatalogError::DuplicateName {
                        group: group_index,
                        name: entry.name.clone(),
                    });
                }
                if entry.exp.is_empty() {
                    entry.exp = entry.default_exp.clone();
                }
            }
        }
        Ok(Self { groups })
    }

    /// Parse a JSON array of groups.
    ///
    /// ```rust
    /// use cube_alg_player::Catalog;
    ///
    /// let catalog = Catalog::from_json_str(r#"[
    ///     {"name": "PLL", "strip": {"D": [0, 1]}, "algs": [
    ///         {"name": "T", "default": "R U R' U' R' F R2 U' R' U' R U R' F'"}
    ///     ]}
    /// ]"#).unwrap();
    /// assert_eq!(catalog.len(), 1);
    /// assert_eq!(catalog.groups()[0].algs[0].exp, catalog.groups()[0].algs[0].default_exp);
    /// ```
    #[tracing::instrument(skip(s), fields(bytes = s.len()))]
    pub fn from_json_str(s: &str) -> CatalogResult<Self> {
        let groups: Vec<AlgorithmGroup> = serde_json::from_str(s)?;
        Self::new(groups)
    }

    /// Parse a TOML document with a `[[groups]]` array.
    #[cfg(feature = "toml")]
    #[tracing::instrument(skip(s), fields(bytes = s.len()))]
    pub fn from_toml_str(s: &str) -> CatalogResult<Self> {
        let file: CatalogFile =
            toml::from_str(s).map_err(|e| CatalogError::Toml(e.to_string()))?;
        Self::new(file.groups)
    }

    /// Replace each entry's `exp` with its stored override, if one exists.
    pub fn apply_overrides<S: PersistenceStore>(&mut self, store: &S, config: &TrainerConfig) {
        for group in &mut self.groups {
            for entry in &mut group.algs {
                if let Some(exp) = store::load_override(store, config, &entry.name) {
                    debug!(name = %entry.name, "applying stored override");
                    entry.exp = exp;
                }
            }
        }
    }

    #[inline]
    pub fn groups(&self) -> &[AlgorithmGroup] {
        &self.groups
    }

    #[inline]
    pub fn group(&self, index: usize) -> Option<&AlgorithmGroup> {
        self.groups.get(index)
    }

    pub fn entry(&self, position: PlaybackPosition) -> Option<&AlgorithmEntry> {
        self.groups.get(position.group)?.algs.get(position.index)
    }

    pub fn entry_mut(&mut self, position: PlaybackPosition) -> Option<&mut AlgorithmEntry> {
        self.groups.get_mut(position.group)?.algs.get_mut(position.index)
    }

    /// Whether `position` names an existing entry.
    #[inline]
    pub fn contains(&self, position: PlaybackPosition) -> bool {
        self.entry(position).is_some()
    }

    /// Number of groups.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of entries across all groups.
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(AlgorithmGroup::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json_str(
            r#"[
                {"name": "OLL", "strip": {"D": [0, 1, 2], "F": [3]}, "algs": [
                    {"name": "Sune", "default": "R U R' U R U2 R'"},
                    {"name": "Anti-Sune", "default": "R U2 R' U' R U' R'"}
                ]},
                {"algs": [{"name": "H", "default": "M2 U M2 U2 M2 U M2"}]}
            ]"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entry_count(), 3);
        let oll = catalog.group(0).unwrap();
        assert_eq!(oll.strip.face("D"), Some(&[0, 1, 2][..]));
        assert_eq!(oll.algs[1].exp, "R U2 R' U' R U' R'");
        assert!(catalog.group(1).unwrap().strip.is_empty());
        assert!(!oll.algs[0].is_customized());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Catalog::from_json_str(
            r#"[{"algs": [{"name": "A", "default": "R"}, {"name": "A", "default": "U"}]}]"#,
        );
        assert!(matches!(
            result,
            Err(CatalogError::DuplicateName { group: 0, .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Catalog::from_json_str("{not json"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_entry_lookup() {
        let catalog = Catalog::new(vec![AlgorithmGroup::new(
            "g",
            StripMask::none(),
            vec![AlgorithmEntry::new("A", "R")],
        )])
        .unwrap();

        assert!(catalog.contains(PlaybackPosition::new(0, 0)));
        assert!(!catalog.contains(PlaybackPosition::new(0, 1)));
        assert!(!catalog.contains(PlaybackPosition::new(1, 0)));
        assert_eq!(catalog.entry(PlaybackPosition::default()).unwrap().name, "A");
    }

    #[test]
    fn test_apply_overrides() {
        let mut catalog = Catalog::new(vec![AlgorithmGroup::new(
            "g",
            StripMask::none(),
            vec![AlgorithmEntry::new("A", "R U"), AlgorithmEntry::new("B", "F")],
        )])
        .unwrap();
        let mut store = MemoryStore::new();
        store.insert("algs.exp.B", "F2");

        catalog.apply_overrides(&store, &TrainerConfig::default());

        let group = catalog.group(0).unwrap();
        assert_eq!(group.algs[0].exp, "R U");
        assert_eq!(group.algs[1].exp, "F2");
        assert!(group.algs[1].is_customized());
        assert_eq!(group.algs[1].default_exp, "F");
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_toml() {
        let catalog = Catalog::from_toml_str(
            r#"
            [[groups]]
            name = "F2L"
            strip = { U = [0, 1] }

            [[groups.algs]]
            name = "1"
            default = "U R U' R'"
            "#,
        )
        .unwrap();
        assert_eq!(catalog.group(0).unwrap().algs[0].exp, "U R U' R'");
    }
}
