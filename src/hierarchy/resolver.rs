use crate::domain::{Loop, LoopKey, Profile};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Which side of a profile a colliding loop key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopRole {
    Outer,
    Inner,
}

impl fmt::Display for LoopRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopRole::Outer => f.write_str("outer"),
            LoopRole::Inner => f.write_str("inner"),
        }
    }
}

/// Failures while recovering the nesting of one layer's profiles
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HierarchyError {
    #[error("profile #{profile} has {outer_loops} outer loops, expected exactly one")]
    MalformedProfile { profile: usize, outer_loops: usize },

    #[error("{role} loop key {key} of profile #{profile} is already registered")]
    DuplicateLoopKey {
        profile: usize,
        key: LoopKey,
        role: LoopRole,
    },

    #[error("profile #{profile} has a loop without any curve")]
    DegenerateLoop { profile: usize },

    #[error("nesting walk from loop key {key} does not reach a root")]
    CyclicNesting { key: LoopKey },
}

/// Lexicographically smallest `(x, y)` endpoint over every curve of `l`
///
/// Returns `None` for a loop without curves.
pub fn extreme_point(l: &Loop) -> Option<LoopKey> {
    l.endpoints().map(LoopKey::from).min()
}

/// Parent relation between loop keys: inner-loop key -> enclosing outer-loop key
#[derive(Debug, Default, Clone)]
pub struct NestingForest {
    parents: BTreeMap<LoopKey, LoopKey>,
}

impl NestingForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `child` is an inner loop of the profile whose outer key is `parent`.
    ///
    /// Returns `false` without modifying the forest if `child` already has a parent.
    pub fn insert(&mut self, child: LoopKey, parent: LoopKey) -> bool {
        if self.parents.contains_key(&child) {
            return false;
        }
        self.parents.insert(child, parent);
        true
    }

    pub fn parent_of(&self, key: &LoopKey) -> Option<&LoopKey> {
        self.parents.get(key)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Number of hops from `key` to a key that has no parent
    ///
    /// A well-formed forest reaches a root in at most `len()` hops; anything
    /// longer means two keys collided into a cycle.
    pub fn depth_of(&self, key: LoopKey) -> Result<usize, HierarchyError> {
        let mut depth = 0;
        let mut current = key;
        while let Some(&parent) = self.parent_of(&current) {
            depth += 1;
            if depth > self.parents.len() {
                return Err(HierarchyError::CyclicNesting { key });
            }
            current = parent;
        }
        Ok(depth)
    }
}

/// A profile together with its identity key and nesting depth
#[derive(Debug, Clone, Copy)]
pub struct ResolvedProfile<'a> {
    pub profile: &'a Profile,
    pub key: LoopKey,
    pub depth: usize,
}

impl ResolvedProfile<'_> {
    pub fn is_solid(&self) -> bool {
        super::selector::is_solid(self.depth)
    }
}

/// Nesting of all profiles of one layer, ordered by outer-loop key
#[derive(Debug, Clone)]
pub struct LayerHierarchy<'a> {
    profiles: Vec<ResolvedProfile<'a>>,
    forest: NestingForest,
}

impl<'a> LayerHierarchy<'a> {
    pub fn profiles(&self) -> &[ResolvedProfile<'a>] {
        &self.profiles
    }

    pub fn forest(&self) -> &NestingForest {
        &self.forest
    }

    pub fn depth_of(&self, key: &LoopKey) -> Option<usize> {
        self.profiles
            .binary_search_by(|p| p.key.cmp(key))
            .ok()
            .map(|i| self.profiles[i].depth)
    }

    pub fn max_depth(&self) -> usize {
        self.profiles.iter().map(|p| p.depth).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Resolve the nesting depth of every profile of one layer
///
/// # Algorithm
/// 1. Split each profile into its single outer loop and its inner loops
/// 2. Key the profile by the extreme point of its outer loop
/// 3. Map every inner-loop key to the owning profile's outer key
/// 4. Walk the map from each profile key to a root, counting hops
///
/// Any inconsistency aborts the whole layer.
pub fn resolve(profiles: &[Profile]) -> Result<LayerHierarchy<'_>, HierarchyError> {
    let mut by_key: BTreeMap<LoopKey, &Profile> = BTreeMap::new();
    let mut forest = NestingForest::new();

    for (index, profile) in profiles.iter().enumerate() {
        let mut outers = profile.outer_loops();
        let outer = match (outers.next(), outers.next()) {
            (Some(outer), None) => outer,
            _ => {
                return Err(HierarchyError::MalformedProfile {
                    profile: index,
                    outer_loops: profile.outer_loops().count(),
                });
            }
        };

        let outer_key =
            extreme_point(outer).ok_or(HierarchyError::DegenerateLoop { profile: index })?;
        if by_key.insert(outer_key, profile).is_some() {
            return Err(HierarchyError::DuplicateLoopKey {
                profile: index,
                key: outer_key,
                role: LoopRole::Outer,
            });
        }

        for inner in profile.inner_loops() {
            let key =
                extreme_point(inner).ok_or(HierarchyError::DegenerateLoop { profile: index })?;
            if !forest.insert(key, outer_key) {
                return Err(HierarchyError::DuplicateLoopKey {
                    profile: index,
                    key,
                    role: LoopRole::Inner,
                });
            }
        }
    }

    let mut resolved = Vec::with_capacity(by_key.len());
    for (key, profile) in by_key {
        let depth = forest.depth_of(key)?;
        resolved.push(ResolvedProfile {
            profile,
            key,
            depth,
        });
    }

    debug!(
        profiles = resolved.len(),
        holes = forest.len(),
        "resolved loop hierarchy"
    );

    Ok(LayerHierarchy {
        profiles: resolved,
        forest,
    })
}
