//! Root-aware sets of file paths
//!
//! A [`PathSet`] holds path strings that are either absolute (no root) or
//! relative to an absolute `root`. Set algebra across instances is done
//! in absolute space: every operand is normalized against its own root,
//! then re-expressed relative to the left operand's root before the plain
//! set operation is applied. A path that cannot be expressed under the
//! left operand's root fails with [`Error::PrefixMismatch`].

use std::collections::HashSet;
use std::ops::{BitAnd, BitOr, Sub};
use std::path::Path;
use std::sync::Arc;

use purrsync_fs::{NormalizedPath, RobustnessConfig, io};

use crate::producer::{self, ListProducer};
use crate::{Error, Result};

/// An unordered collection of path strings with root-aware set algebra.
#[derive(Debug, Clone, Default)]
pub struct PathSet {
    members: HashSet<String>,
    /// Absolute prefix members are relative to; `None` means members are
    /// taken as-is
    root: Option<NormalizedPath>,
    producer: Option<Arc<dyn ListProducer>>,
    /// Backing file for `read` / `write`
    filename: Option<NormalizedPath>,
}

impl PathSet {
    /// An empty set with no root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from an initial list of members.
    pub fn from_members<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Interpret members relative to `root`.
    pub fn with_root(mut self, root: impl Into<NormalizedPath>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Use `filename` as the backing file for [`read`](Self::read) and
    /// [`write`](Self::write).
    pub fn with_file(mut self, filename: impl AsRef<Path>) -> Self {
        self.filename = Some(NormalizedPath::new(filename));
        self
    }

    /// Attach a list producer drained by
    /// [`update_from_producer`](Self::update_from_producer).
    pub fn with_producer(mut self, producer: Arc<dyn ListProducer>) -> Self {
        self.producer = Some(producer);
        self
    }

    pub fn root(&self) -> Option<&NormalizedPath> {
        self.root.as_ref()
    }

    pub fn filename(&self) -> Option<&NormalizedPath> {
        self.filename.as_ref()
    }

    pub fn producer(&self) -> Option<&Arc<dyn ListProducer>> {
        self.producer.as_ref()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the raw member string is present.
    pub fn contains(&self, path: &str) -> bool {
        self.members.contains(path)
    }

    /// Raw members in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    /// Raw members sorted lexicographically, the order used by `write`.
    pub fn sorted(&self) -> Vec<&str> {
        let mut members: Vec<&str> = self.iter().collect();
        members.sort_unstable();
        members
    }

    /// Insert a path. No normalization happens at insertion time.
    ///
    /// Returns `false` if the exact string was already present.
    pub fn add(&mut self, path: impl Into<String>) -> bool {
        self.members.insert(path.into())
    }

    /// Merge the lines of the backing file into the set.
    ///
    /// Existing members are kept. Empty lines are not valid members and
    /// are skipped. Without a configured backing file this is a no-op.
    /// Returns the normalized view of the set after loading.
    pub fn read(&mut self) -> Result<HashSet<String>> {
        let Some(filename) = &self.filename else {
            return Ok(self.normalized());
        };

        let content = io::read_text(filename)?;
        let before = self.members.len();
        let mut skipped = 0usize;
        for line in content.lines() {
            if line.is_empty() {
                skipped += 1;
                continue;
            }
            self.members.insert(line.to_string());
        }
        if skipped > 0 {
            tracing::warn!(path = %filename, skipped, "Skipped empty lines in path list");
        }
        tracing::debug!(
            path = %filename,
            added = self.members.len() - before,
            total = self.members.len(),
            "Loaded path list"
        );

        Ok(self.normalized())
    }

    /// Overwrite the backing file with the sorted members, one per line.
    pub fn write(&self) -> Result<()> {
        let filename = self.filename.as_ref().ok_or(Error::NoBackingFile)?;
        self.write_to(filename.to_native())
    }

    /// Write the sorted members, one per line, to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let target = NormalizedPath::new(path);
        let content = self.sorted().join("\n");
        io::write_text(&target, &content, RobustnessConfig::default())?;
        tracing::debug!(path = %target, count = self.members.len(), "Wrote path list");
        Ok(())
    }

    /// Drain the attached producer and add every element.
    ///
    /// The production run is validated as a whole first: if any element is
    /// not a string, [`Error::TypeCheck`] is returned and no member from
    /// that run is added. Without a producer this is a no-op. Returns the
    /// number of new members.
    pub fn update_from_producer(&mut self) -> Result<usize> {
        let Some(producer) = &self.producer else {
            return Ok(0);
        };
        let items = producer::drain(producer.as_ref())?;
        let before = self.members.len();
        self.members.extend(items);
        Ok(self.members.len() - before)
    }

    /// Members as canonical absolute paths.
    ///
    /// Each member is joined onto the root and canonicalized. Without a
    /// root the members are returned unchanged.
    pub fn normalized(&self) -> HashSet<String> {
        match &self.root {
            Some(root) => self
                .members
                .iter()
                .map(|m| root.join(m).into_string())
                .collect(),
            None => self.members.clone(),
        }
    }

    /// Express an absolute path relative to this set's root.
    ///
    /// Both sides are canonicalized and compared per segment. Without a
    /// root the path is returned unchanged; a root of `/` accepts every
    /// path.
    pub fn relative_to_self_root(&self, absolute_path: &str) -> Result<String> {
        let Some(root) = &self.root else {
            return Ok(absolute_path.to_string());
        };
        NormalizedPath::new(absolute_path)
            .strip_root(root)
            .map(NormalizedPath::into_string)
            .ok_or_else(|| Error::PrefixMismatch {
                path: absolute_path.to_string(),
                root: root.to_string(),
            })
    }

    /// Members of `self` or `other`.
    ///
    /// Both operands, `self` included, are rebased into this set's root
    /// first. A member of either that resolves outside the root, such as
    /// `../x` or an absolute `/x` under root `/r`, fails with
    /// [`Error::PrefixMismatch`]; the same holds for
    /// [`intersection`](Self::intersection) and
    /// [`difference`](Self::difference).
    pub fn union(&self, other: &PathSet) -> Result<PathSet> {
        self.combine(other, |a, b| a.union(b).cloned().collect())
    }

    /// Members of both `self` and `other`.
    pub fn intersection(&self, other: &PathSet) -> Result<PathSet> {
        self.combine(other, |a, b| a.intersection(b).cloned().collect())
    }

    /// Members of `self` not in `other`.
    ///
    /// Fails like [`union`](Self::union) when a member of `self` lies
    /// outside the root, even if `other` is empty.
    pub fn difference(&self, other: &PathSet) -> Result<PathSet> {
        self.combine(other, |a, b| a.difference(b).cloned().collect())
    }

    /// Duplicate keeping root and producer but not the backing file.
    pub fn copy(&self) -> PathSet {
        Self {
            members: self.members.clone(),
            root: self.root.clone(),
            producer: self.producer.clone(),
            filename: None,
        }
    }

    /// `set`'s members in this set's root space.
    fn rebase(&self, set: &PathSet) -> Result<HashSet<String>> {
        set.normalized()
            .iter()
            .map(|path| self.relative_to_self_root(path))
            .collect()
    }

    fn combine<F>(&self, other: &PathSet, op: F) -> Result<PathSet>
    where
        F: FnOnce(&HashSet<String>, &HashSet<String>) -> HashSet<String>,
    {
        let left = self.rebase(self)?;
        let right = self.rebase(other)?;
        Ok(Self {
            members: op(&left, &right),
            root: self.root.clone(),
            producer: self.producer.clone(),
            filename: None,
        })
    }
}

impl PartialEq for PathSet {
    fn eq(&self, other: &Self) -> bool {
        let same_producer = match (&self.producer, &other.producer) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.root == other.root && same_producer && self.normalized() == other.normalized()
    }
}

impl Eq for PathSet {}

impl BitOr<&PathSet> for &PathSet {
    type Output = Result<PathSet>;

    fn bitor(self, rhs: &PathSet) -> Self::Output {
        self.union(rhs)
    }
}

impl BitAnd<&PathSet> for &PathSet {
    type Output = Result<PathSet>;

    fn bitand(self, rhs: &PathSet) -> Self::Output {
        self.intersection(rhs)
    }
}

impl Sub<&PathSet> for &PathSet {
    type Output = Result<PathSet>;

    fn sub(self, rhs: &PathSet) -> Self::Output {
        self.difference(rhs)
    }
}

impl<S: Into<String>> Extend<S> for PathSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.members.extend(iter.into_iter().map(Into::into));
    }
}
