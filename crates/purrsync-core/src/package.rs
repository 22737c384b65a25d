//! Package index: package name to the set of files it owns

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use purrsync_fs::NormalizedPath;

use crate::pathset::PathSet;
use crate::producer::{self, ListProducer, PackageProducer};
use crate::{Error, Result};

/// Mapping from package name to [`PathSet`].
///
/// Every entry shares the index root. When a package directory is
/// configured, each entry is backed by the file `<dir>/<name>`, so names
/// such as `category/package` map to nested files.
#[derive(Debug, Default)]
pub struct PackageIndex {
    root: Option<NormalizedPath>,
    dir: Option<NormalizedPath>,
    producer: Option<Arc<dyn PackageProducer>>,
    /// Names in first-seen order
    order: Vec<String>,
    entries: HashMap<String, PathSet>,
}

impl PackageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root shared by every package set.
    pub fn with_root(mut self, root: impl Into<NormalizedPath>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Directory holding one path list file per package.
    pub fn with_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dir = Some(NormalizedPath::new(dir));
        self
    }

    /// Producer listing each package's files.
    pub fn with_producer(mut self, producer: Arc<dyn PackageProducer>) -> Self {
        self.producer = Some(producer);
        self
    }

    pub fn root(&self) -> Option<&NormalizedPath> {
        self.root.as_ref()
    }

    pub fn dir(&self) -> Option<&NormalizedPath> {
        self.dir.as_ref()
    }

    /// Add a package, filling it from the package producer.
    ///
    /// Adding a name that is already indexed returns the existing entry
    /// untouched.
    pub fn add(&mut self, name: &str) -> Result<&PathSet> {
        if !self.entries.contains_key(name) {
            let set = self.build(name)?;
            self.order.push(name.to_string());
            self.entries.insert(name.to_string(), set);
        }
        self.get(name)
    }

    /// Remove a package, returning its set.
    pub fn remove(&mut self, name: &str) -> Result<PathSet> {
        let set = self.entries.remove(name).ok_or_else(|| Error::KeyNotFound {
            name: name.to_string(),
        })?;
        self.order.retain(|n| n != name);
        Ok(set)
    }

    /// Add every name in `names`.
    pub fn populate<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.add(name.as_ref())?;
        }
        Ok(())
    }

    /// Add every package name yielded by `source`.
    ///
    /// Empty names are skipped. Returns the number of names produced.
    pub fn populate_from(&mut self, source: &dyn ListProducer) -> Result<usize> {
        let names: Vec<String> = producer::drain(source)?
            .into_iter()
            .filter(|n| !n.is_empty())
            .collect();
        self.populate(&names)?;
        Ok(names.len())
    }

    /// Add one entry per file under the package directory and load it.
    ///
    /// Hidden files are skipped. Without a package directory this is a
    /// no-op. Returns the number of packages found.
    pub fn discover(&mut self) -> Result<usize> {
        let Some(dir) = self.dir.clone() else {
            return Ok(0);
        };
        if !dir.is_dir() {
            tracing::warn!(dir = %dir, "Package directory does not exist");
            return Ok(0);
        }

        let mut names = Vec::new();
        collect_names(&dir.to_native(), "", &mut names)?;
        names.sort();

        for name in &names {
            self.add(name)?;
            if let Some(set) = self.entries.get_mut(name) {
                set.read()?;
            }
        }
        tracing::debug!(dir = %dir, count = names.len(), "Discovered packages");
        Ok(names.len())
    }

    /// Load every entry from its backing file.
    pub fn read(&mut self) -> Result<()> {
        for name in &self.order {
            if let Some(set) = self.entries.get_mut(name) {
                set.read()?;
            }
        }
        Ok(())
    }

    /// Persist every entry to its backing file.
    pub fn write(&self) -> Result<()> {
        for (_, set) in self.iter() {
            if set.filename().is_some() {
                set.write()?;
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&PathSet> {
        self.entries.get(name).ok_or_else(|| Error::KeyNotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Package names in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(name, set)` pairs in first-seen order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            names: self.order.iter(),
            entries: &self.entries,
        }
    }

    fn build(&self, name: &str) -> Result<PathSet> {
        validate_name(name)?;

        let mut set = PathSet::new();
        if let Some(root) = &self.root {
            set = set.with_root(root.clone());
        }
        if let Some(dir) = &self.dir {
            set = set.with_file(dir.join(name).to_native());
        }
        if let Some(producer) = &self.producer {
            set = set.with_producer(producer.for_package(name));
        }

        let added = set.update_from_producer()?;
        tracing::debug!(package = name, files = added, "Indexed package");
        Ok(set)
    }
}

impl<'a> IntoIterator for &'a PackageIndex {
    type Item = (&'a str, &'a PathSet);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`PackageIndex`] in first-seen order.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    names: std::slice::Iter<'a, String>,
    entries: &'a HashMap<String, PathSet>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a PathSet);

    fn next(&mut self) -> Option<Self::Item> {
        for name in self.names.by_ref() {
            if let Some(set) = self.entries.get(name) {
                return Some((name.as_str(), set));
            }
        }
        None
    }
}

/// Reject names that are empty or would resolve outside the package
/// directory.
fn validate_name(name: &str) -> Result<()> {
    let escapes = name.starts_with('/')
        || name.contains('\\')
        || name.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if escapes {
        return Err(Error::InvalidPackageName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn collect_names(dir: &Path, prefix: &str, names: &mut Vec<String>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') {
            continue;
        }

        let name = if prefix.is_empty() {
            file_name
        } else {
            format!("{}/{}", prefix, file_name)
        };
        let path = entry.path();
        if path.is_dir() {
            collect_names(&path, &name, names)?;
        } else if path.is_file() {
            names.push(name);
        }
    }
    Ok(())
}
