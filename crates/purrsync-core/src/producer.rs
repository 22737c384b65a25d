//! List producer contracts
//!
//! A list producer is an external capability that yields a finite, lazy
//! sequence of path (or package name) strings. Every call to
//! [`ListProducer::produce`] starts one production run which is drained
//! exactly once; producers backed by a one-shot source such as standard
//! input yield nothing on later runs.
//!
//! Elements are raw bytes. An element that is not valid UTF-8 violates
//! the contract and is reported as [`Error::TypeCheck`].

use std::fmt;
use std::sync::Arc;

use crate::{Error, Result};

/// One production run: raw elements, or the error that ended the run.
pub type Production<'a> = Box<dyn Iterator<Item = Result<Vec<u8>>> + 'a>;

/// A capability producing a finite sequence of path strings.
pub trait ListProducer: fmt::Debug {
    /// Human-readable label used in logs and errors.
    fn describe(&self) -> String;

    /// Start a production run.
    fn produce(&self) -> Result<Production<'_>>;
}

/// A list producer parameterized by package name.
pub trait PackageProducer: fmt::Debug {
    /// The producer listing the files owned by `name`.
    fn for_package(&self, name: &str) -> Arc<dyn ListProducer>;
}

/// Drain one production run into strings.
///
/// The whole run is validated before anything is returned, so a caller
/// committing the result never sees a partial run.
pub fn drain(producer: &dyn ListProducer) -> Result<Vec<String>> {
    let mut items = Vec::new();
    for (index, element) in producer.produce()?.enumerate() {
        let bytes = element?;
        let item = String::from_utf8(bytes).map_err(|_| Error::TypeCheck {
            producer: producer.describe(),
            index,
        })?;
        items.push(item);
    }
    tracing::debug!(producer = %producer.describe(), count = items.len(), "Drained producer");
    Ok(items)
}

/// A producer over an in-memory list.
#[derive(Debug, Clone, Default)]
pub struct StaticProducer {
    items: Vec<Vec<u8>>,
}

impl StaticProducer {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(|s| s.into().into_bytes()).collect(),
        }
    }

    /// Build from raw elements, which need not be valid UTF-8.
    pub fn from_bytes(items: Vec<Vec<u8>>) -> Self {
        Self { items }
    }
}

impl ListProducer for StaticProducer {
    fn describe(&self) -> String {
        format!("static list ({} items)", self.items.len())
    }

    fn produce(&self) -> Result<Production<'_>> {
        Ok(Box::new(self.items.iter().cloned().map(Ok)))
    }
}

/// A [`PackageProducer`] backed by a closure.
pub struct PackageFn<F> {
    label: String,
    f: F,
}

impl<F> PackageFn<F>
where
    F: Fn(&str) -> Arc<dyn ListProducer>,
{
    pub fn new(label: impl Into<String>, f: F) -> Self {
        Self {
            label: label.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for PackageFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageFn").field("label", &self.label).finish()
    }
}

impl<F> PackageProducer for PackageFn<F>
where
    F: Fn(&str) -> Arc<dyn ListProducer>,
{
    fn for_package(&self, name: &str) -> Arc<dyn ListProducer> {
        (self.f)(name)
    }
}
