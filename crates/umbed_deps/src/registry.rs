//! The per-invocation dependency registry.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use umbed_core::Diagnostics;

use crate::DependencyDescriptor;

/// Why a raw dependency entry was dropped at registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryRejection {
    /// The entry is not an object.
    #[error("entry is not an object")]
    NotAnObject,

    /// The entry declares neither `js` nor `css`.
    #[error("entry has neither 'js' nor 'css' key")]
    NoResources,

    /// The entry is an object but its fields have the wrong shape.
    #[error("entry is malformed: {0}")]
    Malformed(String),
}

/// Ordered list of accepted dependency descriptors.
///
/// Insertion order is significant: it is the order resources are requested in.
#[derive(Debug, Clone, Default)]
pub struct DependencyRegistry {
    dependencies: Vec<DependencyDescriptor>,
}

impl DependencyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every well-formed entry of the raw `list`, in order.
    ///
    /// A `list` that is not an array is ignored without a diagnostic. Each
    /// rejected entry is reported as a warning and dropped. Returns the number
    /// of entries accepted.
    pub fn register(&mut self, list: &Value, diagnostics: &Diagnostics) -> usize {
        let Value::Array(items) = list else {
            return 0;
        };

        let mut accepted = 0;
        for (index, item) in items.iter().enumerate() {
            match Self::parse(item) {
                Ok(descriptor) => {
                    self.dependencies.push(descriptor);
                    accepted += 1;
                }
                Err(rejection) => {
                    diagnostics.warn(format_args!(
                        "couldn't add dependency #{index}: {rejection}"
                    ));
                }
            }
        }
        accepted
    }

    /// Validates and appends an already-typed descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryRejection::NoResources`] if it declares neither `js` nor `css`.
    pub fn push(&mut self, descriptor: DependencyDescriptor) -> Result<(), RegistryRejection> {
        if !descriptor.has_resources() {
            return Err(RegistryRejection::NoResources);
        }
        self.dependencies.push(descriptor);
        Ok(())
    }

    /// Parses one raw entry into a descriptor.
    ///
    /// # Errors
    ///
    /// Returns the reason the entry cannot be registered.
    pub fn parse(item: &Value) -> Result<DependencyDescriptor, RegistryRejection> {
        if !item.is_object() {
            return Err(RegistryRejection::NotAnObject);
        }
        let descriptor = DependencyDescriptor::deserialize(item)
            .map_err(|err| RegistryRejection::Malformed(err.to_string()))?;
        if !descriptor.has_resources() {
            return Err(RegistryRejection::NoResources);
        }
        Ok(descriptor)
    }

    /// Returns the accepted descriptors in declaration order.
    #[must_use]
    pub fn dependencies(&self) -> &[DependencyDescriptor] {
        &self.dependencies
    }

    /// Iterates over the accepted descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &DependencyDescriptor> {
        self.dependencies.iter()
    }

    /// Number of accepted descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// Returns `true` if nothing was accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl<'a> IntoIterator for &'a DependencyRegistry {
    type Item = &'a DependencyDescriptor;
    type IntoIter = core::slice::Iter<'a, DependencyDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.dependencies.iter()
    }
}
