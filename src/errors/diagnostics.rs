use std::slice::Iter;

use log::debug;

use super::errors::{Error, ErrorImpl};

/// Collects every diagnostic raised while parsing one file.
///
/// Recording a diagnostic never stops the parse; the driver inspects the
/// collector once the file is done.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    errors: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics { errors: vec![] }
    }

    pub fn push(&mut self, error: Error) {
        debug!("diagnostic: {}", error);
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
    }

    pub fn iter(&self) -> Iter<'_, Error> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_structural(&self) -> bool {
        self.errors.iter().any(Error::is_structural)
    }

    /// Returns true if any recorded diagnostic matches `predicate`.
    pub fn any(&self, predicate: impl Fn(&ErrorImpl) -> bool) -> bool {
        self.errors.iter().any(|error| predicate(error.get_impl()))
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Error;
    type IntoIter = Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
