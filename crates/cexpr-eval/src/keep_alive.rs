//! Temporary roots for objects created during one evaluation.

/// Ordered list of root guards for freshly created objects.
///
/// Objects are pushed the moment they are allocated, before any field is
/// written, so an allocation later in the same expression cannot collect
/// them. Dropping the list releases every root, on success and on error.
#[derive(Debug)]
pub struct KeepAlive<R> {
    roots: Vec<R>,
}

impl<R> KeepAlive<R> {
    pub fn new() -> Self {
        Self { roots: Vec::new() }
    }

    pub fn push(&mut self, root: R) {
        self.roots.push(root);
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Drop every root now instead of at end of scope.
    pub fn release(self) {}
}

impl<R> Default for KeepAlive<R> {
    fn default() -> Self {
        Self::new()
    }
}
