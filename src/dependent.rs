use crate::dependency::{Dependency, DependencySource};

/// A value and its dependency.
///
/// Produced by consume loads of scalars and by reads through a
/// [`DependentPtr`](crate::DependentPtr). The pairing is fixed at construction:
/// the value can be copied out and the dependency can be copied out, but a
/// `Dependent` never swaps either half.
#[must_use]
#[derive(Clone, Copy, derive_more::Debug)]
#[debug("Dependent({value:?}, {dependency:?})")]
pub struct Dependent<T> {
    value: T,
    dependency: Dependency,
}

impl<T: DependencySource> Dependent<T> {
    /// Pair `value` with a dependency synthesized from its own bits.
    #[inline]
    pub fn new(value: T) -> Self {
        Self {
            value,
            dependency: Dependency::new(value),
        }
    }
}

impl<T> Dependent<T> {
    /// Pair `value` with an existing dependency.
    #[inline]
    pub const fn with_dependency(value: T, dependency: Dependency) -> Self {
        Self { value, dependency }
    }

    /// The loaded value.
    #[must_use]
    #[inline]
    pub fn value(&self) -> T
    where
        T: Copy,
    {
        self.value
    }

    /// Borrow the loaded value.
    #[must_use]
    #[inline]
    pub const fn value_ref(&self) -> &T {
        &self.value
    }

    /// The dependency carried alongside the value.
    #[inline]
    pub const fn dependency(&self) -> Dependency {
        self.dependency
    }

    /// Split into a bare value and a bare dependency.
    #[inline]
    pub fn into_parts(self) -> (T, Dependency) {
        let Self { value, dependency } = self;
        (value, dependency)
    }
}

impl<T: DependencySource> From<T> for Dependent<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_dependency() {
        let dependent = Dependent::new(42u16);
        assert_eq!(dependent.value(), 42);
        assert_eq!(dependent.dependency().to_bits(), 0);
    }

    #[test]
    fn explicit_dependency_is_kept() {
        let dependency = Dependency::new(7u64);
        let dependent = Dependent::with_dependency([1u8, 2, 3], dependency);
        assert_eq!(dependent.value_ref(), &[1, 2, 3]);
        let (value, dependency) = dependent.into_parts();
        assert_eq!(value, [1, 2, 3]);
        assert_eq!(dependency.to_bits(), 0);
    }
}
