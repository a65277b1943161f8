use std::fmt;

/// Full shape of a buffer, outermost dimension first.
///
/// Memory is laid out with the trailing dimension contiguous, so flattening
/// all but the last dimension yields a column-major matrix with one column
/// per leading index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;

        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }

            write!(f, "{dim}")?;
        }

        if self.dims.len() == 1 {
            write!(f, ",")?;
        }

        write!(f, ")")
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::new(dims.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self::new(dims.to_vec())
    }
}

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Self { dims }
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn size(&self) -> usize {
        self.dims.iter().product()
    }

    /// All dimensions except the last.
    pub fn prefix(&self) -> &[usize] {
        match self.dims.split_last() {
            Some((_, prefix)) => prefix,
            None => &[],
        }
    }

    pub fn last(&self) -> Option<usize> {
        self.dims.last().copied()
    }

    /// Same prefix, different trailing dimension.
    pub fn with_last(&self, last: usize) -> Self {
        let mut dims = self.prefix().to_vec();
        dims.push(last);
        Self { dims }
    }

    /// Returns `(rows, cols)` of the matrix obtained by flattening all but the
    /// last dimension: `rows` is the trailing dimension, `cols` the product of
    /// every leading one.
    pub fn flattened(&self) -> (usize, usize) {
        match self.dims.split_last() {
            Some((&rows, prefix)) => (rows, prefix.iter().product()),
            None => (1, 1),
        }
    }
}

/// Expected form of a named layer input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StructureTemplate {
    /// `...`: any shape with at least one dimension.
    Any,
    /// Exactly this many dimensions.
    Rank(usize),
}

impl fmt::Display for StructureTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "(...)"),
            Self::Rank(rank) => write!(f, "rank {rank}"),
        }
    }
}

impl StructureTemplate {
    pub fn matches(&self, shape: &Shape) -> bool {
        match *self {
            Self::Any => shape.rank() >= 1,
            Self::Rank(rank) => shape.rank() == rank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_all_but_last() {
        let shape = Shape::from([2, 3, 4]);
        assert_eq!(shape.flattened(), (4, 6));
        assert_eq!(shape.prefix(), &[2, 3]);
        assert_eq!(shape.last(), Some(4));
        assert_eq!(shape.size(), 24);

        let vector = Shape::from([5]);
        assert_eq!(vector.flattened(), (5, 1));
        assert_eq!(vector.prefix(), &[] as &[usize]);
    }

    #[test]
    fn with_last_keeps_prefix() {
        let shape = Shape::from([7, 2, 3]);
        assert_eq!(shape.with_last(9), Shape::from([7, 2, 9]));
    }

    #[test]
    fn display() {
        assert_eq!(Shape::from([2, 3, 4]).to_string(), "(2, 3, 4)");
        assert_eq!(Shape::from([5]).to_string(), "(5,)");
        assert_eq!(Shape::default().to_string(), "()");
    }

    #[test]
    fn templates() {
        assert!(StructureTemplate::Any.matches(&Shape::from([1])));
        assert!(StructureTemplate::Any.matches(&Shape::from([4, 2, 1])));
        assert!(!StructureTemplate::Any.matches(&Shape::default()));

        assert!(StructureTemplate::Rank(3).matches(&Shape::from([4, 2, 1])));
        assert!(!StructureTemplate::Rank(2).matches(&Shape::from([4, 2, 1])));
    }
}
