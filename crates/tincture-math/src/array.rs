//! N-dimensional arrays with NumPy-style broadcasting.
//!
//! [`Array`] keeps its elements in one flat, row-major buffer next to its
//! shape and strides. Structural operations ([`Array::reshape`],
//! [`Array::ravel`], [`Array::transpose`]) only re-index that buffer.
//! [`Nested`] is the loosely typed input form: nested lists whose shape is
//! discovered by walking them.
//!
//! Broadcasting follows the usual rules: shapes are padded on the left with
//! 1s and each dimension must either match or be 1. [`Array::broadcast_to`]
//! returns a lazy [`Broadcast`] view that replays the smaller array with zero
//! strides instead of copying it.
//!
//! # Usage
//!
//! ```rust
//! use tincture_math::{add, Array};
//!
//! let m = Array::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
//! let v = Array::from_vec(vec![10.0, 20.0]);
//! let sum = add(&m, &v).unwrap();
//! assert_eq!(sum.data(), &[11.0, 22.0, 13.0, 24.0]);
//! ```

use tincture_core::{Error, Result};

/// Row-major strides for a shape.
pub fn strides_for(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Loosely shaped nested input.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested {
    /// A bare number.
    Scalar(f64),
    /// A sequence of sub-arrays.
    List(Vec<Nested>),
}

impl Nested {
    /// Dimension sizes found by walking the nesting.
    ///
    /// A bare scalar has shape `[]`. A ragged structure (siblings with
    /// different shapes, or scalars mixed with lists) also reports `[]`.
    pub fn shape(&self) -> Vec<usize> {
        self.shape_checked().unwrap_or_default()
    }

    fn shape_checked(&self) -> Option<Vec<usize>> {
        match self {
            Self::Scalar(_) => Some(Vec::new()),
            Self::List(items) => {
                let Some(first) = items.first() else {
                    return Some(vec![0]);
                };
                let first_is_scalar = matches!(first, Self::Scalar(_));
                let inner = first.shape_checked()?;
                for item in &items[1..] {
                    if matches!(item, Self::Scalar(_)) != first_is_scalar {
                        return None;
                    }
                    if item.shape_checked()? != inner {
                        return None;
                    }
                }
                let mut shape = vec![items.len()];
                shape.extend(inner);
                Some(shape)
            }
        }
    }

    fn flatten_into(&self, out: &mut Vec<f64>) {
        match self {
            Self::Scalar(v) => out.push(*v),
            Self::List(items) => items.iter().for_each(|i| i.flatten_into(out)),
        }
    }
}

impl From<f64> for Nested {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec<f64>> for Nested {
    fn from(v: Vec<f64>) -> Self {
        Self::List(v.into_iter().map(Self::Scalar).collect())
    }
}

impl From<Vec<Vec<f64>>> for Nested {
    fn from(v: Vec<Vec<f64>>) -> Self {
        Self::List(v.into_iter().map(Self::from).collect())
    }
}

/// Dense N-D array of `f64` with row-major flat storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    data: Vec<f64>,
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl Array {
    /// Builds an array from flat data and a shape.
    pub fn new(data: Vec<f64>, shape: Vec<usize>) -> Result<Self> {
        let size: usize = shape.iter().product();
        if size != data.len() {
            return Err(Error::shape(format!(
                "{} elements cannot have shape {:?}",
                data.len(),
                shape
            )));
        }
        let strides = strides_for(&shape);
        Ok(Self { data, shape, strides })
    }

    /// A 0-D array.
    pub fn scalar(v: f64) -> Self {
        Self { data: vec![v], shape: Vec::new(), strides: Vec::new() }
    }

    /// A 1-D array.
    pub fn from_vec(v: Vec<f64>) -> Self {
        let n = v.len();
        Self { data: v, shape: vec![n], strides: vec![1] }
    }

    /// A 2-D array from rows; ragged rows are rejected.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return Err(Error::shape("ragged rows"));
        }
        let data = rows.iter().flatten().copied().collect();
        Self::new(data, vec![rows.len(), cols])
    }

    /// Builds an array from a nested description; ragged input is rejected.
    pub fn from_nested(nested: &Nested) -> Result<Self> {
        let shape = nested
            .shape_checked()
            .ok_or_else(|| Error::shape("ragged nested array"))?;
        let mut data = Vec::new();
        nested.flatten_into(&mut data);
        Self::new(data, shape)
    }

    /// Array of zeros.
    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, 0.0)
    }

    /// Array filled with one value.
    pub fn full(shape: &[usize], value: f64) -> Self {
        let size = shape.iter().product();
        Self {
            data: vec![value; size],
            shape: shape.to_vec(),
            strides: strides_for(shape),
        }
    }

    /// Dimension sizes.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Element strides (row-major).
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total element count.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Flat row-major elements.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable flat elements.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the array, returning the flat elements.
    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Element at a full index.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for ((&i, &n), &s) in index.iter().zip(&self.shape).zip(&self.strides) {
            if i >= n {
                return None;
            }
            offset += i * s;
        }
        self.data.get(offset).copied()
    }

    /// Same elements under a new shape.
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        Self::new(self.data.clone(), shape.to_vec())
    }

    /// Flattens to 1-D.
    pub fn ravel(&self) -> Self {
        Self::from_vec(self.data.clone())
    }

    /// Iterator over elements in row-major order.
    pub fn flat(&self) -> std::iter::Copied<std::slice::Iter<'_, f64>> {
        self.data.iter().copied()
    }

    /// Reverses the axes.
    pub fn transpose(&self) -> Self {
        let axes: Vec<usize> = (0..self.ndim()).rev().collect();
        self.permute(&axes)
    }

    /// Reorders axes; `axes[i]` names the source axis of output axis `i`.
    pub fn permute(&self, axes: &[usize]) -> Self {
        let shape: Vec<usize> = axes.iter().map(|&a| self.shape[a]).collect();
        let strides: Vec<usize> = axes.iter().map(|&a| self.strides[a]).collect();
        let data = StridedIter::new(&self.data, &shape, &strides).collect();
        Self { data, strides: strides_for(&shape), shape }
    }

    /// Lazy view of this array broadcast to `shape`.
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Broadcast<'_>> {
        if shape.len() < self.ndim() {
            return Err(Error::shape(format!(
                "cannot broadcast {:?} to {:?}",
                self.shape, shape
            )));
        }
        let pad = shape.len() - self.ndim();
        let mut strides = vec![0; shape.len()];
        for (i, (&n, &s)) in self.shape.iter().zip(&self.strides).enumerate() {
            let target = shape[pad + i];
            if n == target {
                strides[pad + i] = s;
            } else if n == 1 {
                strides[pad + i] = 0;
            } else {
                return Err(Error::shape(format!(
                    "cannot broadcast {:?} to {:?}",
                    self.shape, shape
                )));
            }
        }
        Ok(Broadcast { data: &self.data, shape: shape.to_vec(), strides })
    }

    /// Rows of a 2-D array.
    pub fn to_rows(&self) -> Option<Vec<Vec<f64>>> {
        if self.ndim() != 2 {
            return None;
        }
        let cols = self.shape[1];
        if cols == 0 {
            return Some(vec![Vec::new(); self.shape[0]]);
        }
        Some(self.data.chunks(cols).map(<[f64]>::to_vec).collect())
    }

    /// Nested form of this array.
    pub fn to_nested(&self) -> Nested {
        fn build(data: &[f64], shape: &[usize]) -> Nested {
            match shape.split_first() {
                None => Nested::Scalar(data.first().copied().unwrap_or(f64::NAN)),
                Some((&n, rest)) => {
                    let step: usize = rest.iter().product();
                    Nested::List((0..n).map(|i| build(&data[i * step..], rest)).collect())
                }
            }
        }
        build(&self.data, &self.shape)
    }

    /// Applies `f` to every element.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            data: self.data.iter().map(|&x| f(x)).collect(),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
        }
    }
}

/// Read-only broadcast view produced by [`Array::broadcast_to`].
#[derive(Debug, Clone)]
pub struct Broadcast<'a> {
    data: &'a [f64],
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl<'a> Broadcast<'a> {
    /// Broadcast shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Replays elements in row-major order of the broadcast shape.
    pub fn iter(&self) -> StridedIter<'a> {
        StridedIter::new(self.data, &self.shape, &self.strides)
    }

    /// Materializes the view.
    pub fn to_array(&self) -> Array {
        let data = self.iter().collect();
        Array {
            data,
            strides: strides_for(&self.shape),
            shape: self.shape.clone(),
        }
    }
}

/// Walks a flat buffer with arbitrary strides (zero strides repeat data).
#[derive(Debug, Clone)]
pub struct StridedIter<'a> {
    data: &'a [f64],
    shape: Vec<usize>,
    strides: Vec<usize>,
    index: Vec<usize>,
    offset: usize,
    remaining: usize,
}

impl<'a> StridedIter<'a> {
    fn new(data: &'a [f64], shape: &[usize], strides: &[usize]) -> Self {
        Self {
            data,
            shape: shape.to_vec(),
            strides: strides.to_vec(),
            index: vec![0; shape.len()],
            offset: 0,
            remaining: shape.iter().product(),
        }
    }
}

impl Iterator for StridedIter<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.data.get(self.offset).copied();
        self.remaining -= 1;
        // Odometer increment, last axis fastest
        for axis in (0..self.shape.len()).rev() {
            self.index[axis] += 1;
            self.offset += self.strides[axis];
            if self.index[axis] < self.shape[axis] {
                break;
            }
            self.offset -= self.strides[axis] * self.index[axis];
            self.index[axis] = 0;
        }
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for StridedIter<'_> {}

/// Array of zeros.
pub fn zeros(shape: &[usize]) -> Array {
    Array::zeros(shape)
}

/// Array filled with `value`.
pub fn full(shape: &[usize], value: f64) -> Array {
    Array::full(shape, value)
}

/// Common broadcast shape of several shapes.
pub fn broadcast_shapes(shapes: &[&[usize]]) -> Result<Vec<usize>> {
    let ndim = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut out = vec![1; ndim];
    for shape in shapes {
        let pad = ndim - shape.len();
        for (i, &n) in shape.iter().enumerate() {
            let cur = out[pad + i];
            if cur == 1 {
                out[pad + i] = n;
            } else if n != 1 && n != cur {
                return Err(Error::shape(format!("shapes {:?} are not broadcastable", shapes)));
            }
        }
    }
    Ok(out)
}

/// Broadcasts several arrays against each other.
pub fn broadcast<'a>(arrays: &[&'a Array]) -> Result<Vec<Broadcast<'a>>> {
    let shapes: Vec<&[usize]> = arrays.iter().map(|a| a.shape()).collect();
    let shape = broadcast_shapes(&shapes)?;
    arrays.iter().map(|a| a.broadcast_to(&shape)).collect()
}

/// Applies a binary function element-wise with broadcasting.
pub fn apply2(a: &Array, b: &Array, f: impl Fn(f64, f64) -> f64) -> Result<Array> {
    // Same-shape fast path skips the broadcast machinery
    if a.shape() == b.shape() {
        let data = a.flat().zip(b.flat()).map(|(x, y)| f(x, y)).collect();
        return Array::new(data, a.shape().to_vec());
    }
    let views = broadcast(&[a, b])?;
    let shape = views[0].shape().to_vec();
    let data = views[0].iter().zip(views[1].iter()).map(|(x, y)| f(x, y)).collect();
    Array::new(data, shape)
}

/// Element-wise `a + b`.
pub fn add(a: &Array, b: &Array) -> Result<Array> {
    apply2(a, b, |x, y| x + y)
}

/// Element-wise `a - b`.
pub fn subtract(a: &Array, b: &Array) -> Result<Array> {
    apply2(a, b, |x, y| x - y)
}

/// Element-wise `a * b`.
pub fn multiply(a: &Array, b: &Array) -> Result<Array> {
    apply2(a, b, |x, y| x * y)
}

/// Element-wise `a / b`.
pub fn divide(a: &Array, b: &Array) -> Result<Array> {
    apply2(a, b, |x, y| x / y)
}

// ============================================================================
// Vector fast paths (shape known statically, length-1 broadcasting only)
// ============================================================================

fn vec_apply(a: &[f64], b: &[f64], f: impl Fn(f64, f64) -> f64) -> Result<Vec<f64>> {
    match (a.len(), b.len()) {
        (x, y) if x == y => Ok(a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()),
        (1, _) => Ok(b.iter().map(|&y| f(a[0], y)).collect()),
        (_, 1) => Ok(a.iter().map(|&x| f(x, b[0])).collect()),
        (x, y) => Err(Error::shape(format!("vectors of length {x} and {y}"))),
    }
}

/// Vector `a + b`.
pub fn add_vec(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    vec_apply(a, b, |x, y| x + y)
}

/// Vector `a - b`.
pub fn subtract_vec(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    vec_apply(a, b, |x, y| x - y)
}

/// Vector `a * b`.
pub fn multiply_vec(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    vec_apply(a, b, |x, y| x * y)
}

/// Vector `a / b`.
pub fn divide_vec(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    vec_apply(a, b, |x, y| x / y)
}

/// Vector scaled by a scalar.
pub fn scale_vec(a: &[f64], s: f64) -> Vec<f64> {
    a.iter().map(|x| x * s).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_shape() {
        assert_eq!(Nested::Scalar(1.0).shape(), Vec::<usize>::new());
        let m: Nested = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]].into();
        assert_eq!(m.shape(), vec![2, 3]);
        let ragged: Nested = vec![vec![1.0, 2.0], vec![3.0]].into();
        assert!(ragged.shape().is_empty());
        assert!(Array::from_nested(&ragged).is_err());
        let mixed = Nested::List(vec![Nested::Scalar(1.0), vec![2.0].into()]);
        assert!(mixed.shape().is_empty());
    }

    #[test]
    fn test_reshape_transpose() {
        let a = Array::new((0..6).map(f64::from).collect(), vec![2, 3]).unwrap();
        let t = a.transpose();
        assert_eq!(t.shape(), &[3, 2]);
        assert_eq!(t.data(), &[0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
        let r = a.reshape(&[3, 2]).unwrap();
        assert_eq!(r.get(&[2, 1]), Some(5.0));
        assert!(a.reshape(&[4, 2]).is_err());
        assert_eq!(a.ravel().shape(), &[6]);
    }

    #[test]
    fn test_transpose_3d() {
        let a = Array::new((0..24).map(f64::from).collect(), vec![2, 3, 4]).unwrap();
        let t = a.transpose();
        assert_eq!(t.shape(), &[4, 3, 2]);
        assert_eq!(t.get(&[3, 2, 1]), a.get(&[1, 2, 3]));
    }

    #[test]
    fn test_broadcasting() {
        let m = Array::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let col = Array::from_rows(&[vec![10.0], vec![20.0]]).unwrap();
        let out = add(&m, &col).unwrap();
        assert_eq!(out.data(), &[11.0, 12.0, 13.0, 24.0, 25.0, 26.0]);

        let s = Array::scalar(2.0);
        assert_eq!(multiply(&m, &s).unwrap().data()[5], 12.0);

        let bad = Array::from_vec(vec![1.0, 2.0]);
        assert!(add(&m, &bad).is_err());
    }

    #[test]
    fn test_broadcast_view_is_lazy_replay() {
        let v = Array::from_vec(vec![1.0, 2.0]);
        let view = v.broadcast_to(&[3, 2]).unwrap();
        assert_eq!(view.iter().len(), 6);
        assert_eq!(view.to_array().data(), &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
        assert_eq!(broadcast_shapes(&[&[4, 1, 3], &[2, 1]]).unwrap(), vec![4, 2, 3]);
    }

    #[test]
    fn test_vector_fast_paths() {
        assert_eq!(add_vec(&[1.0, 2.0], &[3.0]).unwrap(), vec![4.0, 5.0]);
        assert_eq!(divide_vec(&[2.0], &[1.0, 2.0]).unwrap(), vec![2.0, 1.0]);
        assert!(subtract_vec(&[1.0, 2.0], &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_round_trip_nested() {
        let n: Nested = vec![vec![1.0, 2.0], vec![3.0, 4.0]].into();
        let a = Array::from_nested(&n).unwrap();
        assert_eq!(a.to_nested(), n);
    }
}
