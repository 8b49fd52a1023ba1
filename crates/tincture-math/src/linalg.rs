//! Linear algebra over vectors, matrices and N-D stacks.
//!
//! Two tiers live here:
//!
//! - **Static ranks** ([`Vector`], [`Matrix`]): `vdot`, `matvec`, `matmul`,
//!   `inv_matrix` and friends take plain nested `Vec`s and never inspect a
//!   shape at run time. Color code calls these.
//! - **Generic N-D** ([`Array`]): [`dot`], [`inv`], [`diag`], [`inner`],
//!   [`outer`], [`vstack`], [`hstack`], [`solve`] and [`det`] follow the NumPy
//!   rules. Ranks above two are treated as stacks of matrices over the last
//!   two axes.
//!
//! Inversion uses Gauss-Jordan elimination with partial pivoting. A zero
//! pivot (after pivoting) fails with [`Error::NotInvertible`].

use crate::array::{Array, multiply};
use tincture_core::{Error, Result};

/// 1-D vector.
pub type Vector = Vec<f64>;
/// Row-major 2-D matrix.
pub type Matrix = Vec<Vector>;

// ============================================================================
// Static-rank fast paths
// ============================================================================

/// Inner product of two vectors of equal length.
pub fn vdot(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::shape(format!("vdot of lengths {} and {}", a.len(), b.len())));
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// `m · v`.
pub fn matvec(m: &[Vector], v: &[f64]) -> Result<Vector> {
    m.iter().map(|row| vdot(row, v)).collect()
}

/// `v · m`.
pub fn vecmat(v: &[f64], m: &[Vector]) -> Result<Vector> {
    if v.len() != m.len() {
        return Err(Error::shape(format!("vector of {} against {} rows", v.len(), m.len())));
    }
    let cols = m.first().map_or(0, Vec::len);
    let mut out = vec![0.0; cols];
    for (x, row) in v.iter().zip(m) {
        if row.len() != cols {
            return Err(Error::shape("ragged matrix"));
        }
        for (o, r) in out.iter_mut().zip(row) {
            *o += x * r;
        }
    }
    Ok(out)
}

/// `a · b` for two 2-D matrices.
pub fn matmul(a: &[Vector], b: &[Vector]) -> Result<Matrix> {
    a.iter().map(|row| vecmat(row, b)).collect()
}

/// Square identity matrix.
pub fn identity(size: usize) -> Matrix {
    eye(size, size, 0)
}

/// `rows x cols` matrix with ones on diagonal `k`.
pub fn eye(rows: usize, cols: usize, k: isize) -> Matrix {
    let mut m = vec![vec![0.0; cols]; rows];
    for (r, row) in m.iter_mut().enumerate() {
        let c = r as isize + k;
        if c >= 0 && (c as usize) < cols {
            row[c as usize] = 1.0;
        }
    }
    m
}

/// Diagonal matrix from a vector.
pub fn diag_matrix(v: &[f64]) -> Matrix {
    let mut m = vec![vec![0.0; v.len()]; v.len()];
    for (i, &x) in v.iter().enumerate() {
        m[i][i] = x;
    }
    m
}

/// Outer product of two vectors.
pub fn outer_vec(a: &[f64], b: &[f64]) -> Matrix {
    a.iter().map(|&x| b.iter().map(|&y| x * y).collect()).collect()
}

/// Inverse of a square matrix by Gauss-Jordan elimination.
pub fn inv_matrix(m: &[Vector]) -> Result<Matrix> {
    let n = m.len();
    if m.iter().any(|r| r.len() != n) {
        return Err(Error::shape("inverse requires a square matrix"));
    }

    // Augment [m | I] and reduce the left half to I
    let mut aug: Matrix = m
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut r = row.clone();
            r.extend((0..n).map(|j| if i == j { 1.0 } else { 0.0 }));
            r
        })
        .collect();

    for col in 0..n {
        let mut pivot_row = col;
        let mut best = aug[col][col].abs();
        for r in col + 1..n {
            let v = aug[r][col].abs();
            if v > best {
                best = v;
                pivot_row = r;
            }
        }
        if best == 0.0 || !best.is_finite() {
            return Err(Error::NotInvertible);
        }
        aug.swap(col, pivot_row);

        let pivot = aug[col][col];
        aug[col].iter_mut().for_each(|x| *x /= pivot);

        let pivot_vals = aug[col].clone();
        for (r, row) in aug.iter_mut().enumerate() {
            if r == col {
                continue;
            }
            let factor = row[col];
            if factor != 0.0 {
                for (x, p) in row.iter_mut().zip(&pivot_vals) {
                    *x -= factor * p;
                }
            }
        }
    }

    Ok(aug.into_iter().map(|row| row[n..].to_vec()).collect())
}

/// Determinant of a square matrix by elimination with partial pivoting.
pub fn det_matrix(m: &[Vector]) -> Result<f64> {
    let n = m.len();
    if m.iter().any(|r| r.len() != n) {
        return Err(Error::shape("determinant requires a square matrix"));
    }
    let mut a: Matrix = m.to_vec();
    let mut det = 1.0;
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
            .unwrap_or(col);
        if a[pivot_row][col] == 0.0 {
            return Ok(0.0);
        }
        if pivot_row != col {
            a.swap(col, pivot_row);
            det = -det;
        }
        let pivot = a[col][col];
        det *= pivot;
        for r in col + 1..n {
            let factor = a[r][col] / pivot;
            for c in col..n {
                a[r][c] -= factor * a[col][c];
            }
        }
    }
    Ok(det)
}

// ============================================================================
// Generic N-D routines
// ============================================================================

/// Rows along the last axis, in row-major order.
fn rows(a: &Array) -> Vec<&[f64]> {
    match a.shape().split_last() {
        None => Vec::new(),
        Some((&0, lead)) => vec![&[][..]; lead.iter().product()],
        Some((&n, _)) => a.data().chunks(n).collect(),
    }
}

/// Splits an N-D array into `[..., r, c]` matrix blocks.
fn blocks(a: &Array) -> Result<(Vec<usize>, usize, usize, Vec<Matrix>)> {
    let s = a.shape();
    if s.len() < 2 {
        return Err(Error::shape(format!("expected at least 2 dimensions, got {:?}", s)));
    }
    let (lead, last) = s.split_at(s.len() - 2);
    let (r, c) = (last[0], last[1]);
    let step = r * c;
    let mats = if step == 0 {
        Vec::new()
    } else {
        a.data()
            .chunks(step)
            .map(|blk| blk.chunks(c.max(1)).map(<[f64]>::to_vec).collect())
            .collect()
    };
    Ok((lead.to_vec(), r, c, mats))
}

fn from_blocks(lead: &[usize], shape_tail: &[usize], mats: Vec<Matrix>) -> Result<Array> {
    let mut shape = lead.to_vec();
    shape.extend_from_slice(shape_tail);
    let data = mats.into_iter().flatten().flatten().collect();
    Array::new(data, shape)
}

/// Generalized dot product.
///
/// Scalars multiply. Otherwise the last axis of `a` is summed against the
/// second-to-last axis of `b` (or the only axis of a 1-D `b`), giving shape
/// `a[:-1] + b[:-2] + b[-1:]`: `dot(xy, yz) = xz`, `dot(nxy, myz) = nxmz`.
pub fn dot(a: &Array, b: &Array) -> Result<Array> {
    if a.ndim() == 0 || b.ndim() == 0 {
        return multiply(a, b);
    }

    let sa = a.shape();
    let sb = b.shape();
    let k = sa[sa.len() - 1];

    if b.ndim() == 1 {
        if sb[0] != k {
            return Err(Error::shape(format!("dot of {:?} and {:?}", sa, sb)));
        }
        let data = rows(a)
            .into_iter()
            .map(|row| row.iter().zip(b.data()).map(|(x, y)| x * y).sum())
            .collect();
        return Array::new(data, sa[..sa.len() - 1].to_vec());
    }

    let kb = sb[sb.len() - 2];
    let m = sb[sb.len() - 1];
    if kb != k {
        return Err(Error::shape(format!("dot of {:?} and {:?}", sa, sb)));
    }

    // Columns of b in (leading..., m) order
    let block = k * m;
    let nblocks = if block == 0 { 0 } else { b.size() / block };
    let mut cols: Vec<Vec<f64>> = Vec::with_capacity(nblocks * m);
    for blk in 0..nblocks {
        let base = blk * block;
        for j in 0..m {
            cols.push((0..k).map(|i| b.data()[base + i * m + j]).collect());
        }
    }

    let n_rows: usize = sa[..sa.len() - 1].iter().product();
    let mut data = Vec::with_capacity(n_rows * cols.len());
    for r in 0..n_rows {
        let row = &a.data()[r * k..(r + 1) * k];
        for col in &cols {
            data.push(row.iter().zip(col).map(|(x, y)| x * y).sum());
        }
    }

    let mut shape = sa[..sa.len() - 1].to_vec();
    shape.extend_from_slice(&sb[..sb.len() - 2]);
    shape.push(m);
    Array::new(data, shape)
}

/// Inverse of a square matrix or a stack of square matrices.
pub fn inv(a: &Array) -> Result<Array> {
    let (lead, r, c, mats) = blocks(a)?;
    if r != c {
        return Err(Error::shape("inverse requires square trailing dimensions"));
    }
    let inverted = mats.iter().map(|m| inv_matrix(m)).collect::<Result<Vec<_>>>()?;
    from_blocks(&lead, &[r, c], inverted)
}

/// Determinant of a square matrix; stacks give one value per matrix.
pub fn det(a: &Array) -> Result<Array> {
    let (lead, r, c, mats) = blocks(a)?;
    if r != c {
        return Err(Error::shape("determinant requires square trailing dimensions"));
    }
    let data = mats.iter().map(|m| det_matrix(m)).collect::<Result<Vec<_>>>()?;
    Array::new(data, lead)
}

/// Solves `a · x = b`.
///
/// `a` is `[M, M]` or a stack `[..., M, M]`. `b` may be a vector `[M]`, a
/// matrix `[M, K]`, or a stack of vectors/matrices matching the stack of `a`.
/// A single `a` is applied to every system in a stacked `b`.
pub fn solve(a: &Array, b: &Array) -> Result<Array> {
    let (_, n, c, eqs) = blocks(a)?;
    if n != c {
        return Err(Error::shape("solve requires square trailing dimensions"));
    }
    let inverses = eqs.iter().map(|m| inv_matrix(m)).collect::<Result<Vec<_>>>()?;

    let sb = b.shape();
    let matrix_rhs = b.ndim() >= 2
        && sb[sb.len() - 2] == n
        && (b.ndim() == a.ndim() || inverses.len() == 1);
    let vector_rhs = !matrix_rhs && sb.last() == Some(&n);
    if !matrix_rhs && !vector_rhs {
        return Err(Error::shape(format!("cannot solve {:?} against {:?}", a.shape(), sb)));
    }

    if vector_rhs {
        let vecs = rows(b);
        if inverses.len() != 1 && inverses.len() != vecs.len() {
            return Err(Error::shape(format!("cannot solve {:?} against {:?}", a.shape(), sb)));
        }
        let mut data = Vec::with_capacity(b.size());
        for (i, v) in vecs.iter().enumerate() {
            let m = &inverses[if inverses.len() == 1 { 0 } else { i }];
            data.extend(matvec(m, v)?);
        }
        return Array::new(data, sb.to_vec());
    }

    let (_, rb, _, rhs) = blocks(b)?;
    if rb != n || (inverses.len() != 1 && inverses.len() != rhs.len()) {
        return Err(Error::shape(format!("cannot solve {:?} against {:?}", a.shape(), sb)));
    }
    let mut data = Vec::with_capacity(b.size());
    for (i, m) in rhs.iter().enumerate() {
        let ai = &inverses[if inverses.len() == 1 { 0 } else { i }];
        data.extend(matmul(ai, m)?.into_iter().flatten());
    }
    Array::new(data, sb.to_vec())
}

/// Diagonal extraction or construction.
///
/// A 1-D input becomes a square matrix with the values on diagonal `k`; a
/// 2-D input yields its diagonal `k` as a vector.
pub fn diag(a: &Array, k: isize) -> Result<Array> {
    match a.ndim() {
        1 => {
            let n = a.size() + k.unsigned_abs();
            let mut m = Array::zeros(&[n, n]);
            for (i, &v) in a.data().iter().enumerate() {
                let (r, c) = if k >= 0 { (i, i + k as usize) } else { (i + k.unsigned_abs(), i) };
                m.data_mut()[r * n + c] = v;
            }
            Ok(m)
        }
        2 => {
            let (rows_n, cols_n) = (a.shape()[0] as isize, a.shape()[1] as isize);
            let mut out = Vec::new();
            let mut r = if k < 0 { -k } else { 0 };
            let mut c = if k > 0 { k } else { 0 };
            while r < rows_n && c < cols_n {
                out.push(a.data()[(r * cols_n + c) as usize]);
                r += 1;
                c += 1;
            }
            Ok(Array::from_vec(out))
        }
        d => Err(Error::shape(format!("diag expects 1 or 2 dimensions, got {d}"))),
    }
}

/// Writes `value` on the main diagonal of every matrix in the last two axes.
pub fn fill_diagonal(a: &mut Array, value: f64) -> Result<()> {
    let s = a.shape().to_vec();
    if s.len() < 2 {
        return Err(Error::shape("fill_diagonal requires at least 2 dimensions"));
    }
    let (r, c) = (s[s.len() - 2], s[s.len() - 1]);
    let step = r * c;
    if step == 0 {
        return Ok(());
    }
    for blk in a.data_mut().chunks_mut(step) {
        for i in 0..r.min(c) {
            blk[i * c + i] = value;
        }
    }
    Ok(())
}

/// Outer product of the flattened inputs.
pub fn outer(a: &Array, b: &Array) -> Result<Array> {
    let m = outer_vec(a.data(), b.data());
    Array::new(m.into_iter().flatten().collect(), vec![a.size(), b.size()])
}

/// Inner product over the last axes: shape `a[:-1] + b[:-1]`.
pub fn inner(a: &Array, b: &Array) -> Result<Array> {
    if a.ndim() == 0 || b.ndim() == 0 {
        return multiply(a, b);
    }
    let (na, nb) = (a.shape()[a.ndim() - 1], b.shape()[b.ndim() - 1]);
    if na != nb {
        return Err(Error::shape(format!("inner of {:?} and {:?}", a.shape(), b.shape())));
    }
    let rows_b = rows(b);
    let mut data = Vec::new();
    for ra in rows(a) {
        for rb in &rows_b {
            data.push(ra.iter().zip(rb.iter()).map(|(x, y)| x * y).sum());
        }
    }
    let mut shape = a.shape()[..a.ndim() - 1].to_vec();
    shape.extend_from_slice(&b.shape()[..b.ndim() - 1]);
    Array::new(data, shape)
}

fn concat_axis0(arrays: &[Array]) -> Result<Array> {
    let Some(first) = arrays.first() else {
        return Err(Error::shape("need at least one array to stack"));
    };
    let tail = &first.shape()[1..];
    let mut rows_n = 0;
    let mut data = Vec::new();
    for a in arrays {
        if &a.shape()[1..] != tail {
            return Err(Error::shape("stacked arrays must share trailing dimensions"));
        }
        rows_n += a.shape()[0];
        data.extend_from_slice(a.data());
    }
    let mut shape = vec![rows_n];
    shape.extend_from_slice(tail);
    Array::new(data, shape)
}

/// Stacks arrays vertically (along the first axis).
///
/// Scalars and vectors are promoted to single rows first.
pub fn vstack(arrays: &[Array]) -> Result<Array> {
    let promoted = arrays
        .iter()
        .map(|a| match a.ndim() {
            0 => a.reshape(&[1, 1]),
            1 => a.reshape(&[1, a.size()]),
            _ => Ok(a.clone()),
        })
        .collect::<Result<Vec<_>>>()?;
    concat_axis0(&promoted)
}

/// Stacks arrays horizontally.
///
/// Vectors and scalars are concatenated end to end; higher ranks are joined
/// along the second axis.
pub fn hstack(arrays: &[Array]) -> Result<Array> {
    let Some(first) = arrays.first() else {
        return Err(Error::shape("need at least one array to stack"));
    };
    if first.ndim() <= 1 {
        let promoted = arrays
            .iter()
            .map(|a| if a.ndim() == 0 { a.reshape(&[1]) } else { Ok(a.clone()) })
            .collect::<Result<Vec<_>>>()?;
        return concat_axis0(&promoted);
    }

    // Move axis 1 to the front, concatenate, move it back
    let swap = |a: &Array| {
        let mut axes: Vec<usize> = (0..a.ndim()).collect();
        axes.swap(0, 1);
        a.permute(&axes)
    };
    let swapped: Vec<Array> = arrays.iter().map(swap).collect();
    Ok(swap(&concat_axis0(&swapped)?))
}
