//! Mathematical utilities for 2D frame analysis

use nalgebra::{DMatrix, DVector, Matrix2, SMatrix, SVector, Vector2};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat2 = Matrix2<f64>;
pub type Vec2 = Vector2<f64>;

/// 6x6 matrix for element stiffness and transformation
pub type Mat6 = SMatrix<f64, 6, 6>;
/// 6-element vector for element forces/displacements
pub type Vec6 = SVector<f64, 6>;

/// Compute the transformation matrix for a 2D frame element
///
/// The upper 2x2 rotation maps global (x, y) into local (axial, transverse);
/// rotations pass through unchanged.
///
/// # Returns
/// (6x6 global-to-local transformation, element length)
pub fn beam_transformation(x1: &Vec2, x2: &Vec2) -> (Mat6, f64) {
    let a0 = x2 - x1;
    let length = a0.norm();
    let n = a0 / length;

    let mut a = Mat6::zeros();
    for block in 0..2 {
        let o = block * 3;
        a[(o, o)] = n.x;
        a[(o, o + 1)] = n.y;
        a[(o + 1, o)] = -n.y;
        a[(o + 1, o + 1)] = n.x;
        a[(o + 2, o + 2)] = 1.0;
    }

    (a, length)
}

/// Extract the 2x2 rotation block from a 6x6 transformation matrix
pub fn rotation_block(a: &Mat6) -> Mat2 {
    Mat2::new(a[(0, 0)], a[(0, 1)], a[(1, 0)], a[(1, 1)])
}

/// Compute the local stiffness matrix for an Euler-Bernoulli beam-column
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `a` - Cross-sectional area
/// * `i` - Second moment of area about the bending axis
/// * `length` - Element length
pub fn beam_local_stiffness(e: f64, a: f64, i: f64, length: f64) -> Mat6 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = e * a / l;
    let ei_l3 = e * i / l3;
    let ei_l2 = e * i / l2;
    let ei_l = e * i / l;

    #[rustfmt::skip]
    let data = [
        // Row 0: axial at start
        ea_l,   0.0,           0.0,          -ea_l,  0.0,           0.0,
        // Row 1: shear at start
        0.0,    12.0 * ei_l3,  6.0 * ei_l2,  0.0,    -12.0 * ei_l3, 6.0 * ei_l2,
        // Row 2: moment at start
        0.0,    6.0 * ei_l2,   4.0 * ei_l,   0.0,    -6.0 * ei_l2,  2.0 * ei_l,
        // Row 3: axial at end
        -ea_l,  0.0,           0.0,          ea_l,   0.0,           0.0,
        // Row 4: shear at end
        0.0,    -12.0 * ei_l3, -6.0 * ei_l2, 0.0,    12.0 * ei_l3,  -6.0 * ei_l2,
        // Row 5: moment at end
        0.0,    6.0 * ei_l2,   2.0 * ei_l,   0.0,    -6.0 * ei_l2,  4.0 * ei_l,
    ];

    Mat6::from_row_slice(&data)
}

/// Element stiffness in global coordinates: k = Aᵀ k_local A
pub fn beam_global_stiffness(e: f64, a_sect: f64, i: f64, x1: &Vec2, x2: &Vec2) -> Mat6 {
    let (a, l) = beam_transformation(x1, x2);
    let k_local = beam_local_stiffness(e, a_sect, i, l);
    a.transpose() * k_local * a
}

/// Equivalent nodal forces for a linearly varying line load on an element
///
/// The load is given in the element-local frame: `p1`/`p2` are the (axial,
/// transverse) intensities at the start and end. Returns the consistent
/// nodal vector in local DOF order (N1, V1, M1, N2, V2, M2).
pub fn consistent_line_load(p1: &Vec2, p2: &Vec2, length: f64) -> Vec6 {
    let l = length;
    let l2 = l * l;
    let (p1_ax, p2_ax) = (p1.x, p2.x);
    let (p1_tr, p2_tr) = (p1.y, p2.y);

    Vec6::from_column_slice(&[
        (2.0 * p1_ax + p2_ax) * l / 6.0,
        (7.0 * p1_tr + 3.0 * p2_tr) * l / 20.0,
        (3.0 * p1_tr + 2.0 * p2_tr) * l2 / 60.0,
        (2.0 * p2_ax + p1_ax) * l / 6.0,
        (3.0 * p1_tr + 7.0 * p2_tr) * l / 20.0,
        -(2.0 * p1_tr + 3.0 * p2_tr) * l2 / 60.0,
    ])
}

/// Cubic-Hermite shape function matrix at parameter s in [0, 1]
///
/// Row 0 interpolates the axial displacement linearly, row 1 the transverse
/// displacement from the end deflections and rotations.
pub fn hermite_shape_matrix(s: f64, length: f64) -> SMatrix<f64, 2, 6> {
    let l = length;
    let s2 = s * s;
    let s3 = s2 * s;

    #[rustfmt::skip]
    let data = [
        1.0 - s, 0.0,                       0.0,                      s,   0.0,                0.0,
        0.0,     1.0 - 3.0 * s2 + 2.0 * s3, (s - 2.0 * s2 + s3) * l,  0.0, 3.0 * s2 - 2.0 * s3, (-s2 + s3) * l,
    ];

    SMatrix::<f64, 2, 6>::from_row_slice(&data)
}

/// Natural cubic spline through the points (x, y)
///
/// Knots must be strictly increasing. Second derivatives vanish at the ends.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: std::vec::Vec<f64>,
    y: std::vec::Vec<f64>,
    /// Second derivative at each knot
    m: std::vec::Vec<f64>,
}

impl CubicSpline {
    /// Fit a natural cubic spline. Returns None for fewer than two points or
    /// non-increasing knots.
    pub fn fit(x: &[f64], y: &[f64]) -> Option<Self> {
        let n = x.len();
        if n < 2 || y.len() != n {
            return None;
        }
        for w in x.windows(2) {
            if w[1] <= w[0] {
                return None;
            }
        }

        let mut m = vec![0.0; n];
        if n > 2 {
            // Thomas algorithm on the interior tridiagonal system
            let k = n - 2;
            let mut sub = vec![0.0; k];
            let mut diag = vec![0.0; k];
            let mut sup = vec![0.0; k];
            let mut rhs = vec![0.0; k];
            for i in 0..k {
                let h0 = x[i + 1] - x[i];
                let h1 = x[i + 2] - x[i + 1];
                sub[i] = h0;
                diag[i] = 2.0 * (h0 + h1);
                sup[i] = h1;
                rhs[i] = 6.0 * ((y[i + 2] - y[i + 1]) / h1 - (y[i + 1] - y[i]) / h0);
            }
            for i in 1..k {
                let w = sub[i] / diag[i - 1];
                diag[i] -= w * sup[i - 1];
                rhs[i] -= w * rhs[i - 1];
            }
            m[k] = rhs[k - 1] / diag[k - 1];
            for i in (0..k.saturating_sub(1)).rev() {
                m[i + 1] = (rhs[i] - sup[i] * m[i + 2]) / diag[i];
            }
        }

        Some(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    /// Evaluate the spline at `xq` (clamped to the knot range)
    pub fn evaluate(&self, xq: f64) -> f64 {
        let n = self.x.len();
        let xq = xq.clamp(self.x[0], self.x[n - 1]);

        let mut i = match self
            .x
            .binary_search_by(|v| v.partial_cmp(&xq).expect("non-finite knot"))
        {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        if i >= n - 1 {
            i = n - 2;
        }

        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - xq) / h;
        let b = (xq - self.x[i]) / h;

        a * self.y[i]
            + b * self.y[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0
    }
}

/// Sparse assembly for the global stiffness matrix
///
/// Entries accumulate in COO form; the assembled system is converted to dense
/// for the direct factorization (the system is small and banded).
pub struct SystemMatrixBuilder {
    size: usize,
    entries: std::vec::Vec<(usize, usize, f64)>,
}

impl SystemMatrixBuilder {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            // 6x6 element blocks, ~4 elements touching a node
            entries: std::vec::Vec::with_capacity(size * 24),
        }
    }

    /// Add a value (accumulates with existing entries at the same position)
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if value.abs() > 1e-15 {
            self.entries.push((row, col, value));
        }
    }

    /// Scatter an element matrix into the rows/columns given by `dofs`
    pub fn add_element_matrix(&mut self, dofs: &[usize; 6], k_elem: &Mat6) {
        for (i, &di) in dofs.iter().enumerate() {
            for (j, &dj) in dofs.iter().enumerate() {
                self.add(di, dj, k_elem[(i, j)]);
            }
        }
    }

    /// Assemble to CSR
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.size, self.size);
        for &(row, col, val) in &self.entries {
            coo.push(row, col, val);
        }
        CsrMatrix::from(&coo)
    }

    /// Assemble to a dense matrix for factorization
    pub fn to_dense(&self) -> Mat {
        let csr = self.to_csr();
        let mut mat = Mat::zeros(self.size, self.size);
        for (row, col, val) in csr.triplet_iter() {
            mat[(row, col)] = *val;
        }
        mat
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

/// Solve a linear system by LU decomposition
pub fn solve_linear_system(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone().lu().solve(b)
}
