//! Seeded 3D simplex noise.
//!
//! The permutation table lives in a value rather than a process global, so
//! each generation attempt builds its own from the first draw of its stream.

const F3: f64 = 1.0 / 3.0;
const G3: f64 = 1.0 / 6.0;

const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

#[rustfmt::skip]
const PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

#[derive(Clone, Debug)]
pub struct Simplex {
    perm: [usize; 512],
    grad: [usize; 512],
}

impl Simplex {
    /// Builds the table for `seed`. Fractions in `(0, 1)` are scaled up to
    /// 16 bits first; only the low 16 bits of the result matter.
    pub fn new(seed: f64) -> Self {
        let mut seed = seed;
        if seed > 0.0 && seed < 1.0 {
            seed *= 65536.0;
        }
        let mut seed = seed.floor() as i64;
        if seed < 256 {
            seed |= seed << 8;
        }
        let low = (seed & 255) as usize;
        let high = ((seed >> 8) & 255) as usize;

        let mut perm = [0; 512];
        let mut grad = [0; 512];
        for (index, &base) in PERMUTATION.iter().enumerate() {
            let value = usize::from(base) ^ if index & 1 == 1 { low } else { high };
            perm[index] = value;
            perm[index + 256] = value;
            grad[index] = value % 12;
            grad[index + 256] = value % 12;
        }
        Self { perm, grad }
    }

    /// Noise at `(x, y, z)`, roughly in `[-1, 1]`.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let skew = (x + y + z) * F3;
        let i = (x + skew).floor();
        let j = (y + skew).floor();
        let k = (z + skew).floor();
        let unskew = (i + j + k) * G3;
        let x0 = x - i + unskew;
        let y0 = y - j + unskew;
        let z0 = z - k + unskew;

        let (first, second) = simplex_corners(x0, y0, z0);

        let x1 = x0 - first[0] as f64 + G3;
        let y1 = y0 - first[1] as f64 + G3;
        let z1 = z0 - first[2] as f64 + G3;
        let x2 = x0 - second[0] as f64 + 2.0 * G3;
        let y2 = y0 - second[1] as f64 + 2.0 * G3;
        let z2 = z0 - second[2] as f64 + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        let i = wrap(i);
        let j = wrap(j);
        let k = wrap(k);
        let g0 = self.gradient(i, j, k, [0, 0, 0]);
        let g1 = self.gradient(i, j, k, first);
        let g2 = self.gradient(i, j, k, second);
        let g3 = self.gradient(i, j, k, [1, 1, 1]);

        let n0 = corner(g0, x0, y0, z0);
        let n1 = corner(g1, x1, y1, z1);
        let n2 = corner(g2, x2, y2, z2);
        let n3 = corner(g3, x3, y3, z3);
        32.0 * (n0 + n1 + n2 + n3)
    }

    fn gradient(&self, i: usize, j: usize, k: usize, offset: [usize; 3]) -> [f64; 3] {
        let inner = self.perm[k + offset[2]];
        let middle = self.perm[j + offset[1] + inner];
        GRAD3[self.grad[i + offset[0] + middle]]
    }
}

/// Offsets of the second and third simplex corners for a point inside the
/// unit cube.
fn simplex_corners(x0: f64, y0: f64, z0: f64) -> ([usize; 3], [usize; 3]) {
    if x0 >= y0 {
        if y0 >= z0 {
            ([1, 0, 0], [1, 1, 0])
        } else if x0 >= z0 {
            ([1, 0, 0], [1, 0, 1])
        } else {
            ([0, 0, 1], [1, 0, 1])
        }
    } else if y0 < z0 {
        ([0, 0, 1], [0, 1, 1])
    } else if x0 < z0 {
        ([0, 1, 0], [0, 1, 1])
    } else {
        ([0, 1, 0], [1, 1, 0])
    }
}

fn wrap(cell: f64) -> usize {
    ((cell as i64) & 255) as usize
}

fn corner(gradient: [f64; 3], x: f64, y: f64, z: f64) -> f64 {
    let mut t = 0.6 - x * x - y * y - z * z;
    if t < 0.0 {
        return 0.0;
    }
    t *= t;
    t * t * (gradient[0] * x + gradient[1] * y + gradient[2] * z)
}
