//! The fixed convolution kernel library.
//!
//! Three named kernels are available to [`convolve`](crate::convolve):
//! `edge` (3x3 Laplacian-style edge extraction), `sharpen` (3x3 unsharp
//! center boost), and `blur` (5x5 binomial approximation of a Gaussian,
//! weights summing to 1). Kernels are immutable statics shared by
//! reference across any number of convolve stages.

/// An immutable square convolution matrix with an odd side length.
#[derive(Debug, PartialEq)]
pub struct Kernel {
    name: &'static str,
    side: u32,
    weights: &'static [f64],
}

/// 3x3 edge extraction: uniform -1 surround with a center weight of 8.
/// Weights sum to zero, so uniform regions convolve to black.
pub static EDGE: Kernel = Kernel {
    name: "edge",
    side: 3,
    #[rustfmt::skip]
    weights: &[
        -1.0, -1.0, -1.0,
        -1.0,  8.0, -1.0,
        -1.0, -1.0, -1.0,
    ],
};

/// 3x3 sharpen: center boost of 5 against the 4-connected neighbors.
pub static SHARPEN: Kernel = Kernel {
    name: "sharpen",
    side: 3,
    #[rustfmt::skip]
    weights: &[
         0.0, -1.0,  0.0,
        -1.0,  5.0, -1.0,
         0.0, -1.0,  0.0,
    ],
};

/// 5x5 binomial blur: the outer product of 1-4-6-4-1 normalized by 256.
/// Weights sum to 1, so uniform regions are preserved.
pub static BLUR: Kernel = Kernel {
    name: "blur",
    side: 5,
    #[rustfmt::skip]
    weights: &[
        1.0 / 256.0,  4.0 / 256.0,  6.0 / 256.0,  4.0 / 256.0, 1.0 / 256.0,
        4.0 / 256.0, 16.0 / 256.0, 24.0 / 256.0, 16.0 / 256.0, 4.0 / 256.0,
        6.0 / 256.0, 24.0 / 256.0, 36.0 / 256.0, 24.0 / 256.0, 6.0 / 256.0,
        4.0 / 256.0, 16.0 / 256.0, 24.0 / 256.0, 16.0 / 256.0, 4.0 / 256.0,
        1.0 / 256.0,  4.0 / 256.0,  6.0 / 256.0,  4.0 / 256.0, 1.0 / 256.0,
    ],
};

impl Kernel {
    /// Look up a kernel by its configuration name.
    ///
    /// Returns `None` for anything outside `edge` / `sharpen` / `blur`.
    #[must_use]
    pub fn by_name(name: &str) -> Option<&'static Self> {
        match name {
            "edge" => Some(&EDGE),
            "sharpen" => Some(&SHARPEN),
            "blur" => Some(&BLUR),
            _ => None,
        }
    }

    /// The configuration name of this kernel.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Side length of the square matrix (always odd).
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Border width excluded from convolution output: `(side - 1) / 2`.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        (self.side - 1) / 2
    }

    /// Weight at row `ky`, column `kx` of the matrix.
    #[must_use]
    pub const fn weight(&self, kx: u32, ky: u32) -> f64 {
        self.weights[(ky * self.side + kx) as usize]
    }
}
