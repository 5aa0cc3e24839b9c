//! Amplitude tapers (apodisation) across the array aperture.
//!
//! Tapering trades main-lobe width for lower side lobes. [`Window::Uniform`]
//! is the identity window and leaves every element at unit amplitude.
//!
//! Tapers are sampled at $x_i = 2\pi (i + 1)/(N + 1)$ for $i = 0, \dots, N-1$,
//! which leaves out the zero-valued end points of the continuous window. Every
//! element keeps a strictly positive weight, so short arrays stay usable.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Per-element amplitude weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    /// All elements at unit amplitude.
    #[default]
    Uniform,
    /// `0.5 - 0.5 cos(x)`.
    Hann,
    /// `0.54 - 0.46 cos(x)`.
    Hamming,
    /// `0.42 - 0.5 cos(x) + 0.08 cos(2x)`.
    Blackman,
}

impl Window {
    /// Weights for an `n`-element array. A single element always gets 1.
    pub fn weights(&self, n: usize) -> Vec<f64> {
        if n <= 1 || *self == Window::Uniform {
            return vec![1.0; n];
        }
        let m = (n + 1) as f64;
        (0..n)
            .map(|i| {
                let x = 2.0 * PI * (i + 1) as f64 / m;
                match self {
                    Window::Uniform => 1.0,
                    Window::Hann => 0.5 - 0.5 * x.cos(),
                    Window::Hamming => 0.54 - 0.46 * x.cos(),
                    Window::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
                }
            })
            .collect()
    }
}
