//! Standard-normal distribution kernels shared by the analytic engine and the
//! implied-volatility solver.

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Standard normal probability density.
#[inline]
pub fn normal_pdf(x: f64) -> f64 {
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal cumulative distribution.
///
/// Abramowitz & Stegun 7.1.26 polynomial approximation (absolute error below
/// `7.5e-8`). The reflection `Φ(-x) = 1 - Φ(x)` holds exactly, which keeps
/// put-call parity tight to floating precision.
pub fn normal_cdf(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.231_641_9 * z);
    let poly = t
        * (0.319_381_530
            + t * (-0.356_563_782
                + t * (1.781_477_937 + t * (-1.821_255_978 + t * 1.330_274_429))));
    let approx = 1.0 - normal_pdf(z) * poly;
    if x >= 0.0 { approx } else { 1.0 - approx }
}
