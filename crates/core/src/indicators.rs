pub const EMA_SPAN: usize = 20;

/// Exponential moving average in its recursive form.
///
/// `alpha = 2 / (span + 1)`, seeded with the first value, so the output has
/// exactly one entry per input. This is not the bias-adjusted variant that
/// reweights the whole history; the two differ noticeably over the first
/// `span` observations.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);

    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &v in values {
        let next = match prev {
            None => v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}
