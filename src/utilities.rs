/// Table interpolation helpers

/// Log-log interpolation.
///
/// All x and y values must be positive. Inside the table the curve is a
/// power law between neighbouring points. Below the first point the
/// first segment's power law is extended, so tabulated stopping keeps
/// falling towards zero energy instead of flattening out; above the last
/// point the last value is returned.
pub fn interpolate_log_log(x: &[f64], y: &[f64], x_new: f64) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    if x.len() == 1 {
        return y[0];
    }
    if x_new >= x[x.len() - 1] {
        return y[y.len() - 1];
    }
    if x_new <= 0.0 {
        return 0.0;
    }
    let idx = if x_new <= x[0] { 0 } else { bracket(x, x_new) };
    let (log_x1, log_x2) = (x[idx].ln(), x[idx + 1].ln());
    let (log_y1, log_y2) = (y[idx].ln(), y[idx + 1].ln());
    let log_y_new = log_y1 + (x_new.ln() - log_x1) * (log_y2 - log_y1) / (log_x2 - log_x1);
    log_y_new.exp()
}

/// Largest i with x[i] <= x_new, for x[0] < x_new < x[last].
fn bracket(x: &[f64], x_new: f64) -> usize {
    let mut low = 0usize;
    let mut high = x.len() - 1;
    while high - low > 1 {
        let mid = (low + high) >> 1;
        if x[mid] <= x_new {
            low = mid;
        } else {
            high = mid;
        }
    }
    low
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_log_log_power_law() {
        // y = x^0.5 is exact under log-log interpolation
        let x = [1.0, 100.0, 10000.0];
        let y = [1.0, 10.0, 100.0];
        assert!((interpolate_log_log(&x, &y, 25.0) - 5.0).abs() < 1e-9);
        assert!((interpolate_log_log(&x, &y, 400.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_interpolate_log_log_extends_low_end() {
        let x = [100.0, 10000.0];
        let y = [10.0, 100.0];
        assert!((interpolate_log_log(&x, &y, 25.0) - 5.0).abs() < 1e-9);
        assert_eq!(interpolate_log_log(&x, &y, 0.0), 0.0);
        assert_eq!(interpolate_log_log(&x, &y, 1.0e6), 100.0);
    }
}
