/// Least-squares line `value = slope * x + intercept`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Part of `[lo, hi]` where the line stays within `[min, max]`, or `None` if it never does.
    ///
    /// The returned interval lies on the fitted line itself; nothing is clamped.
    pub fn clip(&self, lo: f64, hi: f64, min: f64, max: f64) -> Option<(f64, f64)> {
        if hi < lo {
            return None;
        }

        if self.slope.abs() < f64::EPSILON {
            let value = self.intercept;
            return (value >= min && value <= max).then_some((lo, hi));
        }

        let at_min = (min - self.intercept) / self.slope;
        let at_max = (max - self.intercept) / self.slope;
        let start = lo.max(at_min.min(at_max));
        let end = hi.min(at_min.max(at_max));

        (start <= end).then_some((start, end))
    }
}

/// Ordinary least-squares fit over `(x, value)` pairs.
///
/// Returns `None` for no samples. A single sample, or samples that all share the same x,
/// give a flat line through the mean value.
pub fn fit(samples: &[(f64, f64)]) -> Option<TrendLine> {
    if samples.is_empty() {
        return None;
    }

    let n = samples.len() as f64;
    let mean_x = samples.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = samples.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (covariance, variance) = samples.iter().fold((0.0, 0.0), |(cov, var), (x, y)| {
        let dx = x - mean_x;
        (cov + dx * (y - mean_y), var + dx * dx)
    });

    if variance.abs() < f64::EPSILON {
        return Some(TrendLine {
            slope: 0.0,
            intercept: mean_y,
        });
    }

    let slope = covariance / variance;
    Some(TrendLine {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn no_samples_no_line() {
        assert_eq!(fit(&[]), None);
    }

    #[test]
    fn single_sample_is_flat() {
        let line = fit(&[(3.0, 7.0)]).unwrap();
        assert_eq!(line.slope, 0.0);
        assert_eq!(line.value_at(-10.0), 7.0);
        assert_eq!(line.value_at(10.0), 7.0);
    }

    #[test]
    fn identical_x_is_flat_at_mean() {
        let line = fit(&[(2.0, 1.0), (2.0, 5.0)]).unwrap();
        assert_eq!(line.slope, 0.0);
        assert_eq!(line.intercept, 3.0);
    }

    #[test]
    fn exact_line_is_recovered() {
        let samples: Vec<(f64, f64)> = (0..6).map(|x| (x as f64, 2.0 * x as f64 - 1.0)).collect();
        let line = fit(&samples).unwrap();
        assert!(close(line.slope, 2.0));
        assert!(close(line.intercept, -1.0));
    }

    #[test]
    fn noisy_fit_matches_hand_computation() {
        // x = 0,1,2 ; y = 2,-2,1 -> slope -0.5, intercept 0.8333..
        let line = fit(&[(0.0, 2.0), (1.0, -2.0), (2.0, 1.0)]).unwrap();
        assert!(close(line.slope, -0.5));
        assert!(close(line.intercept, 1.0 / 3.0 + 0.5));
    }

    #[test]
    fn clip_keeps_line_inside_range() {
        let line = TrendLine {
            slope: 2.0,
            intercept: -1.0,
        };
        let (start, end) = line.clip(0.0, 10.0, 1.0, 10.0).unwrap();
        assert!(close(start, 1.0));
        assert!(close(end, 5.5));
        assert!(close(line.value_at(start), 1.0));
        assert!(close(line.value_at(end), 10.0));
    }

    #[test]
    fn clip_leaves_inner_lines_untouched() {
        let line = TrendLine {
            slope: -0.5,
            intercept: 2.0,
        };
        assert_eq!(line.clip(0.0, 4.0, -9.0, 9.0), Some((0.0, 4.0)));
    }

    #[test]
    fn clip_outside_range_is_none() {
        let flat = TrendLine {
            slope: 0.0,
            intercept: 0.5,
        };
        assert_eq!(flat.clip(0.0, 4.0, 1.0, 10.0), None);

        let steep = TrendLine {
            slope: 1.0,
            intercept: 20.0,
        };
        assert_eq!(steep.clip(0.0, 4.0, 1.0, 10.0), None);
    }
}
