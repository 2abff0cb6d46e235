use std::collections::VecDeque;

/// Minimum and maximum of the present values inside one centred window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowExtrema {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Rolling extrema over the window `[i - H, i + H]`, clipped to the series bounds.
///
/// Missing values never enter the window; a window holding nothing but missing
/// values yields `None` on both sides. Two monotonic deques of `(index, value)`
/// keep the run O(N) regardless of `half_window`.
pub fn centered_extrema(values: &[Option<f64>], half_window: usize) -> Vec<WindowExtrema> {
    let n = values.len();
    let mut extrema = Vec::with_capacity(n);
    // Increasing values front to back.
    let mut min_deque: VecDeque<(usize, f64)> = VecDeque::new();
    // Decreasing values front to back.
    let mut max_deque: VecDeque<(usize, f64)> = VecDeque::new();
    let mut next = 0usize;

    for centre in 0..n {
        let right = centre.saturating_add(half_window).min(n - 1);
        while next <= right {
            if let Some(value) = values[next].filter(|value| value.is_finite()) {
                while let Some(&(_, back)) = min_deque.back() {
                    if back >= value {
                        min_deque.pop_back();
                    } else {
                        break;
                    }
                }
                min_deque.push_back((next, value));

                while let Some(&(_, back)) = max_deque.back() {
                    if back <= value {
                        max_deque.pop_back();
                    } else {
                        break;
                    }
                }
                max_deque.push_back((next, value));
            }
            next += 1;
        }

        let left = centre.saturating_sub(half_window);
        while min_deque.front().map_or(false, |&(idx, _)| idx < left) {
            min_deque.pop_front();
        }
        while max_deque.front().map_or(false, |&(idx, _)| idx < left) {
            max_deque.pop_front();
        }

        extrema.push(WindowExtrema {
            min: min_deque.front().map(|&(_, value)| value),
            max: max_deque.front().map(|&(_, value)| value),
        });
    }

    extrema
}
