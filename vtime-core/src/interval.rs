//! Real-time intervals and the hidden-interval normalizer

/// A closed range `[start, end]` on the real time axis, in seconds.
///
/// `start <= end` always holds; [`Interval::new`] reorders inverted endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl Interval {
    /// Creates an interval from two endpoints in either order
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Returns the length of this interval in seconds
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    /// Returns true when the interval has no measurable length
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Half-open containment `[start, end)`, used when snapping playback
    pub fn contains_half_open(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }

    /// Closed containment `[start, end]`
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }

    /// Intersects this interval with `[0, upper]`, returning `None` if nothing
    /// of positive length remains.
    pub fn clamp_to(&self, upper: f64) -> Option<Self> {
        let clamped = Self::new(clamp_time(self.start, upper), clamp_time(self.end, upper));
        if clamped.is_empty() {
            None
        } else {
            Some(clamped)
        }
    }
}

/// Clamps a time value into `[0, upper]`.
///
/// NaN maps to 0. `f64::clamp` is avoided because it propagates NaN.
pub fn clamp_time(t: f64, upper: f64) -> f64 {
    t.max(0.0).min(upper.max(0.0))
}

/// Collapses raw, possibly overlapping and unsorted intervals into a sorted,
/// disjoint partition of `[0, upper]`.
///
/// Each interval is intersected with `[0, upper]` and degenerate results are
/// dropped. Intervals are then merged when `current.start <= last.end`, so
/// touching intervals fuse. For every adjacent pair in the output,
/// `prev.end < next.start`.
///
/// Pass `f64::INFINITY` as `upper` when the real duration is not yet known.
pub fn normalize<I>(raw: I, upper: f64) -> Vec<Interval>
where
    I: IntoIterator<Item = Interval>,
{
    let mut clamped: Vec<Interval> = raw
        .into_iter()
        .filter_map(|iv| iv.clamp_to(upper))
        .collect();

    clamped.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<Interval> = Vec::with_capacity(clamped.len());
    for current in clamped {
        match merged.last_mut() {
            Some(last) if current.start <= last.end => {
                last.end = last.end.max(current.end);
            }
            _ => merged.push(current),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(a: f64, b: f64) -> Interval {
        Interval::new(a, b)
    }

    /// Heap's algorithm, collecting every permutation of `items`
    fn permutations(items: &[Interval]) -> Vec<Vec<Interval>> {
        fn heap(k: usize, items: &mut Vec<Interval>, out: &mut Vec<Vec<Interval>>) {
            if k <= 1 {
                out.push(items.clone());
                return;
            }
            heap(k - 1, items, out);
            for i in 0..k - 1 {
                if k % 2 == 0 {
                    items.swap(i, k - 1);
                } else {
                    items.swap(0, k - 1);
                }
                heap(k - 1, items, out);
            }
        }
        let mut out = Vec::new();
        let mut items = items.to_vec();
        let n = items.len();
        heap(n, &mut items, &mut out);
        out
    }

    #[test]
    fn test_new_reorders_inverted_endpoints() {
        let interval = iv(80.0, 70.0);
        assert_eq!(interval.start, 70.0);
        assert_eq!(interval.end, 80.0);
        assert_eq!(interval.len(), 10.0);
    }

    #[test]
    fn test_normalize_drops_zero_length() {
        assert!(normalize(vec![iv(50.0, 50.0)], 120.0).is_empty());
    }

    #[test]
    fn test_normalize_reorders_inverted() {
        assert_eq!(normalize(vec![iv(80.0, 70.0)], 120.0), vec![iv(70.0, 80.0)]);
    }

    #[test]
    fn test_normalize_merges_overlapping_and_touching() {
        let out = normalize(
            vec![iv(40.0, 50.0), iv(10.0, 20.0), iv(15.0, 30.0), iv(30.0, 35.0)],
            120.0,
        );
        assert_eq!(out, vec![iv(10.0, 35.0), iv(40.0, 50.0)]);
    }

    #[test]
    fn test_normalize_keeps_gaps_strict() {
        let out = normalize(vec![iv(0.0, 10.0), iv(10.5, 12.0), iv(11.0, 11.5)], 100.0);
        assert_eq!(out, vec![iv(0.0, 10.0), iv(10.5, 12.0)]);
        for pair in out.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn test_normalize_clamps_to_duration() {
        let out = normalize(vec![iv(-5.0, 5.0), iv(90.0, 150.0), iv(130.0, 140.0)], 100.0);
        assert_eq!(out, vec![iv(0.0, 5.0), iv(90.0, 100.0)]);
    }

    #[test]
    fn test_normalize_unbounded_upper() {
        let out = normalize(vec![iv(90.0, 150.0)], f64::INFINITY);
        assert_eq!(out, vec![iv(90.0, 150.0)]);
    }

    #[test]
    fn test_normalize_nan_endpoint_clamps_to_zero() {
        let out = normalize(vec![Interval { start: f64::NAN, end: 5.0 }], 10.0);
        assert_eq!(out, vec![iv(0.0, 5.0)]);
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize(
            vec![iv(5.0, 1.0), iv(3.0, 8.0), iv(20.0, 25.0), iv(25.0, 26.0), iv(40.0, 41.0)],
            100.0,
        );
        let twice = normalize(once.clone(), 100.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_order_independent() {
        let raw = vec![
            iv(10.0, 20.0),
            iv(15.0, 18.0),
            iv(20.0, 22.0),
            iv(30.0, 25.0),
            iv(10.0, 12.0),
            iv(50.0, 60.0),
        ];
        let expected = normalize(raw.clone(), 100.0);
        for perm in permutations(&raw) {
            assert_eq!(normalize(perm, 100.0), expected);
        }
    }

    #[test]
    fn test_half_open_containment() {
        let interval = iv(35.0, 45.0);
        assert!(interval.contains_half_open(35.0));
        assert!(interval.contains_half_open(44.999));
        assert!(!interval.contains_half_open(45.0));
        assert!(interval.contains(45.0));
    }
}
