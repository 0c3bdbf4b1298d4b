use std::{cmp::Ordering, mem};

use crate::{
    heap::Heap,
    order::{float_midpoint, inverted, natural},
};

/// Comparator type the tracker builds its two heaps with
type Order<T> = fn(&T, &T) -> Ordering;

/// Plain function pointer form of an average function
///
/// Used by the [`Default`] tracker, and handy for naming tracker types.
pub type Midpoint<T> = fn(&T, &T) -> T;

/// Which phase the stream is in, by parity of the number of values seen
#[derive(Debug, Clone)]
enum Phase<T> {
    /// Even count (including zero): the halves are the same size and there is no middle value
    Even,
    /// Odd count: the halves are the same size and this is the single middle value
    Odd(T),
}

/// Where a new value lands relative to the two halves when the count is even
enum Slot {
    Lower,
    Between,
    Upper,
}

/// Exact running median of a stream of values
///
/// Values are added one at a time with [`Self::add_num`], and the median of everything seen so far
/// can be read at any time with [`Self::find_median`].
///
/// Internally the values are split into a lower half, kept in a max-heap, and an upper half, kept in a min-heap.
/// Both halves always hold the same number of values. When the count is odd, the one value left over is the
/// median itself, and is held on its own as the pivot.
/// When the count is even, the median is the average of the two heap tops, computed with the
/// average function supplied at construction.
///
/// Adding a value costs O(log n), and reading the median is O(1).
///
/// Values only need [`PartialOrd`]. Pairs that cannot be compared (such as `NaN`) are treated as equal,
/// so such a stream never panics, but its median is unspecified.
#[derive(Debug, Clone)]
pub struct MedianTracker<T, A> {
    /// Max-heap holding the smaller half of the values
    lower_max: Heap<T, Order<T>>,
    /// Min-heap holding the larger half of the values
    upper_min: Heap<T, Order<T>>,
    phase: Phase<T>,
    /// Midpoint of two values, used only when the count is even
    ///
    /// For any `a <= b`, `average(a, b)` must lie between `a` and `b`.
    average: A,

    /// Total values added
    count: u64,
}

impl Default for MedianTracker<f64, Midpoint<f64>> {
    /// Initializes an empty tracker for `f64` values, averaging with [`float_midpoint`]
    fn default() -> Self {
        Self::new(float_midpoint::<f64>)
    }
}

impl<T, A> MedianTracker<T, A>
where
    T: PartialOrd,
    A: Fn(&T, &T) -> T,
{
    /// Constructs an empty tracker
    ///
    /// `average` is used to combine the two middle values when the count is even.
    /// See [`crate::order`] for stock choices.
    pub fn new(average: A) -> Self {
        Self::with_capacity(average, 0)
    }

    /// Constructs an empty tracker with room for `capacity` values before reallocating
    pub fn with_capacity(average: A, capacity: usize) -> Self {
        let half = capacity / 2;

        Self {
            lower_max: Heap::with_capacity(inverted::<T> as Order<T>, half),
            upper_min: Heap::with_capacity(natural::<T> as Order<T>, half),
            phase: Phase::Even,
            average,
            count: 0,
        }
    }

    /// Total number of values added so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether no values have been added yet
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The single middle value, present only when the count is odd
    pub fn pivot(&self) -> Option<&T> {
        match &self.phase {
            Phase::Odd(pivot) => Some(pivot),
            Phase::Even => None,
        }
    }

    /// Sizes of the lower and upper halves, in that order
    pub fn half_sizes(&self) -> (usize, usize) {
        (self.lower_max.size(), self.upper_min.size())
    }

    /// Processes a new value in the stream, updating the running median
    pub fn add_num(&mut self, value: T) {
        self.phase = match mem::replace(&mut self.phase, Phase::Even) {
            Phase::Even => Phase::Odd(self.take_pivot(value)),
            Phase::Odd(pivot) => {
                // Split the pivot and the new value across the two halves
                if natural(&value, &pivot) != Ordering::Greater {
                    self.lower_max.add(value);
                    self.upper_min.add(pivot);
                } else {
                    self.lower_max.add(pivot);
                    self.upper_min.add(value);
                }

                Phase::Even
            }
        };
        self.count += 1;

        #[cfg(feature = "log")]
        log::trace!(
            "Added value number {}: {}",
            self.count,
            match self.phase {
                Phase::Odd(_) => "median is the pivot",
                Phase::Even => "median is the average of the halves",
            }
        );
    }

    /// Picks the new pivot out of `value` and the two halves, when the count is even
    ///
    /// Whatever is not chosen stays in (or goes into) the half it belongs to, so the halves remain the same size.
    fn take_pivot(&mut self, value: T) -> T {
        let slot = match (self.lower_max.peek_top(), self.upper_min.peek_top()) {
            (Ok(left), Ok(right)) => {
                if natural(&value, left) != Ordering::Greater {
                    Slot::Lower
                } else if natural(&value, right) == Ordering::Less {
                    Slot::Between
                } else {
                    Slot::Upper
                }
            }
            // Nothing seen yet, so the first value is the pivot
            _ => Slot::Between,
        };

        match slot {
            // The largest of the lower half moves out to be the pivot
            Slot::Lower => self.lower_max.push_pop(value),
            Slot::Between => value,
            // The smallest of the upper half moves out to be the pivot
            Slot::Upper => self.upper_min.push_pop(value),
        }
    }

    /// Gets the median of the values added so far
    ///
    /// Returns [`None`] if nothing has been added yet.
    /// Never modifies the tracker.
    pub fn find_median(&self) -> Option<T>
    where
        T: Clone,
    {
        match &self.phase {
            Phase::Odd(pivot) => Some(pivot.clone()),
            Phase::Even => {
                let left = self.lower_max.peek_top().ok()?;
                let right = self.upper_min.peek_top().ok()?;

                Some((self.average)(left, right))
            }
        }
    }

    /// Gets the median of the values added so far, or `T::default()` if nothing has been added yet
    pub fn median_or_default(&self) -> T
    where
        T: Clone + Default,
    {
        self.find_median().unwrap_or_default()
    }

    /// Checks every structural invariant of the tracker
    ///
    /// Both heaps must be consistent and the same size, the count must match their contents,
    /// and the lower top, the pivot, and the upper top must be in order.
    /// This is O(n), and is meant for tests and debug assertions.
    pub fn is_consistent(&self) -> bool {
        let (lower_len, upper_len) = self.half_sizes();
        let odd = matches!(self.phase, Phase::Odd(_));

        if !self.lower_max.is_consistent() || !self.upper_min.is_consistent() || lower_len != upper_len {
            return false;
        }
        if self.count != (lower_len + upper_len) as u64 + odd as u64 {
            return false;
        }

        let in_order = |a: Option<&T>, b: Option<&T>| match (a, b) {
            (Some(a), Some(b)) => natural(a, b) != Ordering::Greater,
            _ => true,
        };
        let lower = self.lower_max.peek_top().ok();
        let upper = self.upper_min.peek_top().ok();

        match &self.phase {
            Phase::Odd(pivot) => in_order(lower, Some(pivot)) && in_order(Some(pivot), upper),
            Phase::Even => in_order(lower, upper),
        }
    }

    /// Consumes the tracker, returning every value added in non-decreasing order
    pub fn into_sorted_vec(self) -> Vec<T> {
        let mut sorted = self.lower_max.into_sorted_vec();
        sorted.reverse();

        if let Phase::Odd(pivot) = self.phase {
            sorted.push(pivot);
        }
        sorted.extend(self.upper_min.into_sorted_vec());

        sorted
    }
}

impl<T, A> Extend<T> for MedianTracker<T, A>
where
    T: PartialOrd,
    A: Fn(&T, &T) -> T,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add_num(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs::File,
        io::{BufRead, BufReader},
    };

    use super::*;
    use crate::order::integer_midpoint;

    /// Median of the full sample stream
    const EXPECTED_MEDIAN: f64 = 67.;

    fn float_tracker() -> MedianTracker<f64, Midpoint<f64>> {
        MedianTracker::default()
    }

    fn load_test_data() -> Vec<f64> {
        let mut data = Vec::with_capacity(161);
        let f = BufReader::new(File::open("./test_data/sample_stream.txt").unwrap());

        for line in f.lines() {
            let v: f64 = line.unwrap().trim().parse().unwrap();
            data.push(v);
        }

        data
    }

    /// Median of `seen` by sorting it, using `average` for even counts
    fn sorted_median<T: PartialOrd + Clone>(seen: &[T], average: impl Fn(&T, &T) -> T) -> Option<T> {
        let mut sorted = seen.to_vec();
        sorted.sort_by(natural::<T>);

        let n = sorted.len();
        match n {
            0 => None,
            _ if n % 2 == 1 => Some(sorted[n / 2].clone()),
            _ => Some(average(&sorted[n / 2 - 1], &sorted[n / 2])),
        }
    }

    #[test]
    fn no_data() {
        let tracker = float_tracker();

        assert_eq!(tracker.find_median(), None);
        assert_eq!(tracker.median_or_default(), 0.);
        assert_eq!(tracker.count(), 0);
        assert!(tracker.is_empty());
        assert!(tracker.is_consistent());
    }

    #[test]
    fn one_data() {
        let mut tracker = float_tracker();
        tracker.add_num(42.);

        assert_eq!(tracker.find_median(), Some(42.));
        assert_eq!(tracker.pivot(), Some(&42.));
        assert_eq!(tracker.half_sizes(), (0, 0));
        assert_eq!(tracker.count(), 1);
    }

    #[test]
    fn odd_count_scenario() {
        let mut tracker = float_tracker();
        let mut medians = Vec::new();

        for v in [5., 2., 8.] {
            tracker.add_num(v);
            medians.push(tracker.find_median());
        }

        assert_eq!(medians, vec![Some(5.), Some(3.5), Some(5.)]);
        assert_eq!(tracker.pivot(), Some(&5.));
        assert_eq!(tracker.half_sizes(), (1, 1));
    }

    #[test]
    fn duplicates() {
        let mut tracker = MedianTracker::new(integer_midpoint::<i32>);

        for _ in 0..4 {
            tracker.add_num(3);
            assert_eq!(tracker.find_median(), Some(3));
            assert!(tracker.is_consistent());
        }
    }

    #[test]
    fn value_between_halves_becomes_pivot() {
        let mut tracker = MedianTracker::new(integer_midpoint::<i32>);
        tracker.extend([10, 20]);
        tracker.add_num(15);

        assert_eq!(tracker.pivot(), Some(&15));
        assert_eq!(tracker.half_sizes(), (1, 1));
    }

    #[test]
    fn value_below_lower_half_promotes_its_top() {
        let mut tracker = MedianTracker::new(integer_midpoint::<i32>);
        tracker.extend([10, 20, 30, 40]);
        tracker.add_num(1);

        assert_eq!(tracker.pivot(), Some(&20));
        assert_eq!(tracker.find_median(), Some(20));
        assert!(tracker.is_consistent());
    }

    #[test]
    fn value_above_upper_half_promotes_its_top() {
        let mut tracker = MedianTracker::new(integer_midpoint::<i32>);
        tracker.extend([10, 20, 30, 40]);
        tracker.add_num(100);

        assert_eq!(tracker.pivot(), Some(&30));
        assert!(tracker.is_consistent());
    }

    #[test]
    fn ties_with_halves() {
        let mut tracker = MedianTracker::new(integer_midpoint::<i32>);
        tracker.extend([10, 20]);

        // Equal to the lower top goes through the lower half
        tracker.add_num(10);
        assert_eq!(tracker.pivot(), Some(&10));
        tracker.add_num(20);
        assert_eq!(tracker.find_median(), Some(15));

        // Equal to the upper top goes through the upper half
        tracker.add_num(20);
        assert_eq!(tracker.pivot(), Some(&20));
        assert!(tracker.is_consistent());
        assert_eq!(tracker.into_sorted_vec(), vec![10, 10, 20, 20, 20]);
    }

    #[test]
    fn sample_stream_matches_sorting() {
        let data = load_test_data();
        let mut tracker = MedianTracker::with_capacity(float_midpoint::<f64>, data.len());

        for (i, v) in data.iter().enumerate() {
            tracker.add_num(*v);

            assert!(tracker.is_consistent());
            assert_eq!(tracker.find_median(), sorted_median(&data[..=i], float_midpoint::<f64>));
        }

        assert_eq!(tracker.count(), 161);
        assert_eq!(tracker.find_median(), Some(EXPECTED_MEDIAN));
    }

    #[test]
    fn sample_stream_first_ten() {
        let mut tracker = float_tracker();
        tracker.extend(load_test_data().into_iter().take(10));

        assert_eq!(tracker.find_median(), Some(69.5));
    }

    #[test]
    fn into_sorted_vec_returns_everything() {
        let data = load_test_data();
        let mut tracker = float_tracker();
        tracker.extend(data.iter().copied());

        let mut expected = data;
        expected.sort_by(natural::<f64>);

        assert_eq!(tracker.into_sorted_vec(), expected);
    }

    #[test]
    fn custom_average() {
        // Lower median instead of the mean
        let mut tracker = MedianTracker::new(|a: &i32, _: &i32| *a);
        tracker.extend([4, 1, 3, 2]);

        assert_eq!(tracker.find_median(), Some(2));
    }

    /// Ordered by `key` only, so equal keys can still be told apart by `id`
    #[derive(Debug, Clone, Copy)]
    struct Keyed {
        key: i32,
        id: u32,
    }

    impl PartialEq for Keyed {
        fn eq(&self, other: &Self) -> bool {
            self.key == other.key
        }
    }

    impl PartialOrd for Keyed {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            self.key.partial_cmp(&other.key)
        }
    }

    #[test]
    fn tie_with_lower_half_promotes_its_top() {
        let mut tracker = MedianTracker::new(|a: &Keyed, _: &Keyed| *a);
        tracker.add_num(Keyed { key: 1, id: 1 });
        tracker.add_num(Keyed { key: 5, id: 2 });
        tracker.add_num(Keyed { key: 1, id: 3 });

        assert_eq!(tracker.pivot().map(|k| k.id), Some(1));
        assert!(tracker.is_consistent());
    }

    #[test]
    fn tie_with_upper_half_promotes_its_top() {
        let mut tracker = MedianTracker::new(|a: &Keyed, _: &Keyed| *a);
        tracker.add_num(Keyed { key: 1, id: 1 });
        tracker.add_num(Keyed { key: 5, id: 2 });
        tracker.add_num(Keyed { key: 5, id: 3 });

        assert_eq!(tracker.pivot().map(|k| k.id), Some(2));
        assert!(tracker.is_consistent());
    }

    #[test]
    fn extreme_floats_average_stays_finite() {
        let mut tracker = float_tracker();
        tracker.extend([-1.5e308, 1.5e308]);

        let median = tracker.find_median().unwrap();
        assert!((-1.5e308..=1.5e308).contains(&median));
    }

    #[test]
    fn nan_does_not_panic() {
        let mut tracker = float_tracker();
        tracker.extend([1., f64::NAN, 3., 2.]);

        assert_eq!(tracker.count(), 4);
        assert!(tracker.find_median().is_some());
    }
}
