//! A more fully-fledged example, showcasing integer data, a custom average, and the other methods on [`MedianTracker`]

use heapmedian::{order::integer_midpoint, MedianTracker};

/// Some sample data to calculate the median for
const DATA: [i64; 12] = [155, 66, 114, 0, 60, 73, 109, 26, 154, 0, 107, 75];

fn main() {
    // Integer averages round down, and never overflow
    // We know roughly how much data is coming, so we reserve space up front
    let mut tracker = MedianTracker::with_capacity(integer_midpoint::<i64>, DATA.len());

    for data_point in DATA {
        tracker.add_num(data_point);

        // The median is available after every point, and reading it never changes the tracker
        if let Some(median) = tracker.find_median() {
            println!("After {} points the median is {median}", tracker.count());
        }

        // With an odd count the median is a value from the stream, held on its own
        if let Some(pivot) = tracker.pivot() {
            println!("  the middle value is {pivot}");
        } else {
            let (lower, upper) = tracker.half_sizes();
            println!("  averaging the tops of halves of size {lower} and {upper}");
        }
    }

    // Any function can combine the two middle values, for instance one that always takes the lower one
    let mut lower_median = MedianTracker::new(|a: &i64, _: &i64| *a);
    lower_median.extend(DATA);
    println!("Lower median: {:?}", lower_median.find_median());

    // Once we're done, we can get everything back in order
    println!("Sorted data: {:?}", tracker.into_sorted_vec());
}
