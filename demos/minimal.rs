//! A basic example showing minimal usage
//!
//! We construct a [`MedianTracker`], fill it with data, and then read out the median

use heapmedian::{MedianTracker, Midpoint};

/// Some sample data to calculate the median for
///
/// In practice, this will probably be a much larger stream
/// Note that the exact median is 44.5
const DATA: [f64; 15] = [
    18.6, 83.1, 21.5, 21.4, 63.4, 64.1, 4.6, 92.7, 31.1, 94.8, 2.4, 44.5, 70.0, 17.1, 61.0,
];

fn main() {
    // The default tracker takes f64 values, and averages the two middle values of an even count
    let mut tracker = MedianTracker::<f64, Midpoint<f64>>::default();

    // Read data points from our data source, and fold them into the tracker
    for data_point in DATA {
        tracker.add_num(data_point);
    }

    // Get our answer
    let median = tracker.median_or_default();
    println!("The median is: {median}");
}
