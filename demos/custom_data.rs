//! An example showcasing calculating the median on a dataset using a custom data type

use heapmedian::MedianTracker;

/// Our custom data type: a classification enum
///
/// Note that only [`Clone`] and [`PartialOrd`] are strictly necessary here
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    #[default]
    Low,
    Medium,
    High,
    VeryHigh,
}

/// There is no halfway point between two classes, so we settle on the lower one
fn lower_class(a: &Class, b: &Class) -> Class {
    *a.min(b)
}

/// Some sample data to calculate the median for
///
/// In practice, this will probably be a much larger stream
/// Note that the exact median is [`Class::Medium`]
const DATA: [Class; 15] = [
    Class::Medium,
    Class::Low,
    Class::High,
    Class::Medium,
    Class::Low,
    Class::Medium,
    Class::VeryHigh,
    Class::Medium,
    Class::High,
    Class::Low,
    Class::Medium,
    Class::VeryHigh,
    Class::High,
    Class::High,
    Class::Low,
];

fn main() {
    let mut tracker = MedianTracker::new(lower_class);

    // Read data points from our data source, and fold them into the tracker
    // It just works!
    for data_point in DATA {
        tracker.add_num(data_point);
    }

    let median = tracker.median_or_default();
    println!("The median is: {median:?}");
}
