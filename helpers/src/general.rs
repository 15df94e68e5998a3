use std::error::Error;
use std::fmt;

/// InputValueError is used if some input value does not fulfill the posed requirements, e.g., a
/// snapshot pointing at a session that does not exist.
#[derive(Debug, Clone)]
pub struct InputValueError;

impl fmt::Display for InputValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid input value")
    }
}

impl Error for InputValueError {}

#[derive(Debug, Clone, Copy)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// argsort returns the indices that would sort an array. The sort is stable, i.e. equal values
/// keep their original order.
pub fn argsort<T: std::cmp::PartialOrd>(x: &[T], order: SortOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..x.len()).collect();
    match order {
        SortOrder::Ascending => {
            indices.sort_by(|&a, &b| x[a].partial_cmp(&x[b]).unwrap_or(std::cmp::Ordering::Equal))
        }
        SortOrder::Descending => {
            indices.sort_by(|&a, &b| x[b].partial_cmp(&x[a]).unwrap_or(std::cmp::Ordering::Equal))
        }
    }
    indices
}

/// ordinal returns the number with its ordinal suffix, e.g. 1st, 22nd, 111st. Only 11, 12 and 13
/// are irregular, every other number takes the suffix of its last digit. Values below 1 are not
/// valid ranks and are shown as "-".
pub fn ordinal(num: i32) -> String {
    if num <= 0 {
        return "-".to_owned();
    }

    let suffix = match (num, num % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{}{}", num, suffix)
}

/// round_fixed formats x with exactly `decimals` decimal places.
pub fn round_fixed(x: f64, decimals: u8) -> String {
    format!("{:.*}", decimals as usize, x)
}
