use serde::Serializer;

/// Lowercase the first character of `s`, e.g. `BookReview` -> `bookReview`.
pub(crate) fn lcfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Serialize whole, finite floats as integers so that counters such as
/// `itemsPerPage: 5.0` render as `5`.
pub(crate) fn serialize_number<S: Serializer>(
    value: &f64,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0. && value.abs() < u64::MAX as f64 {
        if *value >= 0. {
            return serializer.serialize_u64(*value as u64);
        }
        return serializer.serialize_i64(*value as i64);
    }

    serializer.serialize_f64(*value)
}
