use model::{core::value::Value, execution::expr::CompareOp};
use std::cmp::Ordering;

/// Compares two cells. `None` when either side is null, which callers treat
/// as unknown rather than false.
pub(crate) fn compare(left: &Value, op: CompareOp, right: &Value) -> Option<bool> {
    if left.is_null() || right.is_null() {
        return None;
    }

    let ordering = left.compare(right).or_else(|| loose_compare(left, right))?;

    Some(match op {
        CompareOp::Equal => ordering == Ordering::Equal,
        CompareOp::NotEqual => ordering != Ordering::Equal,
        CompareOp::LessThan => ordering == Ordering::Less,
        CompareOp::GreaterThan => ordering == Ordering::Greater,
        CompareOp::LessOrEqual => ordering != Ordering::Greater,
        CompareOp::GreaterOrEqual => ordering != Ordering::Less,
    })
}

/// Mixed text and number cells: numerically when both parse, otherwise as
/// text.
fn loose_compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => l.partial_cmp(&r),
        _ => Some(left.as_string()?.cmp(&right.as_string()?)),
    }
}

pub(crate) fn is_member(value: &Value, set: &[Value]) -> Option<bool> {
    if value.is_null() {
        return None;
    }
    Some(
        set.iter()
            .any(|candidate| compare(value, CompareOp::Equal, candidate) == Some(true)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_numbers_and_text() {
        assert_eq!(
            compare(&Value::Int(10), CompareOp::GreaterThan, &Value::Float(9.5)),
            Some(true)
        );
        assert_eq!(
            compare(&Value::from("12"), CompareOp::Equal, &Value::Int(12)),
            Some(true)
        );
        assert_eq!(
            compare(&Value::from("Sing"), CompareOp::NotEqual, &Value::from("Plur")),
            Some(true)
        );
        assert_eq!(
            compare(&Value::Null, CompareOp::Equal, &Value::from("Sing")),
            None
        );
    }

    #[test]
    fn test_membership_with_null() {
        let set = vec![Value::from("Ill"), Value::from("Gen")];
        assert_eq!(is_member(&Value::from("Gen"), &set), Some(true));
        assert_eq!(is_member(&Value::from("Ine"), &set), Some(false));
        assert_eq!(is_member(&Value::Null, &set), None);
    }
}
