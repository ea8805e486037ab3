//! GLOB pattern helpers for positional predicates.

/// Escapes the GLOB metacharacters `*`, `?` and `[` so `text` matches
/// itself literally.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '*' => out.push_str("[*]"),
            '?' => out.push_str("[?]"),
            '[' => out.push_str("[[]"),
            c => out.push(c),
        }
    }
    out
}

pub fn prefix(text: &str) -> String {
    format!("{}*", escape(text))
}

pub fn suffix(text: &str) -> String {
    format!("*{}", escape(text))
}

pub fn infix(text: &str) -> String {
    format!("*{}*", escape(text))
}

pub fn reversed(text: &str) -> String {
    text.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metacharacters_are_escaped() {
        assert_eq!(escape("a*b?c[d]"), "a[*]b[?]c[[]d]");
        assert_eq!(prefix("ssa"), "ssa*");
        assert_eq!(infix("?"), "*[?]*");
        assert_eq!(reversed("ssä"), "äss");
        assert_eq!(reversed("autossa"), "assotua");
    }
}
