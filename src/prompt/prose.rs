//! 文本拼接辅助函数

/// 首字母大写, 其余小写
pub fn sentence_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// 仅首字母大写
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 去掉结尾的句号
pub fn strip_trailing_period(s: &str) -> &str {
    s.trim_end_matches('.')
}

/// 值是否被设置 (非空且不是参考图哨兵)
pub fn is_set(value: &str) -> bool {
    !value.trim().is_empty() && !crate::vocab::is_reference(value)
}

/// 以 ". " 拼接后的规范化
///
/// 折叠 ".." 与 ". .", 去掉首尾空白, 非空时保证以句号结尾。
/// 对自身输出再次调用不会产生变化。
pub fn normalize_sentences(s: &str) -> String {
    let mut text = s.to_string();
    loop {
        let collapsed = text.replace("..", ".").replace(". .", ".");
        if collapsed == text {
            break;
        }
        text = collapsed;
    }

    let mut text = text.trim().to_string();
    if !text.is_empty() && !text.ends_with('.') {
        text.push('.');
    }
    text
}

/// 保证以句号结尾
pub fn ensure_period(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() || s.ends_with('.') {
        s.to_string()
    } else {
        format!("{s}.")
    }
}

/// 列表连接: "X", "X and Y", "X, Y, and Z"
pub fn join_series<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [one] => one.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [head @ .., last] => {
            let head = head.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ");
            format!("{head}, and {}", last.as_ref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_helpers() {
        assert_eq!(sentence_case("UPPER body Portrait"), "Upper body portrait");
        assert_eq!(upper_first("cinematic teal-Orange"), "Cinematic teal-Orange");
        assert_eq!(sentence_case(""), "");
        assert_eq!(upper_first(""), "");
    }

    #[test]
    fn test_normalize_collapses_and_terminates() {
        assert_eq!(normalize_sentences("A.. B. . C"), "A. B. C.");
        assert_eq!(normalize_sentences("A...."), "A.");
        assert_eq!(normalize_sentences("  "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["A. . . B", "x.. . .y ", "Photo of her. . ", "plain", ". ."] {
            let once = normalize_sentences(input);
            assert_eq!(normalize_sentences(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_join_series() {
        assert_eq!(join_series::<&str>(&[]), "");
        assert_eq!(join_series(&["boots"]), "boots");
        assert_eq!(join_series(&["jeans", "boots"]), "jeans and boots");
        assert_eq!(join_series(&["a", "b", "c", "d"]), "a, b, c, and d");
    }
}
