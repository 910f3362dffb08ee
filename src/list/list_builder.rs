//! 布尔开关列表构建

use std::collections::HashMap;

/// 构建列表
///
/// 先按目录顺序收集开关为 true 的条目, 再按输入顺序追加非空的自定义行。
/// 缺失的开关视为 false。
pub fn build_list<S: AsRef<str>>(
    catalog: &[S],
    toggles: &HashMap<String, bool>,
    custom_entries: &str,
) -> (Vec<String>, usize) {
    let mut result = catalog
        .iter()
        .map(AsRef::as_ref)
        .filter(|item| toggles.get(*item).copied().unwrap_or(false))
        .map(str::to_string)
        .collect::<Vec<String>>();

    result.extend(
        custom_entries
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string),
    );

    let count = result.len();
    (result, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggles(on: &[&str], off: &[&str]) -> HashMap<String, bool> {
        on.iter()
            .map(|k| (k.to_string(), true))
            .chain(off.iter().map(|k| (k.to_string(), false)))
            .collect()
    }

    #[test]
    fn test_catalog_order_then_custom_lines() {
        let catalog = ["beach", "cafe", "gym", "pool"];
        let (list, count) = build_list(
            &catalog,
            &toggles(&["pool", "beach"], &["gym"]),
            "  rooftop bar \n\n\t\nsubway platform\n",
        );

        assert_eq!(list, vec!["beach", "pool", "rooftop bar", "subway platform"]);
        assert_eq!(count, list.len());
    }

    #[test]
    fn test_unknown_toggles_are_ignored() {
        let catalog = ["beach", "cafe"];
        let (list, count) = build_list(&catalog, &toggles(&["castle"], &[]), "");
        assert!(list.is_empty());
        assert_eq!(count, 0);
    }

    #[test]
    fn test_every_subset_keeps_catalog_order() {
        let catalog = ["a", "b", "c", "d"];
        for mask in 0u32..16 {
            let on = catalog
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, v)| *v)
                .collect::<Vec<_>>();
            let mut reversed = on.clone();
            reversed.reverse();

            let (list, count) = build_list(&catalog, &toggles(&reversed, &[]), "x");
            let mut expected = on.iter().map(|v| v.to_string()).collect::<Vec<_>>();
            expected.push("x".to_string());
            assert_eq!(list, expected);
            assert_eq!(count, expected.len());
        }
    }
}
