//! HTML 转义
//!
//! 页面中的属性值一律用双引号包裹，`encode_minimal` 足以覆盖正文和属性。

/// 转义用户输入后再拼进页面
pub fn escape(input: &str) -> String {
    htmlescape::encode_minimal(input)
}

/// `None` 为空串
pub fn escape_opt(input: Option<&str>) -> String {
    input.map(escape).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&lt;/a&gt;"
        );
        assert!(!escape("O'Neil").contains('\''));
        assert_eq!(escape("Gedimino pr. 9, Vilnius"), "Gedimino pr. 9, Vilnius");
        assert_eq!(escape_opt(None), "");
    }
}
