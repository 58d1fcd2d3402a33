//! 内置隐藏字符表（固定，不从文件加载）

/// 单个隐藏字符的规格：码点 + 实体写法 + 显示名称
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HiddenCharacterSpec {
    pub codepoint: char,
    pub entities: &'static [&'static str],
    pub name: &'static str,
}

/// 内置表。约束：码点唯一；实体字符串唯一且只对应一个码点。
pub const HIDDEN_CHARACTERS: &[HiddenCharacterSpec] = &[
    HiddenCharacterSpec {
        codepoint: '\u{202D}',
        entities: &["&lrm;", "&#x202D;"],
        name: "Left-to-right override (U+202D)",
    },
    HiddenCharacterSpec {
        codepoint: '\u{202C}',
        entities: &["&rlm;", "&#x202C;"],
        name: "Pop directional formatting (U+202C)",
    },
];

/// 按码点查表
pub fn lookup(ch: char) -> Option<&'static HiddenCharacterSpec> {
    HIDDEN_CHARACTERS.iter().find(|s| s.codepoint == ch)
}

/// 按实体文本查表：命名实体大小写敏感，数字实体大小写不敏感
pub fn lookup_entity(entity: &str) -> Option<&'static HiddenCharacterSpec> {
    let same = |e: &str| if e.starts_with("&#") { e.eq_ignore_ascii_case(entity) } else { e == entity };
    HIDDEN_CHARACTERS.iter().find(|s| s.entities.iter().any(|&e| same(e)))
}

/// 码点的显示名称（全函数）
/// - 表内码点返回表中名称
/// - 其他合法字符返回 "Unicode character: <字面量>"
/// - 非法标量值（代理区、越界）无法构成字面量，退回 U+XXXX 形式
pub fn describe(codepoint: u32) -> String {
    match char::from_u32(codepoint) {
        Some(ch) => match lookup(ch) {
            Some(spec) => spec.name.to_string(),
            None => format!("Unicode character: {ch}"),
        },
        None => format!("Unicode character: U+{codepoint:04X}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_codepoints_and_entities_are_unique() {
        let mut cps = HashSet::new();
        let mut ents = HashSet::new();
        for spec in HIDDEN_CHARACTERS {
            assert!(cps.insert(spec.codepoint));
            for e in spec.entities {
                assert!(ents.insert(e.to_ascii_lowercase()), "duplicate entity {e}");
            }
        }
    }

    #[test]
    fn describe_known_codepoints() {
        assert_eq!(describe(0x202D), "Left-to-right override (U+202D)");
        assert_eq!(describe(0x202C), "Pop directional formatting (U+202C)");
    }

    #[test]
    fn describe_falls_back_to_literal() {
        assert_eq!(describe(0x0041), "Unicode character: A");
        assert_eq!(describe(0x200B), "Unicode character: \u{200B}");
    }

    #[test]
    fn describe_never_fails_on_invalid_scalars() {
        assert_eq!(describe(0xD800), "Unicode character: U+D800");
        assert_eq!(describe(0x110000), "Unicode character: U+110000");
    }

    #[test]
    fn lookup_entity_case_rules() {
        assert_eq!(lookup_entity("&#x202d;").map(|s| s.codepoint), Some('\u{202D}'));
        assert_eq!(lookup_entity("&#X202C;").map(|s| s.codepoint), Some('\u{202C}'));
        assert_eq!(lookup_entity("&rlm;").map(|s| s.codepoint), Some('\u{202C}'));
        assert!(lookup_entity("&RLM;").is_none());
        assert!(lookup_entity("&nbsp;").is_none());
    }
}
