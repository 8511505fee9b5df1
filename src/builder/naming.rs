//! Identifier derivation for entity names

/// Lowercase, underscore separated token: `compounddefType` becomes
/// `compounddef_type`. The first character never gets a leading
/// underscore.
pub fn file_token(name: &str) -> String {
    let mut token = String::with_capacity(name.len() + 4);
    for (index, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if index > 0 {
                token.push('_');
            }
            token.extend(c.to_lowercase());
        } else {
            token.push(c);
        }
    }
    token
}

/// Class identifier: the first character upper-cased, the rest verbatim
pub fn class_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_token() {
        assert_eq!(file_token("compounddefType"), "compounddef_type");
        assert_eq!(file_token("DoxMemberKind"), "dox_member_kind");
        assert_eq!(file_token("docTitleCmdGroup"), "doc_title_cmd_group");
        assert_eq!(file_token("para"), "para");
    }

    #[test]
    fn test_class_name_preserves_the_rest() {
        assert_eq!(class_name("compounddefType"), "CompounddefType");
        assert_eq!(class_name("docTitleCmdGroup"), "DocTitleCmdGroup");
        assert_eq!(class_name("Memberdef"), "Memberdef");
        assert_eq!(class_name(""), "");
    }
}
