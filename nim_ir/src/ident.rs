//! Identifier legality rules of the output language.
//!
//! Nim only allows plain identifiers that start with a letter, contain no doubled underscores
//! and don't collide with a keyword. Everything else has to be stropped in backquotes. C++ names
//! break all three rules routinely, so rendering goes through here.

/// The substitute for the C++ `::` qualifier separator. Folding a qualified name into a single
/// identifier keeps it addressable by one sym; the substitute is not a legal plain identifier
/// character, so folded names always render stropped.
pub const QUALIFIER_SUB: char = '\u{b7}'; // ·

/// The placeholder glyph for underscore patterns Nim forbids (leading or doubled underscores).
pub const UNDERSCORE_SUB: char = '\u{2cd}'; // ˍ

/// Returns `true` if `name` is a reserved word of the output language.
pub fn is_reserved(name: &str) -> bool {
    matches!(
        name,
        "addr"
            | "and"
            | "as"
            | "asm"
            | "bind"
            | "block"
            | "break"
            | "case"
            | "cast"
            | "concept"
            | "const"
            | "continue"
            | "converter"
            | "defer"
            | "discard"
            | "distinct"
            | "div"
            | "do"
            | "elif"
            | "else"
            | "end"
            | "enum"
            | "except"
            | "export"
            | "finally"
            | "for"
            | "from"
            | "func"
            | "if"
            | "import"
            | "in"
            | "include"
            | "interface"
            | "is"
            | "isnot"
            | "iterator"
            | "let"
            | "macro"
            | "method"
            | "mixin"
            | "mod"
            | "nil"
            | "not"
            | "notin"
            | "object"
            | "of"
            | "or"
            | "out"
            | "proc"
            | "ptr"
            | "raise"
            | "ref"
            | "return"
            | "shl"
            | "shr"
            | "static"
            | "template"
            | "try"
            | "tuple"
            | "type"
            | "using"
            | "var"
            | "when"
            | "while"
            | "xor"
            | "yield"
    )
}

/// Folds a `::`-qualified name into a single identifier by replacing every separator with
/// [`QUALIFIER_SUB`].
pub fn fold_qualified(name: &str) -> String {
    name.replace("::", &QUALIFIER_SUB.to_string())
}

/// Rewrites the underscore patterns Nim forbids.
///
/// A run of underscores at the start of the name, and any run of two or more underscores, is
/// replaced by [`UNDERSCORE_SUB`] repeated to the run length. A single underscore in the middle
/// of a name is fine and kept as-is.
pub fn encode_underscores(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    let mut at_start = true;
    while let Some(c) = chars.next() {
        if c != '_' {
            out.push(c);
            at_start = false;
            continue;
        }
        let mut run = 1;
        while chars.peek() == Some(&'_') {
            chars.next();
            run += 1;
        }
        let sub = at_start || run >= 2;
        for _ in 0..run {
            out.push(if sub { UNDERSCORE_SUB } else { '_' });
        }
        at_start = false;
    }
    out
}

/// Returns `true` if `name` can not be rendered as a plain identifier and has to be stropped.
pub fn needs_stropping(name: &str) -> bool {
    if is_reserved(name) {
        return true;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return true,
    }
    !chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Renders a declaration name: underscore patterns are encoded first, then the result is
/// stropped if it isn't a legal plain identifier.
pub fn render(name: &str) -> String {
    let encoded = encode_underscores(name);
    if needs_stropping(&encoded) {
        format!("`{encoded}`")
    } else {
        encoded
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reserved_words_are_stropped() {
        assert_eq!(render("type"), "`type`");
        assert_eq!(render("ptr"), "`ptr`");
        assert_eq!(render("object"), "`object`");
    }

    #[test]
    fn clean_idents_are_untouched() {
        assert_eq!(render("add"), "add");
        assert_eq!(render("myValue2"), "myValue2");
        assert_eq!(render("snake_case"), "snake_case");
    }

    #[test]
    fn folded_names_are_stropped() {
        let folded = fold_qualified("std::vector");
        assert_eq!(folded, "std·vector");
        assert_eq!(render(&folded), "`std·vector`");
    }

    #[test]
    fn underscore_patterns_are_encoded() {
        assert_eq!(encode_underscores("_reserved"), "ˍreserved");
        assert_eq!(encode_underscores("__two"), "ˍˍtwo");
        assert_eq!(encode_underscores("a__b"), "aˍˍb");
        assert_eq!(encode_underscores("a_b"), "a_b");
        // Encoded names are no longer plain identifiers.
        assert_eq!(render("_reserved"), "`ˍreserved`");
    }

    #[test]
    fn leading_digits_are_stropped() {
        assert!(needs_stropping("3dPoint"));
        assert!(needs_stropping(""));
    }
}
