use cinder::interpreter::lexer::{TokenKind, serialize, tokenize};
use proptest::prelude::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).unwrap().into_iter().map(|token| token.kind).collect()
}

/// Source fragments that each lex to exactly one token.
fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,6}",
        (0..1_000_000i64).prop_map(|n| n.to_string()),
        (0..10_000u32, 0..100u32).prop_map(|(whole, frac)| format!("{whole}.{frac}")),
        "[0-9]{1,20}\\.[0-9]{0,20}",
        (0..12usize, 1..1_000u32).prop_map(|(zeros, digits)| {
                                     format!("0.{}{digits}", "0".repeat(zeros))
                                 }),
        (1..1_000u32, 0..30usize).prop_map(|(digits, zeros)| {
                                     format!("{digits}{}.0", "0".repeat(zeros))
                                 }),
        "'[a-z \"]{0,8}'",
        "\"[a-z ']{0,8}\"",
        prop::sample::select(vec!["+", "-", "*", "/", "%", "++", "--", "&", "|", "^", "~", "<<",
                                  ">>", "&&", "||", "!", "<", "<=", ">", ">=", "==", "!=", "=",
                                  "+=", "-=", "*=", "/=", "%=", "<<=", ">>=", "&=", "|=", "^=",
                                  "(", ")", "[", "]", "{", "}", ";", ",", ".", ":", "?", "if",
                                  "else", "while", "for", "break", "continue", "return",
                                  "function", "true", "false"]).prop_map(str::to_string),
    ]
}

proptest! {
    #[test]
    fn serialized_tokens_lex_to_the_same_tokens(parts in prop::collection::vec(fragment(), 0..40)) {
        let source = parts.join(" ");
        let first = kinds(&source);

        let reserialized = serialize(&tokenize(&source).unwrap());
        prop_assert_eq!(kinds(&reserialized), first);
    }
}

#[test]
fn comments_and_whitespace_do_not_survive_serialization() {
    let source = "x = 1; // one\n/* two */ y = 'a b';";
    let serialized = serialize(&tokenize(source).unwrap());

    assert!(!serialized.contains("one"));
    assert_eq!(kinds(&serialized), kinds(source));
}
