use pascheck::{Analyzer, Dictionary, check, tokenize};
use proptest::prelude::*;

const VALID: &str = "program var int x ; begin x := 5 ; end";

fn word() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "program", "var", "int", "float", "bool", "begin", "end", "{", "}", ",", ";", ":=", "as", "[", "]",
        "if", "then", "else", "while", "for", "to", "do", "read", "write", "(", ")", "=", "<", ">=", "and",
        "or", "not", "+", "-", "*", "/", "x", "y", "1", "2.5", "true",
    ])
}

/// Текст комментария без фигурных скобок.
fn comment_body() -> impl Strategy<Value = String> {
    "[a-z0-9 ;:=+\\[\\]()]{0,30}"
}

proptest! {
    #[test]
    fn arbitrary_text_never_panics(source in any::<String>()) {
        let diagnostics = check(&source, Dictionary::builtin());
        prop_assert!(diagnostics.len() <= 1);
    }

    #[test]
    fn token_soup_reports_at_most_one_and_is_stable(words in prop::collection::vec(word(), 0..60)) {
        let source = words.join(" ");
        let lexemes = tokenize(&source, Dictionary::builtin());
        let mut analyzer = Analyzer::new(&lexemes);
        let first = analyzer.analyze().to_vec();
        let second = analyzer.analyze().to_vec();
        prop_assert!(first.len() <= 1);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn balanced_comment_is_transparent(body in comment_body()) {
        let source = format!("{{{body}}} {VALID}");
        prop_assert!(check(&source, Dictionary::builtin()).is_empty());

        let source = VALID.replace("begin", &format!("begin {{{body}}}"));
        prop_assert!(check(&source, Dictionary::builtin()).is_empty());
    }

    #[test]
    fn open_without_close_is_reported(body in comment_body()) {
        let source = format!("program {{ {body}");
        let diagnostics = check(&source, Dictionary::builtin());
        prop_assert_eq!(diagnostics.len(), 1);
        prop_assert_eq!(diagnostics[0].message(), "Missing comments closing");
    }

    #[test]
    fn bare_close_is_reported(body in comment_body()) {
        let source = format!("}} {body}");
        let diagnostics = check(&source, Dictionary::builtin());
        prop_assert_eq!(diagnostics.len(), 1);
        prop_assert_eq!(diagnostics[0].message(), "Missing comments opening");
    }
}
