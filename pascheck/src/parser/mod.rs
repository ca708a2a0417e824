pub mod analyzer;
mod comments;
mod expression;
pub mod lexer;

pub use analyzer::{Analyzer, MAX_NESTING};
pub use lexer::{Lexeme, tokenize};

use crate::diagnostic::Diagnostic;
use crate::dictionary::Dictionary;

/// Главная функция проверки - из текста в список диагностик.
/// Пустой список означает, что программа корректна.
pub fn check(source: &str, dictionary: &Dictionary) -> Vec<Diagnostic> {
    let lexemes = tokenize(source, dictionary);
    let mut analyzer = Analyzer::new(&lexemes);
    analyzer.analyze().to_vec()
}
