use std::fmt;
use std::iter::Peekable;

use tracing::debug;

use crate::dictionary::{Category, Dictionary};
use crate::span::Position;

/// Маркер перевода строки в нормализованном тексте.
const NEW_LINE: &str = "\n";

/// Составные операторы, которые нельзя разрывать пробелом.
const TWO_CHAR_OPERATORS: [&str; 4] = [">=", "<=", "<>", ":="];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub text: String,
    pub category: Category,
    pub position: Position,
}

impl Lexeme {
    pub fn new(text: impl Into<String>, category: Category, position: Position) -> Self {
        Self {
            text: text.into(),
            category,
            position,
        }
    }

    /// Фиктивная лексема "конец ввода", чтобы правилам было на что ссылаться.
    pub fn end_of_input(after: Option<&Lexeme>) -> Self {
        let position = match after {
            Some(last) => Position::new(last.position.row, last.position.col + last.text.chars().count()),
            None => Position::default(),
        };
        Self::new("", Category::Unclassified, position)
    }

    pub fn is(&self, category: Category, text: &str) -> bool {
        self.category == category && self.text == text
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" of type <{}>", self.text, self.category)
    }
}

/// Расставляет пробелы вокруг знаков, приводит переводы строк к одному маркеру.
pub fn normalize(source: &str) -> String {
    let mut out = String::with_capacity(source.len() * 2);
    let mut chars = source.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' | '\n' => {
                // \r\n и \n\r - один перевод строки
                let pair = if ch == '\r' { '\n' } else { '\r' };
                if chars.peek() == Some(&pair) {
                    chars.next();
                }
                out.push(' ');
                out.push_str(NEW_LINE);
                out.push(' ');
            }
            ',' | ';' | '[' | ']' | '{' | '}' | '(' | ')' | '+' | '-' | '*' | '/' | '<' | '>' | '=' | ':' => {
                push_operator(&mut out, ch, &mut chars);
            }
            c if c.is_whitespace() => out.push(' '),
            c => out.push(c),
        }
    }

    collapse_spaces(&out)
}

fn push_operator<I: Iterator<Item = char>>(out: &mut String, ch: char, chars: &mut Peekable<I>) {
    if let Some(&next) = chars.peek() {
        let pair: String = [ch, next].iter().collect();
        if TWO_CHAR_OPERATORS.contains(&pair.as_str()) {
            chars.next();
            out.push(' ');
            out.push_str(&pair);
            out.push(' ');
            return;
        }
    }
    // одиночное двоеточие остаётся частью слова
    if ch == ':' {
        out.push(ch);
        return;
    }
    out.push(' ');
    out.push(ch);
    out.push(' ');
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for ch in text.chars() {
        if ch == ' ' {
            if !prev_space {
                out.push(ch);
            }
            prev_space = true;
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out
}

/// Текст -> последовательность классифицированных лексем.
pub fn tokenize(source: &str, dictionary: &Dictionary) -> Vec<Lexeme> {
    let normalized = normalize(source);
    let mut lexemes = Vec::new();
    let mut row = 1;
    let mut col = 1;

    for word in normalized.split(' ') {
        if word.is_empty() {
            continue;
        }
        if word == NEW_LINE {
            row += 1;
            col = 1;
            continue;
        }

        let category = dictionary.classify(word);
        lexemes.push(Lexeme::new(word, category, Position::new(row, col)));
        col += word.chars().count();
    }

    debug!(lexemes = lexemes.len(), rows = row, "tokenized source");
    lexemes
}
