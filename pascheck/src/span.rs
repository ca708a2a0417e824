use std::fmt;

/// Положение лексемы в исходнике. Строки и колонки считаются с единицы.
///
/// Колонка растёт на длину слова и не учитывает пробелы, которые
/// вставляет нормализация, поэтому это ориентир, а не точное смещение.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { row: 1, col: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row:{}, col:{})", self.row, self.col)
    }
}
