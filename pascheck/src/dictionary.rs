use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::error::{CheckError, DictionaryError};

const BUILTIN_TABLE: &str = include_str!("../data/dictionary.json");

static BUILTIN: Lazy<Dictionary> = Lazy::new(|| {
    Dictionary::from_json(BUILTIN_TABLE).expect("embedded data/dictionary.json must be a valid table")
});

/// Грамматическая роль лексемы. Имена в serde совпадают с ключами словаря.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Category {
    #[serde(rename = "program")]
    ProgramKeyword,
    #[serde(rename = "var")]
    VarKeyword,
    #[serde(rename = "data types")]
    DataType,
    #[serde(rename = "begin")]
    Begin,
    #[serde(rename = "end")]
    End,
    #[serde(rename = "comments")]
    Comment,
    #[serde(rename = "comma")]
    Comma,
    #[serde(rename = "semicolon")]
    Semicolon,
    #[serde(rename = "appropriation")]
    Appropriation,
    #[serde(rename = "compound open")]
    CompoundOpen,
    #[serde(rename = "compound close")]
    CompoundClose,
    #[serde(rename = "conditional")]
    Conditional,
    #[serde(rename = "conditional cycle")]
    ConditionalCycle,
    #[serde(rename = "cycle")]
    Cycle,
    #[serde(rename = "cycle do")]
    CycleDo,
    #[serde(rename = "read")]
    Read,
    #[serde(rename = "write")]
    Write,
    #[serde(rename = "parenthesis")]
    Parenthesis,
    #[serde(rename = "relation")]
    Relation,
    #[serde(rename = "logical or")]
    LogicalOr,
    #[serde(rename = "logical and")]
    LogicalAnd,
    #[serde(rename = "addition")]
    Addition,
    #[serde(rename = "multiplication")]
    Multiplication,
    #[serde(rename = "unary")]
    Unary,
    /// Всё, чего нет в словаре: имена, числа, true/false и мусор.
    #[serde(skip_deserializing)]
    Unclassified,
}

impl Category {
    /// Категории, которые обязаны быть в словаре.
    pub const REQUIRED: [Category; 24] = [
        Category::ProgramKeyword,
        Category::VarKeyword,
        Category::DataType,
        Category::Begin,
        Category::End,
        Category::Comment,
        Category::Comma,
        Category::Semicolon,
        Category::Appropriation,
        Category::CompoundOpen,
        Category::CompoundClose,
        Category::Conditional,
        Category::ConditionalCycle,
        Category::Cycle,
        Category::CycleDo,
        Category::Read,
        Category::Write,
        Category::Parenthesis,
        Category::Relation,
        Category::LogicalOr,
        Category::LogicalAnd,
        Category::Addition,
        Category::Multiplication,
        Category::Unary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ProgramKeyword => "program",
            Self::VarKeyword => "var",
            Self::DataType => "data types",
            Self::Begin => "begin",
            Self::End => "end",
            Self::Comment => "comments",
            Self::Comma => "comma",
            Self::Semicolon => "semicolon",
            Self::Appropriation => "appropriation",
            Self::CompoundOpen => "compound open",
            Self::CompoundClose => "compound close",
            Self::Conditional => "conditional",
            Self::ConditionalCycle => "conditional cycle",
            Self::Cycle => "cycle",
            Self::CycleDo => "cycle do",
            Self::Read => "read",
            Self::Write => "write",
            Self::Parenthesis => "parenthesis",
            Self::Relation => "relation",
            Self::LogicalOr => "logical or",
            Self::LogicalAnd => "logical and",
            Self::Addition => "addition",
            Self::Multiplication => "multiplication",
            Self::Unary => "unary",
            Self::Unclassified => "wtf",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Таблица категория -> слова. Порядок категорий берётся из файла,
/// при совпадении слова в нескольких категориях побеждает первая.
#[derive(Debug, Clone)]
pub struct Dictionary {
    table: IndexMap<Category, Vec<String>>,
}

impl Dictionary {
    /// Словарь, встроенный в бинарник.
    pub fn builtin() -> &'static Dictionary {
        &BUILTIN
    }

    pub fn from_json(json: &str) -> Result<Self, DictionaryError> {
        let table: IndexMap<Category, Vec<String>> = serde_json::from_str(json)?;
        if let Some(category) = Category::REQUIRED.into_iter().find(|c| !table.contains_key(c)) {
            return Err(DictionaryError::MissingCategory { category });
        }
        Ok(Self { table })
    }

    pub fn load(path: &Path) -> Result<Self, CheckError> {
        let json = std::fs::read_to_string(path).map_err(|source| CheckError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_json(&json)?)
    }

    pub fn classify(&self, word: &str) -> Category {
        self.table
            .iter()
            .find(|(_, words)| words.iter().any(|w| w == word))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Unclassified)
    }

    pub fn words(&self, category: Category) -> &[String] {
        self.table.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn categories(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.table.iter().map(|(category, words)| (*category, words.as_slice()))
    }
}
