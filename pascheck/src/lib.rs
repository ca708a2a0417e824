//! Проверка программ на учебном паскалеподобном языке: лексика, синтаксис,
//! области видимости и типы присваиваний.

pub mod diagnostic;
pub mod dictionary;
pub mod error;
pub mod parser;
pub mod scope;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use dictionary::{Category, Dictionary};
pub use error::{CheckError, DictionaryError};
pub use parser::{Analyzer, Lexeme, check, tokenize};
pub use scope::{DataType, ScopeTable};
pub use span::Position;
