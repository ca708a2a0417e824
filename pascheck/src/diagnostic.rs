use thiserror::Error;

use crate::parser::lexer::Lexeme;

/// Класс нарушения.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Lexical,
    Declarative,
    Referential,
    Syntactic,
}

/// Текст сообщения. Формулировки (вместе с опечатками) сохранены как есть,
/// по ним сверяют вывод.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    #[error("Missing comments opening")]
    MissingCommentOpening,
    #[error("Missing comments closing")]
    MissingCommentClosing,

    #[error("Missing program initialization")]
    MissingProgram,
    #[error("Unknown data type")]
    UnknownDataType,
    #[error("Missing variable name or name is incorrect")]
    BadVariableName,
    #[error("Variable declared by system")]
    ReservedVariableName,
    #[error("Variables declaration on global state")]
    GlobalDeclaration,
    #[error("Already declared at state block")]
    AlreadyDeclared,

    #[error("Underfined variable intitilization")]
    UndefinedAssignmentTarget,
    #[error("Variable not defined")]
    UndefinedVariable,
    #[error("Incorrect value type")]
    IncorrectValueType,

    #[error("Unexpected name, awaited: {0}")]
    AwaitedName(&'static str),
    #[error("Unexpected word, awaited: {0}")]
    AwaitedWord(&'static str),
    #[error("Unexpected, awaited appropriation: as")]
    AwaitedAppropriation,
    #[error("Unexpected compound end")]
    UnexpectedCompoundEnd,
    #[error("Unexpected conditional statement")]
    UnexpectedConditional,
    #[error("Unexpected word")]
    UnexpectedWord,
    #[error("Unexpected expressions, after program end")]
    TrailingAfterEnd,
    #[error("Nesting is too deep")]
    NestingTooDeep,
}

impl DiagnosticKind {
    pub fn class(&self) -> Class {
        match self {
            Self::MissingCommentOpening | Self::MissingCommentClosing => Class::Lexical,
            Self::MissingProgram
            | Self::UnknownDataType
            | Self::BadVariableName
            | Self::ReservedVariableName
            | Self::GlobalDeclaration
            | Self::AlreadyDeclared => Class::Declarative,
            Self::UndefinedAssignmentTarget | Self::UndefinedVariable | Self::IncorrectValueType => {
                Class::Referential
            }
            Self::AwaitedName(_)
            | Self::AwaitedWord(_)
            | Self::AwaitedAppropriation
            | Self::UnexpectedCompoundEnd
            | Self::UnexpectedConditional
            | Self::UnexpectedWord
            | Self::TrailingAfterEnd
            | Self::NestingTooDeep => Class::Syntactic,
        }
    }
}

/// Одно нарушение и лексема, на которой оно найдено.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error: {kind}, At: {}\n\tWhile reading {}", .lexeme.position, .lexeme)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub lexeme: Lexeme,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, lexeme: Lexeme) -> Self {
        Self { kind, lexeme }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Category;
    use crate::span::Position;

    #[test]
    fn renders_message_position_and_lexeme() {
        let lexeme = Lexeme::new("foo", Category::Unclassified, Position::new(3, 12));
        let diagnostic = Diagnostic::new(DiagnosticKind::UnknownDataType, lexeme);
        assert_eq!(
            diagnostic.to_string(),
            "Error: Unknown data type, At: (row:3, col:12)\n\tWhile reading \"foo\" of type <wtf>"
        );
    }

    #[test]
    fn awaited_messages_carry_the_expected_word() {
        assert_eq!(DiagnosticKind::AwaitedName("begin").to_string(), "Unexpected name, awaited: begin");
        assert_eq!(DiagnosticKind::AwaitedWord("(").to_string(), "Unexpected word, awaited: (");
        assert_eq!(DiagnosticKind::AwaitedWord("do").class(), Class::Syntactic);
        assert_eq!(DiagnosticKind::MissingCommentClosing.class(), Class::Lexical);
    }
}
