use super::analyzer::{Analyzer, Flow, is_identifier};
use crate::diagnostic::DiagnosticKind;
use crate::dictionary::Category;
use crate::scope::DataType;

/// Что стоит на месте операнда.
enum Term {
    Variable(DataType),
    Literal,
}

impl Analyzer<'_> {
    /// Comparison := Expression ((Relation | LogicalAnd | LogicalOr) Expression)*
    ///
    /// Условия не типизируются: годится любой литерал или известная переменная.
    pub(super) fn comparison(&mut self) -> Flow {
        self.expression(None)?;
        while matches!(
            self.peek().category,
            Category::Relation | Category::LogicalAnd | Category::LogicalOr
        ) && !self.at_end()
        {
            self.bump();
            self.skip_comments()?;
            self.expression(None)?;
        }
        Ok(())
    }

    /// Expression := Term ((Addition | Multiplication) Term)*
    ///
    /// С `expected` каждый операнд обязан совпасть с типом цели присваивания.
    pub(super) fn expression(&mut self, expected: Option<DataType>) -> Flow {
        self.term(expected)?;
        while matches!(self.peek().category, Category::Addition | Category::Multiplication) && !self.at_end() {
            self.bump();
            self.skip_comments()?;
            self.term(expected)?;
        }
        Ok(())
    }

    fn term(&mut self, expected: Option<DataType>) -> Flow {
        self.skip_comments()?;
        // знак перед операндом: not, +, -
        if matches!(self.peek().category, Category::Unary | Category::Addition) && !self.at_end() {
            self.bump();
            self.skip_comments()?;
        }

        let lexeme = self.peek();
        let term = match lexeme.category {
            Category::Unclassified if !self.at_end() => match self.resolve(&lexeme.text) {
                Some(ty) => Some(Term::Variable(ty)),
                None => DataType::of_literal(&lexeme.text).map(|_| Term::Literal),
            },
            _ => None,
        };

        let matches_expected = match term {
            None if lexeme.category == Category::Unclassified && is_identifier(&lexeme.text) => {
                return self.fail(DiagnosticKind::UndefinedVariable);
            }
            None => return self.fail(DiagnosticKind::AwaitedWord("variable or value")),
            Some(Term::Variable(ty)) => expected.is_none_or(|want| want == ty),
            Some(Term::Literal) => expected.is_none_or(|want| want.accepts_literal(&lexeme.text)),
        };
        if !matches_expected {
            return self.fail(DiagnosticKind::IncorrectValueType);
        }

        self.bump();
        self.skip_comments()
    }
}
