use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use super::lexer::Lexeme;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::dictionary::Category;
use crate::scope::{BlockId, BlockKind, DataType, ScopeTable};

/// Глубже этого вложенность операторов и `[ ]` не разбираем. Каждый уровень
/// тела `while`/`for`/`if` стоит нескольких кадров стека, граница держит
/// разбор в 2 МиБ стека потока даже в отладочной сборке.
pub const MAX_NESTING: usize = 48;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-ZА-Яа-яЁё][a-zA-ZА-Яа-яЁё0-9_]*$").expect("valid regex"));

pub(super) const IF: &str = "if";
pub(super) const THEN: &str = "then";
pub(super) const ELSE: &str = "else";
pub(super) const FOR: &str = "for";
pub(super) const TO: &str = "to";
pub(super) const DO: &str = "do";
pub(super) const OPEN_PAREN: &str = "(";
pub(super) const CLOSE_PAREN: &str = ")";

/// Результат правила: `Err` останавливает весь разбор.
pub(super) type Flow<T = ()> = Result<T, Diagnostic>;

pub(super) fn is_identifier(word: &str) -> bool {
    IDENTIFIER.is_match(word) && DataType::of_literal(word).is_none()
}

#[derive(Debug, Clone, Copy, Default)]
struct OperatorContext {
    /// внутри ветки `if`, `else` здесь возвращает управление условию
    in_conditional: bool,
    depth: usize,
}

impl OperatorContext {
    fn nested(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    fn branch(self) -> Self {
        Self {
            in_conditional: true,
            depth: self.depth + 1,
        }
    }
}

/// Рекурсивный спуск по лексемам с одновременным ведением таблицы областей.
///
/// Разбор останавливается на первом нарушении, поэтому за один прогон
/// набирается не больше одной диагностики.
pub struct Analyzer<'a> {
    pub(super) lexemes: &'a [Lexeme],
    pub(super) cursor: usize,
    scope: ScopeTable,
    diagnostics: Vec<Diagnostic>,
    eof: Lexeme,
}

impl<'a> Analyzer<'a> {
    pub fn new(lexemes: &'a [Lexeme]) -> Self {
        Self {
            lexemes,
            cursor: 0,
            scope: ScopeTable::new(),
            diagnostics: Vec::new(),
            eof: Lexeme::end_of_input(lexemes.last()),
        }
    }

    /// Каждый запуск начинает с чистого курсора, таблицы и списка ошибок.
    pub fn analyze(&mut self) -> &[Diagnostic] {
        self.cursor = 0;
        self.scope = ScopeTable::new();
        self.diagnostics.clear();

        if let Err(diagnostic) = self.program() {
            debug!(
                message = %diagnostic.kind,
                row = diagnostic.lexeme.position.row,
                col = diagnostic.lexeme.position.col,
                "analysis halted"
            );
            self.diagnostics.push(diagnostic);
        }
        &self.diagnostics
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn scope(&self) -> &ScopeTable {
        &self.scope
    }

    // Program := ProgramHeader VarSection BeginSection EndSection
    fn program(&mut self) -> Flow {
        self.skip_comments()?;
        self.program_header()?;
        self.var_section()?;
        self.begin_section()?;
        self.end_section()
    }

    fn program_header(&mut self) -> Flow {
        if !self.peek_is(Category::ProgramKeyword) {
            return self.fail(DiagnosticKind::MissingProgram);
        }
        self.bump();
        self.scope.open_block(BlockKind::Program, BlockId::GLOBAL);
        self.skip_comments()
    }

    /// `var` можно повторять, в том числе на месте оператора.
    fn var_section(&mut self) -> Flow {
        while self.peek_is(Category::VarKeyword) {
            self.bump();
            self.skip_comments()?;
            let ty = self.type_name()?;
            self.variable(ty)?;
            while self.peek_is(Category::Comma) {
                self.bump();
                self.skip_comments()?;
                self.variable(ty)?;
            }
            if self.peek_is(Category::Semicolon) {
                self.bump();
                self.skip_comments()?;
            }
        }
        Ok(())
    }

    fn type_name(&mut self) -> Flow<DataType> {
        let lexeme = self.peek();
        let ty = match lexeme.category {
            Category::DataType => lexeme.text.parse::<DataType>().ok(),
            _ => None,
        };
        match ty {
            Some(ty) => {
                self.bump();
                self.skip_comments()?;
                Ok(ty)
            }
            None => self.fail(DiagnosticKind::UnknownDataType),
        }
    }

    fn variable(&mut self, ty: DataType) -> Flow {
        let lexeme = self.peek().clone();
        if !is_identifier(&lexeme.text) {
            return self.fail(DiagnosticKind::BadVariableName);
        }
        if lexeme.category != Category::Unclassified {
            return self.fail(DiagnosticKind::ReservedVariableName);
        }
        let Some(block) = self.scope.current() else {
            return self.fail(DiagnosticKind::GlobalDeclaration);
        };
        if self.scope.declare(block, &lexeme.text, ty).is_err() {
            return Err(Diagnostic::new(DiagnosticKind::AlreadyDeclared, lexeme));
        }
        trace!(name = %lexeme.text, %ty, block = %self.scope.block(block).kind, "declared");
        self.bump();
        self.skip_comments()
    }

    // BeginSection := 'begin' Operator (';' Operator)*
    fn begin_section(&mut self) -> Flow {
        self.skip_comments()?;
        if !self.peek_is(Category::Begin) {
            return self.fail(DiagnosticKind::AwaitedName("begin"));
        }
        self.bump();
        let parent = self.scope.current().unwrap_or(BlockId::GLOBAL);
        self.scope.open_block(BlockKind::Begin, parent);

        let ctx = OperatorContext::default();
        self.operator(ctx)?;
        self.absorb_comment_behind()?;
        while self.peek_is(Category::Semicolon) {
            self.bump();
            self.operator(ctx)?;
            self.absorb_comment_behind()?;
        }
        Ok(())
    }

    fn end_section(&mut self) -> Flow {
        self.skip_comments()?;
        if !self.peek_is(Category::End) {
            return self.fail(DiagnosticKind::AwaitedName("end"));
        }
        self.bump();
        self.scope.close_block();
        self.skip_comments()?;
        if !self.at_end() {
            return self.fail(DiagnosticKind::TrailingAfterEnd);
        }
        Ok(())
    }

    /// Один оператор. Внутри `[ ]` операторы идут без разделителей,
    /// поэтому разбор продолжается, пока текущий блок составной.
    fn operator(&mut self, ctx: OperatorContext) -> Flow {
        if !self.statement(ctx)? {
            return Ok(());
        }
        while self.in_compound() {
            if !self.statement(ctx)? {
                break;
            }
        }
        Ok(())
    }

    /// `Ok(false)` - оператор пустой, ничего не съедено.
    fn statement(&mut self, ctx: OperatorContext) -> Flow<bool> {
        if ctx.depth + self.compound_depth() > MAX_NESTING {
            return self.fail(DiagnosticKind::NestingTooDeep);
        }
        self.skip_comments()?;
        self.var_section()?;

        let category = self.peek().category;
        self.trace_statement();

        if self.at_end() {
            return self.empty_statement();
        }
        match category {
            Category::End => self.empty_statement(),
            Category::CompoundOpen => {
                self.bump();
                let parent = self.scope.current().unwrap_or(BlockId::GLOBAL);
                self.scope.open_block(BlockKind::Compound(0), parent);
                Ok(true)
            }
            Category::CompoundClose => {
                if !self.in_compound() {
                    return self.fail(DiagnosticKind::UnexpectedCompoundEnd);
                }
                self.bump();
                self.scope.close_block();
                self.skip_comments()?;
                Ok(true)
            }
            Category::ConditionalCycle => {
                self.bump();
                self.comparison()?;
                self.expect(Category::CycleDo, DO)?;
                self.operator(ctx.nested())?;
                Ok(true)
            }
            Category::Cycle => {
                if !self.peek().is(Category::Cycle, FOR) {
                    return self.fail(DiagnosticKind::UnexpectedWord);
                }
                self.bump();
                self.skip_comments()?;
                self.assignment()?;
                self.expect(Category::Cycle, TO)?;
                self.comparison()?;
                self.expect(Category::CycleDo, DO)?;
                self.operator(ctx.nested())?;
                Ok(true)
            }
            Category::Read => {
                self.bump();
                self.expect(Category::Parenthesis, OPEN_PAREN)?;
                self.read_target()?;
                while self.peek_is(Category::Comma) {
                    self.bump();
                    self.skip_comments()?;
                    self.read_target()?;
                }
                self.expect(Category::Parenthesis, CLOSE_PAREN)?;
                Ok(true)
            }
            Category::Write => {
                self.bump();
                self.expect(Category::Parenthesis, OPEN_PAREN)?;
                self.comparison()?;
                while self.peek_is(Category::Comma) {
                    self.bump();
                    self.skip_comments()?;
                    self.comparison()?;
                }
                self.expect(Category::Parenthesis, CLOSE_PAREN)?;
                Ok(true)
            }
            Category::Unclassified => {
                self.assignment()?;
                Ok(true)
            }
            Category::Conditional => {
                if self.peek().is(Category::Conditional, IF) {
                    self.if_statement(ctx)?;
                    Ok(true)
                } else if ctx.in_conditional && self.peek().is(Category::Conditional, ELSE) {
                    Ok(false)
                } else {
                    self.fail(DiagnosticKind::UnexpectedConditional)
                }
            }
            Category::ProgramKeyword
            | Category::VarKeyword
            | Category::DataType
            | Category::Begin
            | Category::Comment
            | Category::Comma
            | Category::Semicolon
            | Category::Appropriation
            | Category::CycleDo
            | Category::Parenthesis
            | Category::Relation
            | Category::LogicalOr
            | Category::LogicalAnd
            | Category::Addition
            | Category::Multiplication
            | Category::Unary => self.fail(DiagnosticKind::UnexpectedWord),
        }
    }

    /// `end` или конец ввода: на уровне `begin` это пустой оператор,
    /// внутри `[ ]` - незакрытый блок.
    fn empty_statement(&self) -> Flow<bool> {
        if self.in_compound() {
            return self.fail(DiagnosticKind::AwaitedName("]"));
        }
        Ok(false)
    }

    fn if_statement(&mut self, ctx: OperatorContext) -> Flow {
        self.bump();
        self.comparison()?;
        self.expect(Category::Conditional, THEN)?;
        self.operator(ctx.branch())?;
        self.skip_comments()?;
        if self.peek().is(Category::Conditional, ELSE) {
            self.bump();
            self.operator(ctx.nested())?;
        }
        Ok(())
    }

    /// Присваивание: имя, `:=`/`as`, выражение нужного типа.
    fn assignment(&mut self) -> Flow {
        let target = match self.peek().category {
            Category::Unclassified => self.resolve(&self.peek().text),
            _ => None,
        };
        let Some(ty) = target else {
            return self.fail(DiagnosticKind::UndefinedAssignmentTarget);
        };
        self.bump();
        self.skip_comments()?;
        if !self.peek_is(Category::Appropriation) {
            return self.fail(DiagnosticKind::AwaitedAppropriation);
        }
        self.bump();
        self.skip_comments()?;
        self.expression(Some(ty))
    }

    fn read_target(&mut self) -> Flow {
        let known = self.peek().category == Category::Unclassified && self.resolve(&self.peek().text).is_some();
        if !known {
            return self.fail(DiagnosticKind::UndefinedVariable);
        }
        self.bump();
        self.skip_comments()
    }

    // Вспомогательные методы

    pub(super) fn peek(&self) -> &Lexeme {
        self.lexemes.get(self.cursor).unwrap_or(&self.eof)
    }

    pub(super) fn peek_is(&self, category: Category) -> bool {
        !self.at_end() && self.peek().category == category
    }

    pub(super) fn bump(&mut self) {
        self.cursor = (self.cursor + 1).min(self.lexemes.len());
    }

    pub(super) fn at_end(&self) -> bool {
        self.cursor >= self.lexemes.len()
    }

    pub(super) fn fail<T>(&self, kind: DiagnosticKind) -> Flow<T> {
        Err(Diagnostic::new(kind, self.peek().clone()))
    }

    fn expect(&mut self, category: Category, word: &'static str) -> Flow {
        self.skip_comments()?;
        if !self.peek().is(category, word) {
            return self.fail(DiagnosticKind::AwaitedWord(word));
        }
        self.bump();
        self.skip_comments()
    }

    pub(super) fn resolve(&self, name: &str) -> Option<DataType> {
        self.scope.current().and_then(|block| self.scope.resolve(block, name))
    }

    fn in_compound(&self) -> bool {
        matches!(self.scope.current_kind(), BlockKind::Compound(_))
    }

    fn compound_depth(&self) -> usize {
        self.scope.current().map_or(0, |block| self.scope.compound_depth(block))
    }

    // отдельно, чтобы поля события не раздували кадр рекурсивного `statement`
    #[inline(never)]
    fn trace_statement(&self) {
        let lexeme = self.peek();
        trace!(word = %lexeme.text, category = %lexeme.category, row = lexeme.position.row, "statement");
    }
}
