//! Таблица областей видимости.
//!
//! Блоки лежат в арене и адресуются индексом. Закрытые блоки не удаляются:
//! память растёт линейно с числом блоков в одной проверяемой программе.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

static FLOAT_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+$").expect("valid regex"));

/// Объявленный тип переменной.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    Float,
    Bool,
}

impl DataType {
    /// Проверка литерала чисто по написанию.
    pub fn accepts_literal(self, text: &str) -> bool {
        match self {
            Self::Int => !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()),
            Self::Float => FLOAT_LITERAL.is_match(text),
            Self::Bool => text == "true" || text == "false",
        }
    }

    /// Тип литерала, если слово вообще литерал.
    pub fn of_literal(text: &str) -> Option<Self> {
        [Self::Int, Self::Float, Self::Bool]
            .into_iter()
            .find(|ty| ty.accepts_literal(text))
    }
}

impl FromStr for DataType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" | "integer" => Ok(Self::Int),
            "float" | "real" => Ok(Self::Float),
            "bool" | "boolean" => Ok(Self::Bool),
            _ => Err(()),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(usize);

impl BlockId {
    pub const GLOBAL: BlockId = BlockId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Global,
    Program,
    Begin,
    /// `[ ... ]`, у каждого свой номер
    Compound(usize),
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Program => f.write_str("program"),
            Self::Begin => f.write_str("begin"),
            Self::Compound(n) => write!(f, "compound#{n}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    pub parent: Option<BlockId>,
    variables: IndexMap<String, DataType>,
}

impl Block {
    fn new(kind: BlockKind, parent: Option<BlockId>) -> Self {
        Self {
            kind,
            parent,
            variables: IndexMap::new(),
        }
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, DataType)> {
        self.variables.iter().map(|(name, ty)| (name.as_str(), *ty))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{name}` is already declared in block {block}")]
pub struct AlreadyDeclared {
    pub name: String,
    pub block: BlockKind,
}

/// Дерево блоков с корнем `global`. `current == None` - глобальное состояние,
/// ни один блок программы ещё не открыт.
#[derive(Debug, Clone)]
pub struct ScopeTable {
    blocks: Vec<Block>,
    current: Option<BlockId>,
    compounds: usize,
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTable {
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new(BlockKind::Global, None)],
            current: None,
            compounds: 0,
        }
    }

    pub fn current(&self) -> Option<BlockId> {
        self.current
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    pub fn current_kind(&self) -> BlockKind {
        self.current.map_or(BlockKind::Global, |id| self.block(id).kind)
    }

    /// Открывает блок внутри `parent` и делает его текущим.
    /// Для `[ ]` номер выдаётся здесь же, поэтому повторов не бывает.
    pub fn open_block(&mut self, kind: BlockKind, parent: BlockId) -> BlockId {
        let kind = match kind {
            BlockKind::Compound(_) => {
                self.compounds += 1;
                BlockKind::Compound(self.compounds)
            }
            other => other,
        };
        let id = BlockId(self.blocks.len());
        self.blocks.push(Block::new(kind, Some(parent)));
        self.current = Some(id);
        debug!(block = %kind, parent = %self.block(parent).kind, "open block");
        id
    }

    /// Возвращает текущим родителя закрываемого блока. Сам блок остаётся в арене.
    pub fn close_block(&mut self) {
        if let Some(id) = self.current {
            let parent = self.block(id).parent.filter(|p| *p != BlockId::GLOBAL);
            debug!(block = %self.block(id).kind, "close block");
            self.current = parent;
        }
    }

    /// Предки не проверяются: перекрытие имени во вложенном блоке разрешено.
    pub fn declare(&mut self, block: BlockId, name: &str, ty: DataType) -> Result<(), AlreadyDeclared> {
        let target = &mut self.blocks[block.0];
        if target.variables.contains_key(name) {
            return Err(AlreadyDeclared {
                name: name.to_string(),
                block: target.kind,
            });
        }
        target.variables.insert(name.to_string(), ty);
        Ok(())
    }

    /// Ищет имя от `block` вверх по родителям до корня.
    pub fn resolve(&self, block: BlockId, name: &str) -> Option<DataType> {
        let mut cursor = Some(block);
        while let Some(id) = cursor {
            let scope = self.block(id);
            if let Some(ty) = scope.variables.get(name) {
                return Some(*ty);
            }
            cursor = scope.parent;
        }
        None
    }

    /// Сколько блоков `[ ]` от `block` до корня, включая сам `block`.
    pub fn compound_depth(&self, block: BlockId) -> usize {
        let mut depth = 0;
        let mut cursor = Some(block);
        while let Some(id) = cursor {
            let scope = self.block(id);
            if matches!(scope.kind, BlockKind::Compound(_)) {
                depth += 1;
            }
            cursor = scope.parent;
        }
        depth
    }

    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks.iter().enumerate().map(|(i, b)| (BlockId(i), b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program_scope() -> (ScopeTable, BlockId) {
        let mut scope = ScopeTable::new();
        let program = scope.open_block(BlockKind::Program, BlockId::GLOBAL);
        (scope, program)
    }

    #[test]
    fn declare_rejects_duplicates_in_same_block() {
        let (mut scope, program) = program_scope();
        scope.declare(program, "x", DataType::Int).unwrap();
        let err = scope.declare(program, "x", DataType::Float).unwrap_err();
        assert_eq!(err.name, "x");
        assert_eq!(err.block, BlockKind::Program);
        assert_eq!(scope.resolve(program, "x"), Some(DataType::Int));
    }

    #[test]
    fn nested_block_shadows_and_restores() {
        let (mut scope, program) = program_scope();
        scope.declare(program, "x", DataType::Int).unwrap();
        let begin = scope.open_block(BlockKind::Begin, program);
        let inner = scope.open_block(BlockKind::Compound(0), begin);
        scope.declare(inner, "x", DataType::Bool).unwrap();

        assert_eq!(scope.resolve(inner, "x"), Some(DataType::Bool));
        scope.close_block();
        assert_eq!(scope.current(), Some(begin));
        assert_eq!(scope.resolve(begin, "x"), Some(DataType::Int));
    }

    #[test]
    fn resolve_walks_to_root_and_fails() {
        let (mut scope, program) = program_scope();
        let begin = scope.open_block(BlockKind::Begin, program);
        assert_eq!(scope.resolve(begin, "missing"), None);
    }

    #[test]
    fn compound_blocks_get_fresh_numbers() {
        let (mut scope, program) = program_scope();
        let a = scope.open_block(BlockKind::Compound(0), program);
        scope.close_block();
        let b = scope.open_block(BlockKind::Compound(0), program);
        assert_ne!(scope.block(a).kind, scope.block(b).kind);
        assert_eq!(scope.blocks().count(), 4);
    }

    #[test]
    fn closing_program_returns_to_global_state() {
        let (mut scope, _) = program_scope();
        scope.close_block();
        assert_eq!(scope.current(), None);
        assert_eq!(scope.current_kind(), BlockKind::Global);
    }

    #[test]
    fn literal_forms() {
        assert!(DataType::Int.accepts_literal("42"));
        assert!(!DataType::Int.accepts_literal("4.2"));
        assert!(!DataType::Int.accepts_literal(""));
        assert!(DataType::Float.accepts_literal("4.2"));
        assert!(!DataType::Float.accepts_literal("4."));
        assert!(DataType::Bool.accepts_literal("false"));
        assert!(!DataType::Bool.accepts_literal("1"));
        assert_eq!(DataType::of_literal("x"), None);
        assert_eq!(DataType::of_literal("7"), Some(DataType::Int));
    }

    #[test]
    fn compound_depth_counts_only_compounds() {
        let (mut scope, program) = program_scope();
        let begin = scope.open_block(BlockKind::Begin, program);
        let outer = scope.open_block(BlockKind::Compound(0), begin);
        let inner = scope.open_block(BlockKind::Compound(0), outer);
        assert_eq!(scope.compound_depth(BlockId::GLOBAL), 0);
        assert_eq!(scope.compound_depth(begin), 0);
        assert_eq!(scope.compound_depth(outer), 1);
        assert_eq!(scope.compound_depth(inner), 2);
    }
}
