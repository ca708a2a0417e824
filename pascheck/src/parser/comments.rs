use super::analyzer::{Analyzer, Flow};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::dictionary::Category;

const COMMENT_OPEN: &str = "{";
const COMMENT_CLOSE: &str = "}";

impl Analyzer<'_> {
    /// Пропускает комментарии под курсором. Вложенные `{` не считаются:
    /// комментарий закрывает первая же `}`. Подряд идущие комментарии
    /// пропускаются все.
    pub(super) fn skip_comments(&mut self) -> Flow {
        while !self.at_end() && self.peek().category == Category::Comment {
            if self.peek().text == COMMENT_CLOSE {
                return self.fail(DiagnosticKind::MissingCommentOpening);
            }
            let open = self.cursor;
            match self.lexemes[open + 1..]
                .iter()
                .position(|lexeme| lexeme.is(Category::Comment, COMMENT_CLOSE))
            {
                Some(offset) => self.cursor = open + offset + 2,
                None => return self.fail(DiagnosticKind::MissingCommentClosing),
            }
        }
        Ok(())
    }

    /// Смотрит на лексему прямо за курсором: если это `}` комментария перед
    /// разделителем, идёт назад до ближайшего маркера комментария, и это
    /// должна быть `{`. Курсор не двигается. Вызывается только из цикла
    /// `begin`.
    ///
    /// Проверка согласованности: `skip_comments` съедает `{ … }` целиком,
    /// поэтому при обычном разборе за `}` всегда стоит её `{`.
    pub(super) fn absorb_comment_behind(&self) -> Flow {
        let Some(behind) = self.cursor.checked_sub(1) else {
            return Ok(());
        };
        let Some(close) = self.lexemes.get(behind) else {
            return Ok(());
        };
        if !close.is(Category::Comment, COMMENT_CLOSE) {
            return Ok(());
        }
        let nearest = self.lexemes[..behind]
            .iter()
            .rev()
            .find(|lexeme| lexeme.category == Category::Comment);
        match nearest {
            Some(marker) if marker.text == COMMENT_OPEN => Ok(()),
            _ => Err(Diagnostic::new(DiagnosticKind::MissingCommentOpening, close.clone())),
        }
    }
}
