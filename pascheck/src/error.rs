use std::path::PathBuf;

use thiserror::Error;

use crate::dictionary::Category;

/// Ошибки окружения: чтение файлов и загрузка словаря.
/// Ошибки в самой проверяемой программе сюда не попадают, это диагностики.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("IO error: {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),
}

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("malformed category table: {source}")]
    Malformed {
        #[from]
        source: serde_json::Error,
    },

    #[error("category \"{category}\" is missing from the table")]
    MissingCategory { category: Category },
}
