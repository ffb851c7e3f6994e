use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to parse {file}: {cause}")]
    SourceParse { file: PathBuf, cause: String },

    #[error("failed to set parser language: {language}")]
    LanguageSetup { language: String },
}

impl ScanError {
    pub fn source_parse(file: impl Into<PathBuf>, cause: impl Into<String>) -> Self {
        Self::SourceParse {
            file: file.into(),
            cause: cause.into(),
        }
    }

    pub fn language_setup(language: impl Into<String>) -> Self {
        Self::LanguageSetup {
            language: language.into(),
        }
    }
}
