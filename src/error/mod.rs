mod expression;
mod scan;
mod selection;

pub use expression::{ExpressionError, END_OF_INPUT};
pub use scan::ScanError;
pub use selection::SelectionError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

pub type Result<T> = std::result::Result<T, Error>;
