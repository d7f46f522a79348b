use thiserror::Error;

use crate::core::FsError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Fs(#[from] FsError),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn fs_error_keeps_its_message() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = AppError::from(FsError::List {
            path: PathBuf::from("/srv"),
            source,
        });

        assert_eq!(error.to_string(), "cannot list /srv: gone");
    }
}
