use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid header mapping in {file} line {line}: {message}")]
    Mapping {
        file: String,
        line: usize,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}
