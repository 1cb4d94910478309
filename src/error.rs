use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("File '{}' does not exist.", .0.display())]
    MissingSource(PathBuf),
    #[error(
        "Cannot parse ctx.transform() in '{}'. Please ungroup path to remove transformation.",
        .0.display()
    )]
    UnresolvedTransform(PathBuf),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Could not run converter '{program}': {source}")]
    Converter {
        program: String,
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
