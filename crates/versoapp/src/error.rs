use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersoError {
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Module is not readable (locked or access denied): {0}")]
    ModuleNotReadable(String),

    #[error("Unknown book: {0}")]
    UnknownBook(String),

    #[error("Reference out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Module {0} does not carry Strong's annotations")]
    StrongsUnavailable(String),

    #[error("A search is already running on this client")]
    OperationInProgress,

    #[error("Malformed lexicon entry: {0}")]
    MalformedLexiconEntry(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Book {book} is not part of module {module}")]
    BookAbsent { module: String, book: String },

    #[error("Operation not supported for {kind} module {module}")]
    UnsupportedModuleType { module: String, kind: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<confique::Error> for VersoError {
    fn from(err: confique::Error) -> Self {
        VersoError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VersoError>;
