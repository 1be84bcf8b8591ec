use thiserror::Error;

/// Failures of the battery-backed save store.
///
/// Corrupted replicas are not errors on their own; only a slot with no
/// surviving replica reports [`SaveError::DeedsNotRecorded`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("no replica of slot {0} passed its checksum; the deeds were not recorded")]
    DeedsNotRecorded(usize),

    #[error("save slot {0} does not exist")]
    SlotOutOfRange(usize),

    #[error("save slot {0} is empty")]
    SlotEmpty(usize),

    #[error("save slot {0} already holds an adventure log")]
    SlotOccupied(usize),

    #[error("battery image must be {expected} bytes, got {actual}")]
    BatterySize { expected: usize, actual: usize },
}

/// Parse failures for host scripts, with 1-based line numbers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: unknown button `{button}`")]
    UnknownButton { line: usize, button: String },

    #[error("line {line}: invalid count `{value}`")]
    InvalidCount { line: usize, value: String },

    #[error("line {line}: `{command}` needs an argument")]
    MissingArgument { line: usize, command: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[cfg(feature = "snapshot-postcard")]
    #[error("snapshot encoding error: {0}")]
    Snapshot(#[from] postcard::Error),
}
