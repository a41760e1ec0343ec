use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("connection #{row} has {got} field(s); at least source and target are required")]
    TooFewFields {
        row: usize,
        got: usize,
    },

    #[error("connection #{row} has a negative delay ({delay})")]
    NegativeDelay {
        row:   usize,
        delay: f64,
    },

    #[error("connection #{row}: {what} {value} is not a valid neuron index")]
    InvalidIndex {
        row:   usize,
        what:  &'static str,
        value: f64,
    },

    #[error("connection file parse error: {0}")]
    Parse(String),

    #[error("connection rule error: {0}")]
    Rule(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ConnectResult<T> = Result<T, ConnectError>;
