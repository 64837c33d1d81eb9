use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("State channel disconnected: {context}")]
    Disconnected { context: &'static str },
}

impl Error {
    pub fn disconnected(context: &'static str) -> Self {
        Self::Disconnected { context }
    }
}
