/// Progress report of one asynchronous catalog fetch.
///
/// `Loading` and `Error` may carry the last good value so a screen can keep
/// showing stale data while a retry is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    Loading(Option<T>),
    Success(T),
    Error { message: String, data: Option<T> },
}

impl<T> Resource<T> {
    pub fn loading() -> Self {
        Resource::Loading(None)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Resource::Error {
            message: message.into(),
            data: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading(_))
    }

    /// `Success` or `Error`: the value that ends a producer.
    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Loading(data) | Resource::Error { data, .. } => data.as_ref(),
            Resource::Success(data) => Some(data),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Resource::Loading(data) | Resource::Error { data, .. } => data,
            Resource::Success(data) => Some(data),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Resource::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Resource::Loading(data) => Resource::Loading(data.map(f)),
            Resource::Success(data) => Resource::Success(f(data)),
            Resource::Error { message, data } => Resource::Error {
                message,
                data: data.map(f),
            },
        }
    }
}
