/// Observable state of one query key.
///
/// `Pending` is both the initial state and the state while a request is in
/// flight; `Success` and `Failure` are terminal for a given attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QueryStatus<V, E> {
    #[default]
    Pending,
    Success(V),
    Failure(E),
}

impl<V, E> QueryStatus<V, E> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Failure(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> QueryStatus<U, E> {
        match self {
            Self::Pending => QueryStatus::Pending,
            Self::Success(value) => QueryStatus::Success(f(value)),
            Self::Failure(err) => QueryStatus::Failure(err),
        }
    }
}

impl<V, E> From<Result<V, E>> for QueryStatus<V, E> {
    fn from(result: Result<V, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Failure(err),
        }
    }
}
