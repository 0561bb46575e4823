//! Fetch lifecycle state

/// Coarse lifecycle label, useful for logging and assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// `idle → loading → (success | error)`
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T, E> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(E),
}

impl<T, E> FetchState<T, E> {
    pub fn status(&self) -> FetchStatus {
        match self {
            Self::Idle => FetchStatus::Idle,
            Self::Loading => FetchStatus::Loading,
            Self::Success(_) => FetchStatus::Success,
            Self::Error(_) => FetchStatus::Error,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_follow_variant() {
        let ok: FetchState<u32, String> = FetchState::Success(7);
        assert_eq!(ok.data(), Some(&7));
        assert!(ok.error().is_none());
        assert_eq!(ok.status(), FetchStatus::Success);

        let err: FetchState<u32, String> = FetchState::Error("boom".into());
        assert_eq!(err.error().map(String::as_str), Some("boom"));
        assert!(!err.is_success());

        assert_eq!(FetchState::<u32, String>::default().status(), FetchStatus::Idle);
    }
}
