/// Result of fetching records from the accelerator service.
///
/// `Disabled` and `Unavailable` are deliberately distinct: the former means the integration is turned
/// off (no records, by configuration), the latter that the data could not be obtained this time.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutcome<T> {
    Fetched(Vec<T>),
    Disabled,
    Unavailable,
}

impl<T> FetchOutcome<T> {
    /// Collapses the outcome into the legacy nullable form: an empty list when disabled and `None`
    /// when unavailable.
    pub fn records(self) -> Option<Vec<T>> {
        match self {
            FetchOutcome::Fetched(records) => Some(records),
            FetchOutcome::Disabled => Some(vec![]),
            FetchOutcome::Unavailable => None,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            FetchOutcome::Fetched(records) => records,
            FetchOutcome::Disabled | FetchOutcome::Unavailable => &[],
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, FetchOutcome::Disabled)
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, FetchOutcome::Unavailable)
    }
}
