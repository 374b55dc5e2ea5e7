/// Outcome of reading one key.
///
/// `Corrupt` is kept apart from `Missing` so it can be logged and counted;
/// callers that do not care collapse both with [`Lookup::found`].
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<E> {
    Found(E),
    Missing,
    Corrupt,
}

impl<E> Lookup<E> {
    pub fn found(self) -> Option<E> {
        match self {
            Lookup::Found(entity) => Some(entity),
            Lookup::Missing | Lookup::Corrupt => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Lookup::Corrupt)
    }
}
