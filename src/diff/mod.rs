//! Desired-versus-observed set difference shared by every grant collection

/// Items to add (`desired` minus `observed`) and to remove (`observed` minus `desired`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changes<T> {
    pub to_add: Vec<T>,
    pub to_remove: Vec<T>,
}

impl<T> Changes<T> {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

impl<T> Default for Changes<T> {
    fn default() -> Self {
        Self {
            to_add: Vec::new(),
            to_remove: Vec::new(),
        }
    }
}

/// Compute additions and removals under a caller-supplied equality.
///
/// Outputs keep the relative order of their source slice.
pub fn diff_by<T, F>(desired: &[T], observed: &[T], equal: F) -> Changes<T>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    let to_add = desired
        .iter()
        .filter(|d| !observed.iter().any(|o| equal(*d, o)))
        .cloned()
        .collect();
    let to_remove = observed
        .iter()
        .filter(|o| !desired.iter().any(|d| equal(d, *o)))
        .cloned()
        .collect();

    Changes { to_add, to_remove }
}

/// [`diff_by`] with plain equality, as used for privilege, role and LDAP group strings.
pub fn diff<T: Clone + PartialEq>(desired: &[T], observed: &[T]) -> Changes<T> {
    diff_by(desired, observed, |a, b| a == b)
}

/// A reference to a certificate, by identifier, by name, or both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CertificateRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Two references denote the same certificate when their identifiers match, or,
/// if either lacks an identifier, when their names match.
pub fn same_certificate(a: &CertificateRef, b: &CertificateRef) -> bool {
    match (&a.id, &b.id) {
        (Some(x), Some(y)) => x == y,
        _ => matches!((&a.name, &b.name), (Some(x), Some(y)) if x == y),
    }
}
