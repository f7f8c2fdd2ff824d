/// Ordinal scope of a hierarchical identifier
///
/// Each scope assigns first-seen-order ordinals, rendered zero-padded to a
/// fixed width. Composite identifiers concatenate the ordinals of all
/// enclosing scopes in the order subject → session → series → image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentityScope {
    Subject,
    Session,
    Series,
    Image,
}

impl IdentityScope {
    /// Number of digits an ordinal of this scope is padded to
    pub const fn width(&self) -> usize {
        match self {
            IdentityScope::Subject => 5,
            IdentityScope::Session => 2,
            IdentityScope::Series => 2,
            IdentityScope::Image => 3,
        }
    }

    /// Renders an ordinal with this scope's fixed width
    pub fn format_ordinal(&self, ordinal: usize) -> String {
        format!("{:0width$}", ordinal, width = self.width())
    }
}
