//! Localized display strings for menu construction.

/// Given a resource name, returns an ordered mapping of item id to display
/// string. Menus are built from the returned order.
pub trait StringsOracle {
    /// Returns the strings of a resource, or `None` for an unknown name.
    fn strings(&self, resource: &str) -> Option<Vec<(String, String)>>;
}
