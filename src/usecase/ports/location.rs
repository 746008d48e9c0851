/// Shareable location (the address bar in a browser). The controller only
/// reads and replaces query pairs; string mechanics live in the implementor.
pub trait LocationAccessor: Send + Sync {
    fn query_pairs(&self) -> Vec<(String, String)>;

    /// Replace the given keys, leaving any other pairs in place.
    fn replace_query_pairs(&self, pairs: &[(String, String)]);
}
