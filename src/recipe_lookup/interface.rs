pub trait RecipeLookup {
    /// `name` is a canonical ingredient name. Unknown names yield an empty list.
    fn lookup(&self, name: &str) -> Vec<String>;
}
