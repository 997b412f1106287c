use crate::error::ModelConfigError;
use crate::label::canonicalize;
use crate::recipe_lookup::interface::RecipeLookup;
use std::collections::HashMap;
use std::path::Path;

const BUILT_IN_RECIPES: &str = "
# ingredient: recipe | recipe
apple: Apple Pie | Apple Crumble | Waldorf Salad
banana: Banana Bread | Banana Pancakes | Banana Smoothie
tomato: Tomato Soup | Bruschetta | Shakshuka
red onion: French Onion Soup | Pickled Red Onions | Onion Bhaji
basil: Pesto Genovese | Caprese Salad | Thai Basil Chicken
potato: Mashed Potatoes | Potato Gratin | Patatas Bravas
carrot: Carrot Cake | Glazed Carrots | Carrot Ginger Soup
garlic: Garlic Bread | Aglio e Olio | Roasted Garlic Hummus
lemon: Lemon Tart | Lemon Chicken | Lemonade
mushroom: Mushroom Risotto | Stuffed Mushrooms | Mushroom Stroganoff
";

#[derive(Debug, Clone, Default)]
pub struct RecipeLookupStatic {
    recipes: HashMap<String, Vec<String>>,
}

impl RecipeLookupStatic {
    pub fn built_in() -> Self {
        Self::from_text(BUILT_IN_RECIPES)
    }

    /// Parses `name: title | title` lines. Blank lines and `#` comments are skipped;
    /// names are canonicalized like labels.
    pub fn from_text(text: &str) -> Self {
        let mut recipes: HashMap<String, Vec<String>> = HashMap::new();

        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((name, titles)) = line.split_once(':') else {
                continue;
            };

            recipes.entry(canonicalize(name)).or_default().extend(
                titles
                    .split('|')
                    .map(str::trim)
                    .filter(|title| !title.is_empty())
                    .map(str::to_string),
            );
        }

        Self { recipes }
    }

    pub fn load(path: &Path) -> Result<Self, ModelConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ModelConfigError::Recipes(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_text(&text))
    }
}

impl RecipeLookup for RecipeLookupStatic {
    fn lookup(&self, name: &str) -> Vec<String> {
        self.recipes.get(name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text() {
        let lookup = RecipeLookupStatic::from_text(
            "# comment\n\nTomato: Soup | Salsa |\n 4 Basil : Pesto\nbroken line\n",
        );

        assert_eq!(lookup.lookup("tomato"), vec!["Soup", "Salsa"]);
        assert_eq!(lookup.lookup("basil"), vec!["Pesto"]);
    }

    #[test]
    fn test_repeated_names_are_merged_in_order() {
        let lookup = RecipeLookupStatic::from_text("apple: Pie\napple: Crumble");

        assert_eq!(lookup.lookup("apple"), vec!["Pie", "Crumble"]);
    }

    #[test]
    fn test_unknown_name_is_empty() {
        let lookup = RecipeLookupStatic::built_in();

        assert!(lookup.lookup("dragon fruit").is_empty());
    }

    #[test]
    fn test_lookup_is_exact_on_canonical_names() {
        let lookup = RecipeLookupStatic::built_in();

        assert_eq!(lookup.lookup("red onion").len(), 3);
        assert!(lookup.lookup("Red Onion").is_empty());
    }
}
