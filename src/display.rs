use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayField {
    pub name: String,
    pub value: String,
}

/// A renderable card handed back to the chat integration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEntry {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<DisplayField>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub footer: Option<String>,
}

impl DisplayEntry {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(DisplayField {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Value of the first field with this name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

impl fmt::Display for DisplayEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        if let Some(image_url) = &self.image_url {
            writeln!(f, "[image] {}", image_url)?;
        }
        for field in &self.fields {
            writeln!(f, "{}", field.name.trim_end())?;
            for line in field.value.lines() {
                writeln!(f, "  {}", line)?;
            }
        }
        if let Some(footer) = &self.footer {
            writeln!(f, "-- {}", footer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_field_lookup() {
        let entry = DisplayEntry::titled("Pancakes")
            .with_image(Some("https://img/1.jpg".to_string()))
            .with_field("Missed ingredients: ", "Flour\nSugar")
            .with_footer("Data provided by Spoonacular");

        assert_eq!(entry.field("Missed ingredients: "), Some("Flour\nSugar"));
        assert_eq!(entry.field("Used ingredients: "), None);
        assert_eq!(entry.footer.as_deref(), Some("Data provided by Spoonacular"));
    }

    #[test]
    fn test_plain_entry_serializes_title_only() {
        let json = serde_json::to_value(DisplayEntry::titled("Added ingredient egg")).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "Added ingredient egg" }));
    }

    #[test]
    fn test_display_renders_multiline_fields() {
        let rendered = DisplayEntry::titled("Your Fridge")
            .with_field("Ingredients: ", "apple\nmilk")
            .to_string();
        assert_eq!(rendered, "== Your Fridge ==\nIngredients:\n  apple\n  milk\n");
    }
}
