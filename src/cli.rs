use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::command::INGREDIENT_FLAG;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Fridge sub-command: view, get|check, add|set, delete|remove
    pub subcommand: String,

    /// Id of the user whose fridge is used
    #[arg(short, long)]
    pub user: String,

    /// Ingredient to add or remove
    #[arg(short, long)]
    pub ingredient: Option<String>,

    /// Additional command flag as KEY=VALUE (repeatable)
    #[arg(long = "flag", value_parser = parse_flag)]
    pub flags: Vec<(String, String)>,

    /// JSON store file, overrides FRIDGE_STORE_PATH
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    /// Print the resulting entries as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// `--ingredient` wins over an `ingredient=` passed through `--flag`.
    pub fn flag_map(&self) -> HashMap<String, String> {
        let mut flags: HashMap<String, String> = self.flags.iter().cloned().collect();
        if let Some(ingredient) = &self.ingredient {
            flags.insert(INGREDIENT_FLAG.to_string(), ingredient.clone());
        }
        flags
    }
}

fn parse_flag(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(
            parse_flag("ingredient=egg").unwrap(),
            ("ingredient".to_string(), "egg".to_string())
        );
        assert_eq!(
            parse_flag("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_flag("noequals").is_err());
        assert!(parse_flag("=egg").is_err());
    }

    #[test]
    fn test_flag_map_merges_ingredient() {
        let cli = Cli::try_parse_from([
            "fridge-assistant",
            "add",
            "--user",
            "u1",
            "--flag",
            "ingredient=milk",
            "--flag",
            "brand=acme",
            "--ingredient",
            "egg",
        ])
        .unwrap();

        let flags = cli.flag_map();
        assert_eq!(flags.get("ingredient").map(String::as_str), Some("egg"));
        assert_eq!(flags.get("brand").map(String::as_str), Some("acme"));
        assert!(!cli.json);
    }

    #[test]
    fn test_no_flags() {
        let cli = Cli::try_parse_from(["fridge-assistant", "view", "-u", "u1", "--json"]).unwrap();
        assert!(cli.flag_map().is_empty());
        assert!(cli.json);
        assert_eq!(cli.subcommand, "view");
    }
}
