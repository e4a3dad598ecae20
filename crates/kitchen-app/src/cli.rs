use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// AI Kitchen: a streaming cooking assistant and study helper backed by Gemini.
#[derive(Parser, Debug)]
#[command(name = "kitchen", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chat with Chef Gemini about one recipe.
    Chef {
        /// Recipe JSON file (recipeName, description, ingredients, instructions).
        #[arg(long)]
        recipe: PathBuf,

        /// Chat model override.
        #[arg(long)]
        model: Option<String>,
    },
    /// Chat with the Study Buddy tutor.
    Study {
        /// Chat model override.
        #[arg(long)]
        model: Option<String>,
    },
    /// List the food ingredients visible in a photo.
    Identify {
        image: PathBuf,

        /// MIME type override. Guessed from the file extension otherwise.
        #[arg(long)]
        mime: Option<String>,
    },
    /// Print the effective config as JSON.
    Config,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chef_with_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "kitchen",
            "chef",
            "--recipe",
            "pancakes.json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        match args.command {
            Command::Chef { recipe, model } => {
                assert_eq!(recipe, PathBuf::from("pancakes.json"));
                assert!(model.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn chef_requires_a_recipe() {
        assert!(Args::try_parse_from(["kitchen", "chef"]).is_err());
    }

    #[test]
    fn parses_identify_with_mime_override() {
        let args = Args::try_parse_from([
            "kitchen",
            "--config",
            "/tmp/k.toml",
            "identify",
            "fridge.jpg",
            "--mime",
            "image/png",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/k.toml")));
        match args.command {
            Command::Identify { image, mime } => {
                assert_eq!(image, PathBuf::from("fridge.jpg"));
                assert_eq!(mime.as_deref(), Some("image/png"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn a_command_is_required() {
        assert!(Args::try_parse_from(["kitchen"]).is_err());
    }
}
