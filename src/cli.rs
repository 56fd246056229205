use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::html::HtmlRenderer;
use crate::navigation::Location;

/// Quire - a terminal reader for a small collection of essays
#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(about = "Browse and read a collection of markdown essays in the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of markdown essays
    #[arg(long, global = true, conflicts_with = "manifest")]
    pub essays_dir: Option<PathBuf>,

    /// TOML manifest listing essays
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Open at this location, e.g. `/essay/how_to_start_a_startup.md`
    #[arg(long)]
    pub location: Option<String>,
}

impl Cli {
    /// Where the reader starts; the list unless a location was given
    pub fn initial_location(&self) -> Location {
        self.location
            .as_deref()
            .map(Location::parse)
            .unwrap_or_default()
    }

    /// Load the config file and apply the catalog flags on top
    pub fn load_config(&self) -> Result<Config> {
        let config = Config::load(self.config.as_deref())?;
        Ok(config.with_catalog_overrides(self.essays_dir.clone(), self.manifest.clone()))
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List the essays in the catalog
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Render one essay and print it
    Render {
        /// Essay identifier, as shown by `list`
        identifier: String,

        /// Print terminal text instead of HTML
        #[arg(long)]
        text: bool,

        /// Wrap width for `--text`
        #[arg(long, default_value_t = 80)]
        width: usize,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Runs the non-interactive subcommands
pub struct CliHandler {
    config: Config,
}

impl CliHandler {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn load_catalog(&self) -> Result<Catalog> {
        let provider = self.config.catalog_provider();
        provider.load().context("Failed to load essay catalog")
    }

    pub async fn handle_command(&self, command: Commands, out: &mut dyn Write) -> Result<()> {
        match command {
            Commands::List { json } => self.handle_list(json, out),
            Commands::Render { identifier, text, width } => {
                self.handle_render(&identifier, text, width, out).await
            }
            Commands::Config => self.handle_config(out),
        }
    }

    fn handle_list(&self, json: bool, out: &mut dyn Write) -> Result<()> {
        let catalog = self.load_catalog()?;

        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(catalog.essays())?)?;
            return Ok(());
        }

        if catalog.is_empty() {
            writeln!(out, "No essays found.")?;
            return Ok(());
        }

        let width = catalog
            .iter()
            .map(|essay| essay.identifier.chars().count())
            .max()
            .unwrap_or(0);
        for essay in catalog.iter() {
            writeln!(out, "{:<width$}  {}", essay.identifier, essay.title, width = width)?;
        }
        Ok(())
    }

    async fn handle_render(&self, identifier: &str, text: bool, width: usize, out: &mut dyn Write) -> Result<()> {
        let catalog = self.load_catalog()?;
        let essay = catalog
            .get(identifier)
            .ok_or_else(|| anyhow!("No essay with identifier '{}'", identifier))?;

        let html = self
            .config
            .content_loader()
            .load(essay)
            .await
            .with_context(|| format!("Failed to load '{}'", essay.title))?;

        if text {
            let plain = HtmlRenderer::new(width.max(20)).html_to_plain_text(&html);
            write!(out, "{}", plain)?;
        } else {
            write!(out, "{}", html)?;
        }
        Ok(())
    }

    fn handle_config(&self, out: &mut dyn Write) -> Result<()> {
        if let Some(path) = Config::default_path() {
            writeln!(out, "# default path: {}", path.display())?;
        }
        write!(out, "{}", toml::to_string_pretty(&self.config)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn essays() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("1.how_to_start_a_startup.md"),
            "# How to Start a Startup\n\nYou need three things.",
        )
        .unwrap();
        std::fs::write(dir.path().join("default_alive.md"), "Are you *default alive*?").unwrap();
        dir
    }

    fn handler(dir: &TempDir) -> CliHandler {
        let config = Config::default().with_catalog_overrides(Some(dir.path().to_path_buf()), None);
        CliHandler::new(config)
    }

    async fn run(handler: &CliHandler, command: Commands) -> Result<String> {
        let mut out = Vec::new();
        handler.handle_command(command, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["quire", "--essays-dir", "posts", "--location", "/essay/a.md"]);
        assert_eq!(cli.essays_dir, Some(PathBuf::from("posts")));
        assert_eq!(cli.initial_location(), Location::essay("a.md"));
        assert!(cli.command.is_none());

        let cli = Cli::parse_from(["quire", "render", "a.md", "--text"]);
        assert_eq!(
            cli.command,
            Some(Commands::Render {
                identifier: "a.md".to_string(),
                text: true,
                width: 80
            })
        );
    }

    #[test]
    fn test_essays_dir_conflicts_with_manifest() {
        let result = Cli::try_parse_from(["quire", "--essays-dir", "a", "--manifest", "b.toml"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list() {
        let dir = essays();
        let output = run(&handler(&dir), Commands::List { json: false }).await.unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1.how_to_start_a_startup.md"));
        assert!(lines[0].ends_with("1.How To Start A Startup"));
        assert!(lines[1].ends_with("Default Alive"));
    }

    #[tokio::test]
    async fn test_list_json() {
        let dir = essays();
        let output = run(&handler(&dir), Commands::List { json: true }).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[1]["identifier"], "default_alive.md");
        assert_eq!(value[1]["title"], "Default Alive");
    }

    #[tokio::test]
    async fn test_render_html() {
        let dir = essays();
        let output = run(
            &handler(&dir),
            Commands::Render {
                identifier: "default_alive.md".to_string(),
                text: false,
                width: 80,
            },
        )
        .await
        .unwrap();

        assert!(output.contains("<em>default alive</em>"));
    }

    #[tokio::test]
    async fn test_render_unknown_identifier() {
        let dir = essays();
        let result = run(
            &handler(&dir),
            Commands::Render {
                identifier: "missing.md".to_string(),
                text: false,
                width: 80,
            },
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_is_toml() {
        let dir = essays();
        let output = run(&handler(&dir), Commands::Config).await.unwrap();

        let parsed: Config = toml::from_str(&output).unwrap();
        assert_eq!(parsed.catalog.directory, Some(dir.path().to_path_buf()));
    }
}
