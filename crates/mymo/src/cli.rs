//! Command-line interface.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::engine::TemplateEngine;
use crate::app::generate::{self, GenerateOptions, GenerationReport};
use crate::domain::model::{OrmBackend, SelectionConfig};
use crate::domain::resolve::resolve;
use crate::infra::config::Config;
use crate::infra::git::GitCliFetcher;

#[derive(Debug, Parser)]
#[command(
    name = "mymo",
    author,
    version,
    about = "Generate a project from a template repository",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Increase log verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Decrease log verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clone a template repository and generate a new project from it
    New(NewArgs),
    /// Resolve a single template file and print the result
    Render(RenderArgs),
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Region selection flags shared by `new` and `render`.
#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// ORM whose regions are kept
    #[arg(long, value_enum)]
    pub orm: Option<OrmBackend>,
    /// Keep mocking (MSW) regions
    #[arg(long, overrides_with = "no_msw")]
    pub msw: bool,
    /// Drop mocking (MSW) regions even when configured on
    #[arg(long, overrides_with = "msw")]
    pub no_msw: bool,
}

#[derive(Debug, Clone, Args)]
pub struct NewArgs {
    /// Output directory and package name
    pub name: String,
    /// Template repository URL or path
    #[arg(long = "from", value_name = "REPO")]
    pub from: Option<String>,
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Rewrite the `name` field of package.json
    #[arg(long, overrides_with = "no_node")]
    pub node: bool,
    /// Leave package.json untouched even when configured on
    #[arg(long, overrides_with = "node")]
    pub no_node: bool,
    /// Name substituted for placeholders and `example` paths (defaults to NAME)
    #[arg(long)]
    pub entity_name: Option<String>,
    /// Delete a previously generated project first
    #[arg(long)]
    pub clean: bool,
    /// Additional glob excluded from the template (repeatable)
    #[arg(long = "ignore", value_name = "GLOB")]
    pub ignore: Vec<String>,
    /// Directory the project is created in
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
    /// Clone full history instead of a shallow clone
    #[arg(long)]
    pub full_history: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Template file to resolve
    pub file: PathBuf,
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Substitute placeholders with this name
    #[arg(long)]
    pub entity_name: Option<String>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::New(args) => run_new(args),
            Commands::Render(args) => run_render(args),
            Commands::Completions { shell } => {
                let mut command = Cli::command();
                clap_complete::generate(shell, &mut command, "mymo", &mut io::stdout());
                Ok(())
            }
        }
    }
}

impl SelectionArgs {
    fn to_selection(&self, config: &Config) -> SelectionConfig {
        SelectionConfig::new(
            self.orm.unwrap_or(config.defaults.orm),
            switch(self.msw, self.no_msw).unwrap_or_else(|| config.defaults.msw()),
        )
    }
}

/// Collapse a `--flag`/`--no-flag` pair; `None` when neither was given.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl NewArgs {
    /// Combine flags with configuration; flags win.
    pub fn into_options(self, config: &Config) -> Result<GenerateOptions> {
        let from = self
            .from
            .clone()
            .or_else(|| config.defaults.template.clone())
            .ok_or_else(|| anyhow!("no template repository given; pass --from or set defaults.template"))?;

        let mut ignore = config.ignore.globs.clone();
        ignore.extend(self.ignore.iter().cloned());

        Ok(GenerateOptions {
            selection: self.selection.to_selection(config),
            node: switch(self.node, self.no_node).unwrap_or_else(|| config.defaults.node()),
            entity_name: self.entity_name,
            clean: self.clean,
            ignore,
            output_root: self.output_dir,
            max_open_files: config.io.max_open_files,
            ..GenerateOptions::new(self.name, from)
        })
    }
}

fn run_new(args: NewArgs) -> Result<()> {
    let config = Config::load()?;
    let fetcher = if args.full_history {
        GitCliFetcher::new().with_full_history()
    } else {
        GitCliFetcher::new()
    };
    let options = args.into_options(&config)?;
    let report = generate::generate(&options, &fetcher)?;
    print_report(&report)?;

    if !report.is_complete() {
        bail!("{} file(s) could not be written", report.failures.len());
    }
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<()> {
    let config = Config::load()?;
    let raw = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let selection = args.selection.to_selection(&config);
    let rendered = match args.entity_name {
        Some(name) => TemplateEngine::new(selection, name).render(&raw),
        None => resolve(&raw, &selection),
    };
    io::stdout()
        .write_all(rendered.as_bytes())
        .context("failed to write to stdout")
}

fn print_report(report: &GenerationReport) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "Generated {}: {} written, {} copied, {} skipped",
        report.project_dir.display(),
        report.written.len(),
        report.copied.len(),
        report.skipped.len()
    )?;
    for failure in &report.failures {
        writeln!(
            out,
            "  failed to {} {}: {}",
            failure.operation,
            failure.path.display(),
            failure.message
        )?;
    }
    Ok(())
}
