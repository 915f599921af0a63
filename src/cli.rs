//! Minimal CLI: compile a schema into a form, then read data out of it.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::config::FormConfig;
use crate::form::Form;
use crate::{load, ui};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// build an interactive form model from a JSON schema and inspect its data
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// build the form and print its default data snapshot
    Defaults(DefaultsOut),
    /// build the form, apply a data document, and print the round-tripped snapshot
    Apply(ApplyOut),
    /// build the form and print an outline of its widget tree
    Inspect(InspectOut),
}

#[derive(Args, Debug, Clone)]
struct FormSettings {
    /// JSON schema file (Draft-07 subset)
    #[arg(long, short)]
    schema: PathBuf,

    /// place labels above inputs instead of beside them
    #[arg(long, default_value_t = false)]
    vertical_labels: bool,

    /// render doubly-bounded numerics as sliders
    #[arg(long, default_value_t = false)]
    sliders: bool,

    /// how many array pool children to pre-build eagerly
    #[arg(long, default_value_t = 2)]
    preconstruct: usize,
}

#[derive(Args, Debug)]
struct DefaultsOut {
    #[command(flatten)]
    form_settings: FormSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ApplyOut {
    #[command(flatten)]
    form_settings: FormSettings,

    /// JSON data document to push into the form
    #[arg(long, short)]
    data: PathBuf,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectOut {
    #[command(flatten)]
    form_settings: FormSettings,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl FormSettings {
    fn build_form(&self) -> Result<Form> {
        let schema = read_json(&self.schema)?;
        let config = FormConfig {
            vertically_place_labels: self.vertical_labels,
            use_sliders: self.sliders,
            preconstruct_array_items: self.preconstruct,
            ..FormConfig::default()
        };
        Form::with_config(schema, config)
            .with_context(|| format!("cannot build form from {}", self.schema.display()))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Defaults(target) => {
                let form = target.form_settings.build_form()?;
                let data = form
                    .data()
                    .context("form defaults do not satisfy the schema")?;
                emit(target.out.as_deref(), &pretty(&data)?)
            }
            Command::Apply(target) => {
                let form = target.form_settings.build_form()?;
                let data = read_json(&target.data)?;
                form.set_data(&data)
                    .with_context(|| format!("data in {} rejected", target.data.display()))?;
                let round_tripped = form.data()?;
                emit(target.out.as_deref(), &pretty(&round_tripped)?)
            }
            Command::Inspect(target) => {
                let form = target.form_settings.build_form()?;
                emit(target.out.as_deref(), &ui::outline(&form.widget()))
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn read_json(path: &Path) -> Result<Value> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    load::from_str_with_path(&source)
        .map_err(|e| anyhow::anyhow!("invalid JSON in {}: {e}", path.display()))
}

fn pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn emit(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("cannot create {}", parent.display()))?;
            }
            std::fs::write(path, text)
                .with_context(|| format!("cannot write {}", path.display()))?;
        }
        None => println!("{text}"),
    }
    Ok(())
}
