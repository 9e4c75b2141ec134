//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat, RenderArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{self, HiddenRootPolicy, NavOptions, Settings};
use crate::domain::display::TreeNodeConvert;
use crate::domain::TreeBuilder;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InMemoryRepository;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Render(args)) => render(cli, args),
        Some(Commands::Items { site }) => items(cli, site.as_deref()),
        Some(Commands::Config { command }) => config_command(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `postnav --help`".to_string(),
        )),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    Ok(Settings::load(cli.config.as_deref())?)
}

/// `--site` wins over the configured `site_file`.
fn site_path(flag: Option<&Path>, settings: &Settings) -> CliResult<PathBuf> {
    flag.map(config::expand_path)
        .or_else(|| settings.site_file.clone())
        .ok_or_else(|| {
            CliError::Usage("no site file: pass --site or set site_file in the config".to_string())
        })
}

/// Command line flags on top of the configured nav options.
fn nav_options(args: &RenderArgs, settings: &Settings) -> CliResult<NavOptions> {
    let mut options = settings.nav.clone();
    if args.only_descendants {
        options.only_descendants = true;
    }
    if args.full_tree {
        options.full_tree = true;
    }
    if let Some(marker) = &args.marker {
        if marker.trim().is_empty() {
            return Err(CliError::InvalidArgs("--marker must not be empty".to_string()));
        }
        options.current_item_marker = marker.clone();
    }
    if let Some(key) = &args.hidden_key {
        options.hidden_filter_key = key.clone();
    }
    if args.fail_on_hidden_root {
        options.hidden_root = HiddenRootPolicy::Fail;
    }
    Ok(options)
}

#[instrument(skip(cli))]
fn render(cli: &Cli, args: &RenderArgs) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let site = site_path(args.site.as_deref(), &settings)?;
    let container = ServiceContainer::from_site_file(settings, &site)?;
    let options = nav_options(args, &container.settings)?;
    debug!("render: site={}, options={:?}", site.display(), options);

    let current = container.repo.get_item(args.current).map_err(crate::ApplicationError::from)?;
    let navigation = container.navigation.navigation(&current, &options)?;

    if !navigation.context.shows_current() {
        output::warning(&format!("item {} is not part of the rendered menu", current.id));
    }
    match args.format {
        OutputFormat::Html => output::info(&navigation),
        OutputFormat::Tree => output::info(&navigation.tree().to_tree_string()),
    }
    Ok(())
}

#[instrument(skip(cli))]
fn items(cli: &Cli, site: Option<&Path>) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let site = site_path(site, &settings)?;
    let repo = InMemoryRepository::load(&site)?;
    let all = repo.items();

    let mut builder = TreeBuilder::new().with_max_depth(settings.nav.max_depth);
    for root in repo.top_level() {
        let tree = builder.build(&root, &all).map_err(crate::ApplicationError::from)?;
        output::info(&tree.to_tree_string());
    }

    // Subtrees hanging off a parent id that is not in the store
    let orphans = repo.orphans();
    if !orphans.is_empty() {
        output::warning(&format!(
            "unknown parent for: {}",
            orphans.iter().map(|item| item.to_string()).join(", ")
        ));
    }
    for root in orphans {
        let tree = builder.build(&root, &all).map_err(crate::ApplicationError::from)?;
        output::info(&tree.to_tree_string());
    }
    Ok(())
}

fn config_command(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            output::header("Config files");
            match config::global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", "<no config directory>"),
            }
            let local = cli
                .config
                .clone()
                .unwrap_or_else(|| config::local_config_path(Path::new(".")));
            output::action("local", &local.display());
        }
    }
    Ok(())
}
