mod commands;
mod core;
mod graph;
mod testplan;
mod workspace;

use clap::{Parser, Subcommand};
use core::error::{SelectiveError, print_error};
use std::path::PathBuf;

/// Select only the tests affected by a change
#[derive(Parser)]
#[command(name = "cargo")]
#[command(bin_name = "cargo")]
#[command(styles = get_styles())]
enum CargoCli {
  Selective(SelectiveCli),
}

#[derive(Parser)]
#[command(name = "selective")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct SelectiveCli {
  /// Workspace root (default: current directory, or base_path from selective.toml)
  #[arg(long, global = true)]
  base_path: Option<PathBuf>,

  /// Dump the workspace index (targets, files, folders) before the result
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show which targets are affected by changes
  Affected {
    /// Branch to diff against (default: local uncommitted changes)
    #[arg(long)]
    base_branch: Option<String>,
    /// Output format: text (default), json, names-only
    #[arg(long, default_value = "text")]
    format: String,
  },

  /// Enable exactly the affected entries of a test plan
  TestPlan {
    /// Branch to diff against (default: local uncommitted changes)
    #[arg(long)]
    base_branch: Option<String>,
    /// Test plan file to rewrite (default: config, then *.testplan.json at the root)
    #[arg(long)]
    test_plan: Option<PathBuf>,
    /// Show the resulting plan changes without writing the file
    #[arg(long)]
    dry_run: bool,
  },

  /// Print the dependency graph in DOT format
  Graph {
    /// Branch to diff against when highlighting (default: local uncommitted changes)
    #[arg(long)]
    base_branch: Option<String>,
    /// Highlight the targets affected by the current changeset
    #[arg(long)]
    highlight_affected: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let CargoCli::Selective(cli) = CargoCli::parse();

  let invocation_dir = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  // Build workspace context once (config, target index, dependency graph);
  // every command reads from the same context
  let ctx = match core::context::WorkspaceContext::build(&invocation_dir, cli.base_path.clone()) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Affected { base_branch, format } => {
      commands::run_affected(&ctx, base_branch.as_deref(), &format, cli.verbose)
    }
    Commands::TestPlan {
      base_branch,
      test_plan,
      dry_run,
    } => commands::run_test_plan(&ctx, base_branch.as_deref(), test_plan, dry_run, cli.verbose),
    Commands::Graph {
      base_branch,
      highlight_affected,
    } => commands::run_graph(&ctx, base_branch.as_deref(), highlight_affected),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: SelectiveError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
