//! `markup-rewrite`: host page writer and IR inspection tool.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shell::{ShellConfig, read_list_file, write_shell};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use template_ir::{IrSnapshot, Node, RewriteConfig, RewritePass, RootWhitespace};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "markup-rewrite", version)]
#[command(about = "Template markup rewriting and host page tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the HTML host page for a compiled application
    Shell(ShellArgs),
    /// Run the markup rewrite pass over a serialized IR tree
    Rewrite(RewriteArgs),
}

#[derive(clap::Args)]
struct ShellArgs {
    /// HTML template containing a `<script type="blazor-boot">` placeholder
    template: PathBuf,

    /// Main application assembly
    #[arg(long = "main")]
    main_assembly: PathBuf,

    /// File listing referenced assemblies, one per line
    #[arg(long)]
    references: PathBuf,

    /// File listing static resources to copy, one per line
    #[arg(long)]
    resources: Option<PathBuf>,

    /// Mark the application as linked
    #[arg(long)]
    linker: bool,

    /// Entry point written to the loader tag
    #[arg(long)]
    entry_point: Option<String>,

    /// Output page path; resources go to `_content/` beside it
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(clap::Args)]
struct RewriteArgs {
    /// IR tree as JSON
    input: PathBuf,

    /// Print the rewritten IR as JSON instead of a snapshot
    #[arg(long)]
    json: bool,

    /// Whitespace-only text while no element is open
    #[arg(long, value_enum, default_value = "elide")]
    root_whitespace: WhitespaceArg,

    /// Merge adjacent text produced by one markup run
    #[arg(long)]
    coalesce_text: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WhitespaceArg {
    /// Always drop it
    Elide,
    /// Drop it only directly under a method
    MethodScopeOnly,
    /// Keep it as text
    Preserve,
}

impl From<WhitespaceArg> for RootWhitespace {
    fn from(arg: WhitespaceArg) -> Self {
        match arg {
            WhitespaceArg::Elide => RootWhitespace::Elide,
            WhitespaceArg::MethodScopeOnly => RootWhitespace::MethodScopeOnly,
            WhitespaceArg::Preserve => RootWhitespace::Preserve,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Shell(args) => run_shell(args),
        Command::Rewrite(args) => run_rewrite(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_shell(args: ShellArgs) -> Result<()> {
    let references = read_list_file(&args.references)
        .with_context(|| format!("reading reference list {}", args.references.display()))?;
    let resources = match &args.resources {
        Some(list) => read_list_file(list)
            .with_context(|| format!("reading resource list {}", list.display()))?,
        None => Vec::new(),
    };
    let config = ShellConfig {
        main_assembly: args.main_assembly,
        entry_point: args.entry_point,
        references,
        resources,
        linker_enabled: args.linker,
    };
    let summary = write_shell(&args.template, &config, &args.output)
        .with_context(|| format!("writing host page from {}", args.template.display()))?;
    log::info!(
        "wrote {} (boot tag {})",
        summary.output.display(),
        if summary.boot_tag_found { "replaced" } else { "missing" }
    );
    Ok(())
}

fn run_rewrite(args: RewriteArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let mut tree: Node = serde_json::from_str(&raw)
        .with_context(|| format!("parsing IR from {}", args.input.display()))?;
    let pass = RewritePass::new(RewriteConfig {
        root_whitespace: args.root_whitespace.into(),
        coalesce_text: args.coalesce_text,
    });
    let stats = pass
        .run(&mut tree)
        .with_context(|| format!("rewriting {}", args.input.display()))?;
    log::info!(
        "{} node(s) rewritten, {} element(s) built",
        stats.nodes_rewritten,
        stats.elements_built
    );
    if args.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        println!("{}", IrSnapshot::new(&tree));
    }
    Ok(())
}
