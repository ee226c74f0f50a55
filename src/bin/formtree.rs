use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "formtree", version)]
struct Cli {
    /// Log engine activity to stderr (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a template for structural errors.
    Validate(ValidateArgs),
    /// Print the markup of a freshly built form.
    Render(RenderArgs),
    /// Replay an edit script against a template and print the extracted JSON.
    Fill(FillArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Template JSON.
    #[arg(long)]
    template: PathBuf,

    /// Top-level fields that must be declared (defaults to `version,title`).
    #[arg(long, value_delimiter = ',')]
    mandatory: Option<Vec<String>>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Template JSON.
    #[arg(long)]
    template: PathBuf,

    /// Render only the element at this dotted path.
    #[arg(long)]
    path: Option<String>,

    /// Edit script to replay before rendering.
    #[arg(long)]
    script: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FillArgs {
    /// Template JSON.
    #[arg(long)]
    template: PathBuf,

    /// Edit script JSON: `{ "opts": {..}, "steps": [..] }`.
    #[arg(long)]
    script: PathBuf,

    /// Emit arrays as lists instead of `item_N`-keyed objects.
    #[arg(long)]
    list: bool,
}

/// Replayable edit script.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct Script {
    opts: formtree::FormSessionOpts,
    steps: Vec<Step>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum Step {
    Set {
        set: formtree::FormPath,
        value: formtree::LeafValue,
    },
    Mutate(formtree::Request),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Render(args) => cmd_render(args),
        Command::Fill(args) => cmd_fill(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "formtree=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_template(path: &Path) -> anyhow::Result<formtree::Template> {
    let f = File::open(path).with_context(|| format!("open template '{}'", path.display()))?;
    let template = formtree::Template::from_reader(BufReader::new(f))
        .with_context(|| format!("parse template '{}'", path.display()))?;
    Ok(template)
}

fn read_script(path: &Path) -> anyhow::Result<Script> {
    let f = File::open(path).with_context(|| format!("open script '{}'", path.display()))?;
    let script: Script = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse script '{}'", path.display()))?;
    Ok(script)
}

fn replay(session: &mut formtree::FormSession, steps: &[Step]) -> anyhow::Result<()> {
    for (i, step) in steps.iter().enumerate() {
        match step {
            Step::Set { set, value } => session
                .set_value(set, value.clone())
                .with_context(|| format!("step {i}: set '{set}'"))?,
            Step::Mutate(req) => {
                let notice = session
                    .apply(req)
                    .with_context(|| format!("step {i}: {} '{}'", req.action, req.target))?;
                eprintln!("{notice}");
            }
        }
    }
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let template = read_template(&args.template)?;
    let mandatory = args
        .mandatory
        .unwrap_or_else(|| formtree::FormSessionOpts::default().mandatory_root_fields);
    template.validate(&mandatory)?;
    eprintln!("{} is valid", args.template.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let template = read_template(&args.template)?;
    let script = match &args.script {
        Some(p) => read_script(p)?,
        None => Script::default(),
    };
    let mut session = formtree::FormSession::new(template, script.opts)?;
    replay(&mut session, &script.steps)?;

    let markup = match &args.path {
        Some(raw) => {
            let path = formtree::FormPath::parse(raw)?;
            session
                .markup_at(&path)
                .with_context(|| format!("no element at '{path}'"))?
        }
        None => session.markup(),
    };
    println!("{markup}");
    Ok(())
}

fn cmd_fill(args: FillArgs) -> anyhow::Result<()> {
    let template = read_template(&args.template)?;
    let mut script = read_script(&args.script)?;
    if args.list {
        script.opts.array_repr = formtree::ArrayRepr::List;
    }
    let mut session = formtree::FormSession::new(template, script.opts)?;
    replay(&mut session, &script.steps)?;

    let doc = session.extract()?;
    let out = serde_json::to_string_pretty(&doc).context("serialize output document")?;
    println!("{out}");
    Ok(())
}
