use std::collections::HashMap;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::calculator::{self, Calculation, RiskInputs};
use crate::catalogue::{
    CatalogueKind, CatalogueProfile, LoadOutcome, LoadState, Loader, LoaderOptions, QueryState,
    Session, SortKey, Source,
};
use crate::cli::args::{
    BrowseArgs, CliArgs, CoinArgs, Command, InitConfigArgs, LeverageArgs, ListArgs, OutputArgs,
    QueryArgs, SourceArgs,
};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::output::{self, OutputFormat};
use crate::render::coin::CoinDetail;

fn print_banner() {
    const BANNER: &str = r#"
                                           __
 _      ______ __   _____  _________ _/ /_
| | /| / / __ `/ | / / _ \/ ___/ __ `/ __/
| |/ |/ / /_/ /| |/ /  __/ /__/ /_/ / /_
|__/|__/\__,_/ |___/\___/\___/\__,_/\__/
"#;
    eprint!("{}", BANNER);
    eprintln!(
        "       v{} - crypto-news catalogue renderer",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
}

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn format_opt_value<'a>(v: Option<&'a str>, default: &'a str) -> &'a str {
    match v {
        Some(v) if !v.trim().is_empty() => v,
        _ => default,
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,wavecat={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn render_custom_help(cmd: &clap::Command, is_root: bool) -> String {
    let mut out = String::new();

    let name = if is_root {
        cmd.get_name().to_string()
    } else {
        format!("wavecat {}", cmd.get_name())
    };

    match cmd.get_version() {
        Some(version) if is_root => {
            out.push_str(&name);
            out.push(' ');
            out.push_str(version);
            out.push('\n');
        }
        _ => {
            out.push_str(&name);
            out.push('\n');
        }
    }

    if let Some(about) = cmd.get_about() {
        out.push_str(&about.to_string());
        out.push('\n');
    }

    if let Some(long_about) = cmd.get_long_about() {
        out.push('\n');
        out.push_str(&long_about.to_string());
        out.push('\n');
    }

    out.push('\n');
    out.push_str("Usage: ");
    out.push_str(&name);
    if is_root {
        out.push_str(" <COMMAND> [OPTIONS]\n\n");
        out.push_str("Commands:\n");
        for sub in cmd.get_subcommands() {
            let about = sub.get_about().map(|a| a.to_string()).unwrap_or_default();
            out.push_str(&format!("  {:<12}{}\n", sub.get_name(), about));
        }
        out.push('\n');
    } else {
        out.push_str(" [OPTIONS]\n\n");
    }

    let mut sections: Vec<(String, Vec<&clap::Arg>)> = Vec::new();
    let mut section_idx: HashMap<String, usize> = HashMap::new();

    for arg in cmd.get_arguments() {
        if arg.is_hide_set() {
            continue;
        }

        let heading = if arg.is_positional() {
            "Arguments".to_string()
        } else {
            arg.get_help_heading().unwrap_or("Options").to_string()
        };

        let idx = match section_idx.get(&heading).copied() {
            Some(i) => i,
            None => {
                sections.push((heading.clone(), Vec::new()));
                let i = sections.len() - 1;
                section_idx.insert(heading, i);
                i
            }
        };

        sections[idx].1.push(arg);
    }

    for (heading, args) in sections {
        out.push_str(&heading);
        out.push_str(":\n");

        for arg in args {
            let mut parts: Vec<String> = Vec::new();

            if let Some(short) = arg.get_short() {
                parts.push(format!("-{short}"));
            }

            if let Some(long) = arg.get_long() {
                parts.push(format!("--{long}"));
            }

            if let Some(aliases) = arg.get_visible_aliases() {
                for alias in aliases {
                    let rendered = format!("--{alias}");
                    if !parts.iter().any(|p| p == &rendered) {
                        parts.push(rendered);
                    }
                }
            }

            let mut flags = parts.join(", ");

            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                if !flags.is_empty() {
                    flags.push(' ');
                }
                flags.push('<');
                flags.push_str(value_name);
                flags.push('>');
            }

            out.push_str("  ");
            out.push_str(&flags);
            out.push('\n');

            if let Some(help) = arg.get_help() {
                let help = help.to_string();
                if !help.trim().is_empty() {
                    out.push_str("          ");
                    out.push_str(help.trim());
                    out.push('\n');
                }
            }

            out.push('\n');
        }
    }

    out
}

fn help_for_argv(argv: &[String]) -> String {
    let root = CliArgs::command();
    let sub = argv
        .iter()
        .skip(1)
        .find_map(|a| root.find_subcommand(a.as_str()).cloned());
    match sub {
        Some(sub) => render_custom_help(&sub, false),
        None => render_custom_help(&root, true),
    }
}

#[derive(Clone, Debug)]
struct ListingSettings {
    profile: CatalogueProfile,
    loader: LoaderOptions,
    query: QueryState,
    output: Option<String>,
    format: OutputFormat,
    template: Option<String>,
}

fn resolve_kind(args: &SourceArgs, cfg: &ConfigFile) -> Result<CatalogueKind, String> {
    match args.catalogue.as_deref().or(cfg.catalogue.as_deref()) {
        Some(raw) => CatalogueKind::parse(raw)
            .ok_or_else(|| format!("invalid catalogue '{raw}', expected projects, posts, coins or waves")),
        None => Ok(CatalogueKind::Projects),
    }
}

fn build_loader_options(args: &SourceArgs, cfg: &ConfigFile) -> Result<LoaderOptions, String> {
    let mut options = LoaderOptions::default();
    if let Some(timeout) = args.timeout.or(cfg.timeout) {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
        options.timeout_seconds = timeout;
    }
    if let Some(ua) = args.user_agent.clone().or_else(|| cfg.user_agent.clone()) {
        options.user_agent = ua;
    }
    Ok(options)
}

fn build_profile(
    kind: CatalogueKind,
    source: &SourceArgs,
    query: Option<&QueryArgs>,
    cfg: &ConfigFile,
) -> Result<CatalogueProfile, String> {
    let mut profile = CatalogueProfile::for_kind(kind);

    if let Some(src) = source.source.clone().or_else(|| cfg.source.clone()) {
        profile.source = config::expand_tilde_string(src.trim());
    }
    if let Some(key) = source
        .collection_key
        .clone()
        .or_else(|| cfg.collection_key.clone())
    {
        let key = key.trim().to_string();
        profile.collection_key = if key.is_empty() { None } else { Some(key) };
    }

    let page_size = query.and_then(|q| q.page_size).or(cfg.page_size);
    if let Some(size) = page_size {
        if size == 0 {
            return Err("invalid page-size, expected positive integer".to_string());
        }
        profile.page_size = size;
    }

    let cli_statuses = query
        .and_then(|q| q.visible_statuses.as_deref())
        .map(crate::utils::parse_csv_list);
    if let Some(statuses) = cli_statuses.or_else(|| cfg.visible_statuses.clone()) {
        profile.visible_statuses = statuses;
    }
    if let Some(placeholder) = cfg.placeholder_media.clone() {
        profile.placeholder_media = placeholder;
    }
    if let Some(link) = cfg.link_template.clone() {
        profile.link_template = link;
    }

    Ok(profile)
}

fn resolve_format(
    explicit: Option<&str>,
    cfg: &ConfigFile,
    output: Option<&str>,
) -> Result<OutputFormat, String> {
    if let Some(raw) = explicit.or(cfg.output_format.as_deref()) {
        return OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected html, json or text"));
    }
    Ok(output
        .and_then(output::infer_format_from_path)
        .unwrap_or(OutputFormat::Text))
}

fn build_listing_settings(
    source: &SourceArgs,
    query: &QueryArgs,
    page: Option<usize>,
    out: &OutputArgs,
    cfg: &ConfigFile,
) -> Result<ListingSettings, String> {
    let kind = resolve_kind(source, cfg)?;
    let profile = build_profile(kind, source, Some(query), cfg)?;
    let loader = build_loader_options(source, cfg)?;

    let mut state = QueryState::for_profile(&profile);
    if let Some(text) = query.search.as_deref() {
        state.text = text.to_string();
    }
    state.category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    if let Some(raw) = query.sort.as_deref() {
        state.sort = SortKey::parse(raw)
            .ok_or_else(|| format!("invalid sort '{raw}', expected default, alphabetical or rank"))?;
    }
    if let Some(page) = page {
        if page == 0 {
            return Err("invalid page, expected positive integer".to_string());
        }
        state.page = page;
    }

    let output = out
        .output
        .clone()
        .or_else(|| cfg.output.clone())
        .map(|p| config::expand_tilde_string(&p));
    let format = resolve_format(out.output_format.as_deref(), cfg, output.as_deref())?;
    let template = out
        .template
        .clone()
        .or_else(|| cfg.template.clone())
        .map(|p| config::expand_tilde_string(&p));

    Ok(ListingSettings {
        profile,
        loader,
        query: state,
        output,
        format,
        template,
    })
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    if let Ok(style) = ProgressStyle::with_template(":: {spinner} {msg} [{elapsed_precise}]") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb
}

async fn read_template(path: Option<&str>) -> Result<Option<String>, String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map(Some)
            .map_err(|e| format!("failed to read template '{path}': {e}")),
        None => Ok(None),
    }
}

async fn write_output(path: Option<&str>, rendered: &[u8]) -> Result<(), String> {
    match path {
        Some(path) => {
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(rendered)
                .await
                .map_err(|_| "failed to write output file".to_string())?;
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(rendered)
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
        }
    }
    Ok(())
}

async fn load_into(session: &mut Session, loader: &Loader, source: &Source) -> LoadOutcome {
    let ticket = session.begin_load();
    let pb = spinner(format!("loading {}", source.display()));
    let result = loader
        .load(source, session.profile().collection_key.as_deref())
        .await;
    pb.finish_and_clear();

    let outcome = session.finish_load(ticket, result);
    if let LoadOutcome::Applied { records } = &outcome {
        info!("loaded {} records from {}", records, source.display());
    }
    outcome
}

fn apply_query(session: &mut Session, query: &QueryState) {
    session.set_text(&query.text);
    session.set_category(query.category.as_deref());
    session.set_sort(query.sort);
    session.select_page(query.page);
}

fn print_listing_summary(session: &Session, settings: &ListingSettings) {
    let view = session.view();
    format_kv_line("Catalogue", session.profile().kind.label());
    format_kv_line("Source", &session.profile().source);
    match &view.load {
        LoadState::Failed(message) => {
            format_kv_line("Status", &format!("{}", "failed".red()));
            format_kv_line("Error", message);
        }
        LoadState::Loading => format_kv_line("Status", "loading"),
        LoadState::Ready => {
            format_kv_line(
                "Records",
                &format!(
                    "{} visible / {} loaded",
                    view.page.total_items,
                    session.catalogue().len()
                ),
            );
            format_kv_line(
                "Page",
                &format!(
                    "{}/{} ({} per page)",
                    view.page.page, view.page.total_pages, view.page_size
                ),
            );
        }
    }
    format_kv_line(
        "Query",
        &format!(
            "text={} category={} sort={}",
            format_opt_value(Some(view.state.text.as_str()), "-"),
            format_opt_value(view.state.category.as_deref(), "-"),
            view.state.sort.label()
        ),
    );
    format_kv_line(
        "Output",
        &format!(
            "{} ({})",
            format_opt_value(settings.output.as_deref(), "stdout"),
            settings.format.label()
        ),
    );
    eprintln!();
}

async fn run_list(settings: ListingSettings) -> Result<(), String> {
    let source = Source::parse(&settings.profile.source).map_err(|e| e.to_string())?;
    let loader = Loader::new(&settings.loader).map_err(|e| e.to_string())?;
    let template = read_template(settings.template.as_deref()).await?;

    let mut session = Session::new(settings.profile.clone());
    load_into(&mut session, &loader, &source).await;
    apply_query(&mut session, &settings.query);

    print_listing_summary(&session, &settings);

    let rendered = output::render_listing(&session, settings.format, template.as_deref());
    write_output(settings.output.as_deref(), &rendered).await
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum BrowseCommand {
    Search(String),
    Category(Option<String>),
    Sort(SortKey),
    Page(usize),
    Next,
    Prev,
    Reset,
    Reload,
    Categories,
    Help,
    Quit,
}

const BROWSE_HELP: &str = "commands: search <text>, category [name], sort <default|alphabetical|rank>, page <n>, next, prev, reset, reload, categories, help, quit";

fn parse_browse_command(line: &str) -> Result<Option<BrowseCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    let cmd = match word.to_lowercase().as_str() {
        "search" | "s" | "/" => BrowseCommand::Search(rest.to_string()),
        "category" | "cat" | "c" => BrowseCommand::Category(if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }),
        "sort" => BrowseCommand::Sort(
            SortKey::parse(rest)
                .ok_or_else(|| format!("unknown sort '{rest}', expected default, alphabetical or rank"))?,
        ),
        "page" | "p" => {
            let page = rest
                .parse::<usize>()
                .ok()
                .filter(|p| *p > 0)
                .ok_or_else(|| format!("invalid page '{rest}', expected positive integer"))?;
            BrowseCommand::Page(page)
        }
        "next" | "n" => BrowseCommand::Next,
        "prev" | "previous" => BrowseCommand::Prev,
        "reset" => BrowseCommand::Reset,
        "reload" => BrowseCommand::Reload,
        "categories" => BrowseCommand::Categories,
        "help" | "?" => BrowseCommand::Help,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        other => return Err(format!("unknown command '{other}' ({BROWSE_HELP})")),
    };
    Ok(Some(cmd))
}

fn apply_browse_command(session: &mut Session, cmd: &BrowseCommand) {
    match cmd {
        BrowseCommand::Search(text) => session.set_text(text),
        BrowseCommand::Category(category) => session.set_category(category.as_deref()),
        BrowseCommand::Sort(sort) => session.set_sort(*sort),
        BrowseCommand::Page(page) => session.select_page(*page),
        BrowseCommand::Next => session.next_page(),
        BrowseCommand::Prev => session.prev_page(),
        BrowseCommand::Reset => session.reset(),
        BrowseCommand::Reload
        | BrowseCommand::Categories
        | BrowseCommand::Help
        | BrowseCommand::Quit => {}
    }
}

async fn redraw(
    session: &Session,
    settings: &ListingSettings,
    template: Option<&str>,
) -> Result<(), String> {
    let rendered = output::render_listing(session, settings.format, template);
    write_output(settings.output.as_deref(), &rendered).await?;
    if let Some(path) = settings.output.as_deref() {
        let view = session.view();
        eprintln!(
            ":: wrote {} (page {}/{}, {} results)",
            path, view.page.page, view.page.total_pages, view.page.total_items
        );
    }
    Ok(())
}

async fn run_browse(settings: ListingSettings) -> Result<(), String> {
    let source = Source::parse(&settings.profile.source).map_err(|e| e.to_string())?;
    let loader = Loader::new(&settings.loader).map_err(|e| e.to_string())?;
    let template = read_template(settings.template.as_deref()).await?;

    let mut session = Session::new(settings.profile.clone());
    load_into(&mut session, &loader, &source).await;
    apply_query(&mut session, &settings.query);

    print_listing_summary(&session, &settings);
    eprintln!("{}", BROWSE_HELP.dimmed());
    redraw(&session, &settings, template.as_deref()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| format!("failed to read stdin: {e}"))?
    {
        let cmd = match parse_browse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{}", message.red());
                continue;
            }
        };
        match &cmd {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                eprintln!("{}", BROWSE_HELP);
                continue;
            }
            BrowseCommand::Categories => {
                let categories = session.catalogue().categories();
                if categories.is_empty() {
                    eprintln!("no categories");
                } else {
                    eprintln!("{}", categories.join(", "));
                }
                continue;
            }
            BrowseCommand::Reload => {
                let previous = session.state().clone();
                load_into(&mut session, &loader, &source).await;
                apply_query(&mut session, &previous);
            }
            other => apply_browse_command(&mut session, other),
        }
        redraw(&session, &settings, template.as_deref()).await?;
    }
    Ok(())
}

async fn run_coin(args: CoinArgs, cfg: ConfigFile) -> Result<(), String> {
    let profile = build_profile(CatalogueKind::Coins, &args.source, None, &cfg)?;
    let loader_options = build_loader_options(&args.source, &cfg)?;
    let output_path = args
        .output
        .output
        .clone()
        .or_else(|| cfg.output.clone())
        .map(|p| config::expand_tilde_string(&p));
    let format = resolve_format(
        args.output.output_format.as_deref(),
        &cfg,
        output_path.as_deref(),
    )?;
    let template_path = args
        .output
        .template
        .clone()
        .or_else(|| cfg.template.clone())
        .map(|p| config::expand_tilde_string(&p));
    let template = read_template(template_path.as_deref()).await?;

    let coin = args.coin.trim().to_lowercase();
    let base = Source::parse(&profile.source).map_err(|e| e.to_string())?;
    let detail_source = base
        .sibling(&format!("{coin}.json"))
        .map_err(|e| e.to_string())?;
    let loader = Loader::new(&loader_options).map_err(|e| e.to_string())?;

    format_kv_line("Coin", &coin);
    format_kv_line("Source", &detail_source.display());

    let pb = spinner(format!("loading {}", detail_source.display()));
    let loaded = loader.fetch_json(&detail_source).await;
    pb.finish_and_clear();

    let detail = loaded.and_then(|doc| {
        serde_json::from_value::<CoinDetail>(doc).map_err(|e| crate::catalogue::CatalogueError::Parse {
            origin: detail_source.display(),
            message: e.to_string(),
        })
    });

    let rendered = match detail {
        Ok(detail) => {
            format_kv_line("Analyses", &detail.analyses.len().to_string());
            eprintln!();
            output::render_coin(&detail, format, template.as_deref())
        }
        Err(e) => {
            warn!("coin detail load failed: {}", e);
            if format != OutputFormat::Html {
                return Err(e.to_string());
            }
            eprintln!();
            output::report::render_coin_failure_html(&profile.failure_message, template.as_deref())
                .into_bytes()
        }
    };
    write_output(output_path.as_deref(), &rendered).await
}

fn run_leverage(args: &LeverageArgs) -> Result<Vec<u8>, String> {
    let format = match args.output_format.as_deref() {
        Some(raw) => OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected html, json or text"))?,
        None => OutputFormat::Text,
    };
    let inputs =
        RiskInputs::parse(&args.wallet, args.risk, args.stop_loss).map_err(|e| e.to_string())?;
    let calc = match (args.leverage, args.margin) {
        (Some(leverage), _) => Calculation::FixedLeverage(
            calculator::fixed_leverage(&inputs, leverage).map_err(|e| e.to_string())?,
        ),
        (None, Some(margin)) => Calculation::FixedMargin(
            calculator::fixed_margin(&inputs, margin).map_err(|e| e.to_string())?,
        ),
        (None, None) => return Err("one of --leverage or --margin is required".to_string()),
    };
    Ok(output::render_calculation(&calc, format))
}

fn run_init_config(args: &InitConfigArgs, path: Option<std::path::PathBuf>) -> Result<(), String> {
    if args.print {
        print!("{}", config::default_config_yaml());
        return Ok(());
    }
    let path = path.ok_or_else(|| "could not determine a config path, pass --config".to_string())?;
    if config::ensure_default_config_file(&path)? {
        format_kv_line("Config", &format!("wrote {}", path.display()));
    } else {
        format_kv_line("Config", &format!("{} already exists", path.display()));
    }
    Ok(())
}

fn load_effective_config(args: &CliArgs) -> Result<ConfigFile, String> {
    match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false),
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true),
            None => Ok(ConfigFile::default()),
        },
    }
}

pub fn run_cli() -> Result<(), String> {
    let argv: Vec<String> = std::env::args().collect();
    let args = match CliArgs::try_parse_from(&argv) {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", help_for_argv(&argv));
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose);
    validation::validate(&args)?;

    if let Command::InitConfig(init) = &args.command {
        let path = args
            .config
            .as_deref()
            .map(config::expand_tilde)
            .or_else(config::default_config_path);
        return run_init_config(init, path);
    }

    let cfg = load_effective_config(&args)?;
    if args.no_color || cfg.no_color.unwrap_or(false) {
        colored::control::set_override(false);
    }

    if let Command::Leverage(lev) = &args.command {
        let rendered = run_leverage(lev)?;
        print!("{}", String::from_utf8_lossy(&rendered));
        return Ok(());
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    print_banner();
    match args.command {
        Command::List(ListArgs {
            source,
            query,
            page,
            output,
        }) => {
            let settings = build_listing_settings(&source, &query, page, &output, &cfg)?;
            rt.block_on(run_list(settings))
        }
        Command::Browse(BrowseArgs {
            source,
            query,
            output,
        }) => {
            let settings = build_listing_settings(&source, &query, None, &output, &cfg)?;
            rt.block_on(run_browse(settings))
        }
        Command::Coin(coin) => rt.block_on(run_coin(coin, cfg)),
        Command::Leverage(_) | Command::InitConfig(_) => Ok(()),
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn list_settings(argv: &[&str], cfg: ConfigFile) -> Result<ListingSettings, String> {
        let args = CliArgs::parse_from(argv);
        match args.command {
            Command::List(list) => {
                build_listing_settings(&list.source, &list.query, list.page, &list.output, &cfg)
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn defaults_come_from_the_profile() {
        let settings = list_settings(&["wavecat", "list"], ConfigFile::default()).unwrap();
        assert_eq!(settings.profile.kind, CatalogueKind::Projects);
        assert_eq!(settings.profile.page_size, 12);
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.query.page, 1);
    }

    #[test]
    fn cli_overrides_config_overrides_profile() {
        let cfg = ConfigFile {
            catalogue: Some("coins".to_string()),
            page_size: Some(6),
            source: Some("./cfg/coins.json".to_string()),
            ..ConfigFile::default()
        };
        let settings = list_settings(&["wavecat", "list", "-n", "3"], cfg).unwrap();
        assert_eq!(settings.profile.kind, CatalogueKind::Coins);
        assert_eq!(settings.profile.page_size, 3);
        assert_eq!(settings.profile.source, "./cfg/coins.json");
        assert_eq!(settings.query.sort, SortKey::Rank);
    }

    #[test]
    fn zero_page_size_in_config_is_rejected() {
        let cfg = ConfigFile {
            page_size: Some(0),
            ..ConfigFile::default()
        };
        assert!(list_settings(&["wavecat", "list"], cfg).is_err());
    }

    #[test]
    fn format_is_inferred_from_output_path() {
        let settings =
            list_settings(&["wavecat", "list", "-o", "out/projects.html"], ConfigFile::default())
                .unwrap();
        assert_eq!(settings.format, OutputFormat::Html);
        let settings = list_settings(
            &["wavecat", "list", "-o", "out/projects.html", "-f", "json"],
            ConfigFile::default(),
        )
        .unwrap();
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn visible_statuses_flag_replaces_gate() {
        let settings = list_settings(
            &["wavecat", "list", "--visible-statuses", "published,draft"],
            ConfigFile::default(),
        )
        .unwrap();
        assert_eq!(settings.profile.visible_statuses, vec!["published", "draft"]);
    }

    #[test]
    fn browse_commands_parse() {
        assert_eq!(
            parse_browse_command("search  eth ").unwrap(),
            Some(BrowseCommand::Search("eth".to_string()))
        );
        assert_eq!(
            parse_browse_command("category").unwrap(),
            Some(BrowseCommand::Category(None))
        );
        assert_eq!(
            parse_browse_command("sort a-z").unwrap(),
            Some(BrowseCommand::Sort(SortKey::Alphabetical))
        );
        assert_eq!(parse_browse_command("page 3").unwrap(), Some(BrowseCommand::Page(3)));
        assert_eq!(parse_browse_command("   ").unwrap(), None);
        assert!(parse_browse_command("page 0").is_err());
        assert!(parse_browse_command("sort price").is_err());
        assert!(parse_browse_command("dance").is_err());
    }

    #[test]
    fn leverage_command_renders_text() {
        let args = CliArgs::parse_from([
            "wavecat", "leverage", "-w", "1000", "-r", "2", "-l", "5", "-x", "10",
        ]);
        let Command::Leverage(lev) = args.command else {
            panic!("expected leverage");
        };
        let text = String::from_utf8(run_leverage(&lev).unwrap()).unwrap();
        assert!(text.contains("Required Margin"));
        assert!(text.contains("$40"));
    }

    #[test]
    fn leverage_rejects_decimal_wallet() {
        let args = CliArgs::parse_from([
            "wavecat", "leverage", "-w", "1000.5", "-r", "2", "-l", "5", "-m", "40",
        ]);
        let Command::Leverage(lev) = args.command else {
            panic!("expected leverage");
        };
        assert!(run_leverage(&lev).unwrap_err().starts_with("wallet:"));
    }

    #[test]
    fn subcommand_help_lists_its_flags() {
        let help = help_for_argv(&["wavecat".to_string(), "list".to_string()]);
        assert!(help.starts_with("wavecat list"));
        assert!(help.contains("--page-size"));
        let root = help_for_argv(&["wavecat".to_string()]);
        assert!(root.contains("Commands:"));
        assert!(root.contains("leverage"));
    }
}
