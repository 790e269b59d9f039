use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "wavecat",
    version,
    about = "crypto-news catalogue renderer",
    long_about = "wavecat loads the JSON catalogues behind a crypto-news site (projects, latest posts, wave-analysis coins and write-ups), filters, sorts and paginates them, and renders the listing cards as HTML, JSON or text.\n\nExamples:\n  wavecat list -k projects -s https://example.com/data/projects.json -q eth\n  wavecat list -k posts -s ./data/latest-index.json -o latest.html\n  wavecat list -k waves -s ./data/wave-analysis.json\n  wavecat browse -k coins -s ./wave-analysis/data/coins.json\n  wavecat coin btc -s ./wave-analysis/data/coins.json\n  wavecat leverage -w 1000 -r 2 -l 5 -x 10\n\nTip: Use --config to keep the catalogue source and output settings out of every invocation."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv). RUST_LOG takes precedence."
    )]
    pub verbose: u8,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.wavecat/config.yml)."
    )]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render one page of a catalogue.
    List(ListArgs),
    /// Read control commands from stdin and redraw after each one.
    Browse(BrowseArgs),
    /// Render a coin's analysis page.
    Coin(CoinArgs),
    /// Position sizing for a fixed leverage or a fixed margin.
    Leverage(LeverageArgs),
    /// Write a commented default config file.
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    #[arg(
        short = 'k',
        long = "kind",
        visible_alias = "catalogue",
        value_name = "KIND",
        help_heading = "Input",
        help = "Catalogue kind: projects, posts, coins or waves."
    )]
    pub catalogue: Option<String>,

    #[arg(
        short = 's',
        long = "src",
        visible_alias = "source",
        value_name = "URL|PATH",
        help_heading = "Input",
        help = "Catalogue JSON location (http(s) URL, file:// URL or path)."
    )]
    pub source: Option<String>,

    #[arg(
        long = "ck",
        visible_alias = "collection-key",
        value_name = "KEY",
        help_heading = "Input",
        help = "Object key holding the record array (e.g. posts)."
    )]
    pub collection_key: Option<String>,

    #[arg(
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "ua",
        visible_alias = "user-agent",
        value_name = "UA",
        help_heading = "HTTP",
        help = "User-Agent header for HTTP sources."
    )]
    pub user_agent: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    #[arg(
        short = 'q',
        long = "q",
        visible_aliases = ["query", "search"],
        value_name = "TEXT",
        help_heading = "Query",
        help = "Free-text search (case-insensitive substring)."
    )]
    pub search: Option<String>,

    #[arg(
        short = 'g',
        long = "cat",
        visible_alias = "category",
        value_name = "NAME",
        help_heading = "Query",
        help = "Only records in this category (exact match)."
    )]
    pub category: Option<String>,

    #[arg(
        long = "so",
        visible_alias = "sort",
        value_name = "KEY",
        help_heading = "Query",
        help = "Sort: default, alphabetical or rank."
    )]
    pub sort: Option<String>,

    #[arg(
        short = 'n',
        long = "ps",
        visible_alias = "page-size",
        value_name = "N",
        help_heading = "Query",
        help = "Cards per page."
    )]
    pub page_size: Option<usize>,

    #[arg(
        long = "vst",
        visible_alias = "visible-statuses",
        value_name = "LIST",
        help_heading = "Query",
        help = "Statuses that pass the visibility gate (comma-separated, empty disables it)."
    )]
    pub visible_statuses: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the rendered output to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'f',
        long = "fmt",
        visible_alias = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: html, json or text (inferred from --output when omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 't',
        long = "tpl",
        visible_alias = "template",
        value_name = "FILE",
        help_heading = "Output",
        help = "Host page template with <!-- slot:NAME --> markers."
    )]
    pub template: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub query: QueryArgs,

    #[arg(
        short = 'p',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "Query",
        help = "Page to render (1-based; past the end shows the last page)."
    )]
    pub page: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub query: QueryArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CoinArgs {
    #[arg(value_name = "COIN", help = "Coin id, e.g. btc.")]
    pub coin: String,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LeverageArgs {
    #[arg(
        short = 'w',
        long = "wl",
        visible_alias = "wallet",
        value_name = "USD",
        help_heading = "Inputs",
        help = "Wallet balance in whole dollars."
    )]
    pub wallet: String,

    #[arg(
        short = 'r',
        long = "rk",
        visible_alias = "risk",
        value_name = "PCT",
        help_heading = "Inputs",
        help = "Risk per trade, percent of wallet."
    )]
    pub risk: f64,

    #[arg(
        short = 'l',
        long = "sl",
        visible_alias = "stop-loss",
        value_name = "PCT",
        allow_negative_numbers = true,
        help_heading = "Inputs",
        help = "Stop-loss distance in percent."
    )]
    pub stop_loss: f64,

    #[arg(
        short = 'x',
        long = "lv",
        visible_alias = "leverage",
        value_name = "X",
        allow_negative_numbers = true,
        conflicts_with = "margin",
        help_heading = "Mode",
        help = "Fixed leverage: compute the required margin."
    )]
    pub leverage: Option<f64>,

    #[arg(
        short = 'm',
        long = "mg",
        visible_alias = "margin",
        value_name = "USD",
        allow_negative_numbers = true,
        help_heading = "Mode",
        help = "Fixed margin: compute the required leverage."
    )]
    pub margin: Option<f64>,

    #[arg(
        short = 'f',
        long = "fmt",
        visible_alias = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: text, json or html."
    )]
    pub output_format: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct InitConfigArgs {
    #[arg(
        long = "pr",
        visible_alias = "print",
        help_heading = "Output",
        help = "Print the default config to stdout instead of writing it."
    )]
    pub print: bool,
}
