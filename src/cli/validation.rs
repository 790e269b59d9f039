use crate::catalogue::{CatalogueKind, SortKey};
use crate::cli::args::{Command, CliArgs, OutputArgs, QueryArgs, SourceArgs};
use crate::output::OutputFormat;

fn validate_source(args: &SourceArgs) -> Result<(), String> {
    if let Some(raw) = args.catalogue.as_deref() {
        if CatalogueKind::parse(raw).is_none() {
            return Err(format!(
                "invalid --catalogue '{raw}', expected projects, posts, coins or waves"
            ));
        }
    }
    if let Some(raw) = args.source.as_deref() {
        if raw.trim().is_empty() {
            return Err("invalid --source, expected a URL or path".to_string());
        }
    }
    if args.timeout == Some(0) {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    Ok(())
}

fn validate_query(args: &QueryArgs) -> Result<(), String> {
    if let Some(raw) = args.sort.as_deref() {
        if SortKey::parse(raw).is_none() {
            return Err(format!(
                "invalid --sort '{raw}', expected default, alphabetical or rank"
            ));
        }
    }
    if args.page_size == Some(0) {
        return Err("invalid page-size, expected positive integer".to_string());
    }
    Ok(())
}

fn validate_output(args: &OutputArgs) -> Result<(), String> {
    validate_format(args.output_format.as_deref())
}

fn validate_format(raw: Option<&str>) -> Result<(), String> {
    if let Some(raw) = raw {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --format '{raw}', expected html, json or text"
            ));
        }
    }
    Ok(())
}

/// Rejects bad flag values before any I/O happens.
pub fn validate(args: &CliArgs) -> Result<(), String> {
    match &args.command {
        Command::List(list) => {
            validate_source(&list.source)?;
            validate_query(&list.query)?;
            validate_output(&list.output)?;
            if list.page == Some(0) {
                return Err("invalid page, expected positive integer".to_string());
            }
        }
        Command::Browse(browse) => {
            validate_source(&browse.source)?;
            validate_query(&browse.query)?;
            validate_output(&browse.output)?;
        }
        Command::Coin(coin) => {
            validate_source(&coin.source)?;
            validate_output(&coin.output)?;
            crate::render::coin::validate_coin_id(&coin.coin)?;
        }
        Command::Leverage(lev) => {
            validate_format(lev.output_format.as_deref())?;
            if lev.leverage.is_none() && lev.margin.is_none() {
                return Err("one of --leverage or --margin is required".to_string());
            }
        }
        Command::InitConfig(_) => {}
    }
    Ok(())
}
