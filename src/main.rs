mod cli;
mod config;
mod files;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use episweep_table::{ExportParser, ParsedExport, ReconcileMode, ReconcileRequest};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "episweep=trace,episweep_table=trace".to_string()
        } else {
            "episweep=info,episweep_table=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_config_or_default(cli.config.as_deref())?;
    let parser = ExportParser::new(config.parser_config());

    match cli.command {
        Commands::Check { file, output, json } => check_file(&parser, &file, output.as_deref(), json, config.write.backup),
        Commands::Columns { file, json } => show_columns(&parser, &file, json),
        Commands::Reconcile {
            file,
            episodes,
            mode,
            write,
            no_backup,
            json,
        } => reconcile_file(
            &parser,
            &file,
            episodes,
            &mode,
            write,
            config.write.backup && !no_backup,
            json,
        ),
        Commands::Version => {
            println!("episweep {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn check_file(
    parser: &ExportParser,
    file: &Path,
    output: Option<&Path>,
    json: bool,
    backup: bool,
) -> Result<()> {
    let text = files::read_export(file)?;
    let parsed = parser.parse(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&check_report(&parsed))?);
    } else {
        println!(
            "{}: {} columns, {} rows{}",
            file.display(),
            parsed.table.headers().len(),
            parsed.table.row_count(),
            if parsed.repaired { " (resynchronized)" } else { "" }
        );
        for diag in &parsed.diagnostics {
            println!("  warning: {diag}");
        }
    }

    if let Some(out) = output {
        files::write_export(out, &episweep_table::serialize(&parsed.table), backup)?;
        tracing::info!(output = %out.display(), "wrote normalized export");
    }
    Ok(())
}

fn check_report(parsed: &ParsedExport) -> serde_json::Value {
    serde_json::json!({
        "columns": parsed.table.headers(),
        "row_count": parsed.table.row_count(),
        "repaired": parsed.repaired,
        "diagnostics": parsed.diagnostics,
    })
}

fn show_columns(parser: &ExportParser, file: &Path, json: bool) -> Result<()> {
    let text = files::read_export(file)?;
    let parsed = parser.parse(&text);
    let columns = parser.resolve_columns(parsed.table.headers());

    if json {
        let role = |m: &Option<episweep_table::ColumnMatch>| {
            m.as_ref().map(|m| {
                serde_json::json!({ "index": m.index, "header": m.header, "alias": m.alias })
            })
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "episode_number": role(&columns.episode),
                "title": role(&columns.title),
            }))?
        );
        return Ok(());
    }

    match &columns.episode {
        Some(m) => println!(
            "episode number: column {} ({:?}, matched alias {:?})",
            m.index, m.header, m.alias
        ),
        None => println!("episode number: not found"),
    }
    match &columns.title {
        Some(m) => println!(
            "title: column {} ({:?}, matched alias {:?})",
            m.index, m.header, m.alias
        ),
        None => println!("title: not found"),
    }
    Ok(())
}

fn reconcile_file(
    parser: &ExportParser,
    file: &Path,
    episodes: Vec<i64>,
    mode: &str,
    write: bool,
    backup: bool,
    json: bool,
) -> Result<()> {
    let mode: ReconcileMode = mode
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("Invalid --mode")?;
    let request = ReconcileRequest {
        episode_numbers: episodes,
        mode,
    };

    let text = files::read_export(file)?;
    let report = parser.reconcile_export(&text, &request)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "remaining_row_count": report.remaining_row_count,
                "removed_count": report.removed_count,
                "removed_episode_numbers": report.removed_episode_numbers,
                "repaired": report.repaired,
                "diagnostics": report.diagnostics,
                "written": write,
            }))?
        );
    } else {
        println!(
            "{mode}: removed {} row(s) {:?}, {} remaining",
            report.removed_count, report.removed_episode_numbers, report.remaining_row_count
        );
        for diag in &report.diagnostics {
            println!("  warning: {diag}");
        }
    }

    if write {
        files::write_export(file, &report.output, backup)?;
        tracing::info!(file = %file.display(), "wrote reconciled export");
    } else if !json {
        println!("(dry run; pass --write to update the file)");
    }
    Ok(())
}
