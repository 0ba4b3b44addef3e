//! Wiring between CLI arguments and the enrichment pipeline.

use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::warn;

use lookup_enrich::config::{Config, generate_template};
use lookup_enrich::execution::{StreamProcessor, TracingObserver};
use lookup_enrich::ingestion::load_reference_table;
use lookup_enrich::processing::{DnsResolver, Enricher, LookupSource};
use lookup_enrich::rule::MappingRule;

use crate::args::{Cli, Command};

/// Run the command selected by `cli`.
pub fn execute(cli: Cli) -> Result<()> {
    if let Some(Command::GenerateConfig { file }) = &cli.command {
        return generate_config(file);
    }
    enrich(cli)
}

fn generate_config(file: &Path) -> Result<()> {
    let config = generate_template(file).with_context(|| format!("processing file {}", file.display()))?;

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &config).context("writing config template")?;
    writeln!(out)?;
    Ok(())
}

fn enrich(cli: Cli) -> Result<()> {
    let Some(mapping) = cli.mapping.as_deref() else {
        bail!("-m/--mapping is required");
    };
    if !cli.dns && cli.config.is_none() {
        bail!("-c/--config is required unless --dns is specified");
    }
    if cli.dns && cli.config.is_some() {
        warn!("-c/--config is ignored when --dns is specified");
    }
    if !cli.dns && cli.dns_server.is_some() {
        warn!("--dns-server is ignored unless --dns is specified");
    }

    let rule = MappingRule::parse(mapping).context("parsing mapping rule")?;

    let source = match (&cli.config, cli.dns) {
        (Some(config_path), false) => table_source(config_path, &rule)?,
        _ => {
            let server = cli.dns_server.as_deref().unwrap_or("");
            LookupSource::Dns(DnsResolver::new(server).context("setting up DNS resolver")?)
        }
    };

    let processor = StreamProcessor::new(Enricher::new(rule, source)).with_observer(Arc::new(TracingObserver));

    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());
    processor.process(stdin, stdout).context("processing input")?;
    Ok(())
}

fn table_source(config_path: &Path, rule: &MappingRule) -> Result<LookupSource> {
    let config = Config::load(config_path)
        .with_context(|| format!("loading config file {}", config_path.display()))?;
    let matcher = config.select_matcher(rule)?.clone();

    let data_path = config.data_source_path(config_path);
    let table = load_reference_table(&data_path)
        .with_context(|| format!("loading data source {}", data_path.display()))?;

    Ok(LookupSource::table(table, matcher))
}
