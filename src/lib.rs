pub mod beach;
pub mod config;
pub mod extract;
pub mod scraper;
pub mod writer;

use std::io;

use anyhow::{Context, Result};

pub use beach::{BeachRecord, FieldValue, BEACH_HEADERS};
pub use config::{ScraperConfig, BEACH_IDS};
pub use extract::{extract, Extraction};
pub use scraper::{Fetch, HttpFetcher};

/// Fetches and extracts every zone of [`BEACH_IDS`], keeping the ones that name a beach.
///
/// Missing columns and progress lines are written to `out`.
pub fn collect_beaches<F, W>(
    fetcher: &F,
    conf: &ScraperConfig,
    out: &mut W,
) -> Result<Vec<BeachRecord>>
where
    F: Fetch,
    W: io::Write,
{
    let mut beaches = vec![];

    for id in BEACH_IDS {
        let detail = fetcher.fetch(&conf.detail_url(id))?;
        let samples = fetcher.fetch(&conf.samples_url(id))?;

        let extraction = extract(&detail, &samples, &conf.adopted_by)
            .with_context(|| format!("Couldn't extract zone {id}"))?;
        let mut beach = match extraction {
            Extraction::Beach(beach) => beach,
            Extraction::Vacant => {
                log::info!("Skipping zone {id}: no beach name");
                continue;
            }
        };

        for column in beach.normalize() {
            log::warn!("Zone {id} has no value for {column}");
            writeln!(out, "{column}")?;
        }

        writeln!(out, "Data obtained for {}", beach.name().unwrap_or_default())?;
        beaches.push(beach);
    }

    Ok(beaches)
}

/// Runs the whole job against `fetcher`: template, zones, then the output files.
pub fn scrap_with<F, W>(
    fetcher: &F,
    conf: &ScraperConfig,
    out: &mut W,
) -> Result<Vec<BeachRecord>>
where
    F: Fetch,
    W: io::Write,
{
    let columns = writer::read_template(&conf.template)?;
    let beaches = collect_beaches(fetcher, conf, out)?;

    writer::write_beaches(&conf.output, &columns, &beaches)?;
    log::info!(
        "Wrote {} beaches to {}",
        beaches.len(),
        conf.output.display()
    );

    if let Some(history) = &conf.history {
        let rows = beaches.iter().flat_map(BeachRecord::history).collect::<Vec<_>>();
        writer::write_beaches(history, &columns, &rows)?;
        log::info!("Wrote {} measurements to {}", rows.len(), history.display());
    }

    Ok(beaches)
}

pub fn run_scrap(conf: &ScraperConfig) -> Result<()> {
    let fetcher = HttpFetcher::new(&conf.user_agent)?;
    scrap_with(&fetcher, conf, &mut io::stdout())?;
    Ok(())
}
