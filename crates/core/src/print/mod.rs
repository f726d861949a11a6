//! Print composition: summary table, paginated card grid and the async job
//! that waits for card images before writing the document.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::AppConfig;

/// Document model and HTML rendering.
#[allow(missing_docs)]
pub mod document;
/// Bounded waiting for card images.
#[allow(missing_docs)]
pub mod wait;

pub use document::{paginate, PrintDocument, CARDS_PER_PAGE};
pub use wait::{await_cards, CardReadiness};

/// Result of a finished print job.
#[derive(Debug, Clone)]
pub struct PrintOutcome {
    /// Written HTML document.
    pub path: PathBuf,
    /// Number of card pages in the document.
    pub pages: usize,
    /// Card image wait result.
    pub readiness: CardReadiness,
}

/// Writes print documents once their card images are available.
#[derive(Debug, Clone)]
pub struct PrintJob {
    output_dir: PathBuf,
    placeholder: PathBuf,
    timeout: Duration,
}

impl PrintJob {
    /// Create a job writing into `output_dir`.
    pub fn new(
        output_dir: impl Into<PathBuf>,
        placeholder: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            placeholder: placeholder.into(),
            timeout,
        }
    }

    /// Build a job from the configured print directory and timeout.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.print_dir.clone(),
            config.placeholder_card.clone(),
            config.print_timeout(),
        )
    }

    /// Directory documents are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Wait for the document's card images, then write it to disk.
    pub async fn run(&self, mut document: PrintDocument) -> Result<PrintOutcome> {
        let readiness = await_cards(document.card_paths(), self.timeout).await;
        document.apply_readiness(&readiness, &self.placeholder);

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("failed to create {}", self.output_dir.display()))?;

        let file_name = format!(
            "force-{}.html",
            document.generated_at.format("%Y%m%d-%H%M%S%.3f")
        );
        let path = self.output_dir.join(file_name);
        tokio::fs::write(&path, document.render_html())
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        let pages = document.page_count();
        info!(
            path = %path.display(),
            pages,
            cards = document.cards.len(),
            missing = readiness.missing.len(),
            timed_out = readiness.timed_out,
            "Force printout written"
        );
        Ok(PrintOutcome {
            path,
            pages,
            readiness,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cards::CardResolver,
        models::{Experience, UnitDefinition, UnitType},
        roster::ForceRoster,
    };
    use chrono::{Local, TimeZone};
    use std::{fs, sync::Arc};
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_document_with_cards() -> Result<()> {
        let dir = tempdir()?;
        let cards = dir.path().join("Cards");
        fs::create_dir_all(&cards)?;
        fs::write(cards.join("Scorpion.gif"), b"GIF89a")?;
        let placeholder = dir.path().join("placeholder.png");

        let resolver = CardResolver::new(&cards, &placeholder);
        let mut roster = ForceRoster::new();
        let scorpion = Arc::new(UnitDefinition::new("Scorpion", UnitType::Vehicle, 3, 4.2));
        roster.add(Arc::clone(&scorpion), Experience::Veteran);
        roster.add(scorpion, Experience::Regular);
        roster.add(
            Arc::new(UnitDefinition::new("Ghost", UnitType::Infantry, 2, 3.0)),
            Experience::Regular,
        );

        let document = PrintDocument::build(&roster, &resolver, Local::now());
        let job = PrintJob::new(dir.path().join("prints"), &placeholder, Duration::from_secs(5));
        let outcome = job.run(document).await?;

        assert!(outcome.path.starts_with(job.output_dir()));
        assert_eq!(outcome.pages, 1);
        assert_eq!(outcome.readiness.ready.len(), 1);
        assert!(!outcome.readiness.timed_out);

        let html = fs::read_to_string(&outcome.path)?;
        assert!(html.contains("Scorpion.gif"));
        assert!(html.contains("Ghost (card missing)"));
        assert!(html.contains("<td>10</td>"));
        Ok(())
    }

    #[tokio::test]
    async fn empty_force_prints_without_waiting() -> Result<()> {
        let dir = tempdir()?;
        let resolver = CardResolver::new(dir.path(), dir.path().join("placeholder.png"));
        let document = PrintDocument::build(&ForceRoster::new(), &resolver, Local::now());
        let job = PrintJob::new(dir.path(), dir.path().join("placeholder.png"), Duration::ZERO);
        let outcome = job.run(document).await?;
        assert_eq!(outcome.pages, 0);
        assert!(!outcome.readiness.timed_out);
        assert!(outcome.path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn prints_in_the_same_second_keep_separate_files() -> Result<()> {
        let dir = tempdir()?;
        let resolver = CardResolver::new(dir.path(), dir.path().join("placeholder.png"));
        let job = PrintJob::new(dir.path(), dir.path().join("placeholder.png"), Duration::ZERO);
        let base = Local
            .with_ymd_and_hms(2024, 5, 4, 18, 30, 0)
            .single()
            .expect("valid timestamp");

        let first = PrintDocument::build(&ForceRoster::new(), &resolver, base);
        let second = PrintDocument::build(
            &ForceRoster::new(),
            &resolver,
            base + chrono::Duration::milliseconds(250),
        );
        let first = job.run(first).await?;
        let second = job.run(second).await?;

        assert_ne!(first.path, second.path);
        assert!(first.path.exists() && second.path.exists());
        assert!(first.path.ends_with("force-20240504-183000.000.html"));
        Ok(())
    }
}
