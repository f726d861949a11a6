use std::{future::Future, path::PathBuf, time::Duration};

use tokio::task::JoinSet;
use tracing::warn;

/// Outcome of waiting for card images before printing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardReadiness {
    pub ready: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    /// Set when the wait gave up before every image reported back.
    pub timed_out: bool,
}

impl CardReadiness {
    pub fn settled(&self) -> usize {
        self.ready.len() + self.missing.len()
    }
}

/// Wait until every card image has loaded or failed, giving up after `timeout`.
///
/// An empty list returns immediately.
pub async fn await_cards(paths: Vec<PathBuf>, timeout: Duration) -> CardReadiness {
    join_probes(paths, timeout, probe_file).await
}

async fn probe_file(path: PathBuf) -> bool {
    match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata.is_file() && metadata.len() > 0,
        Err(_) => false,
    }
}

pub(crate) async fn join_probes<F, Fut>(
    paths: Vec<PathBuf>,
    timeout: Duration,
    probe: F,
) -> CardReadiness
where
    F: Fn(PathBuf) -> Fut,
    Fut: Future<Output = bool> + Send + 'static,
{
    let mut readiness = CardReadiness::default();
    if paths.is_empty() {
        return readiness;
    }

    let expected = paths.len();
    let mut probes = JoinSet::new();
    for path in paths {
        let pending = probe(path.clone());
        probes.spawn(async move { (path, pending.await) });
    }

    let collect = async {
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok((path, true)) => readiness.ready.push(path),
                Ok((path, false)) => readiness.missing.push(path),
                Err(err) => warn!("Card probe task failed: {err}"),
            }
        }
    };

    if tokio::time::timeout(timeout, collect).await.is_err() {
        warn!(
            expected,
            settled = readiness.settled(),
            timeout_ms = timeout.as_millis() as u64,
            "Timed out waiting for card images; printing anyway"
        );
        readiness.timed_out = true;
    }
    readiness
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn empty_list_returns_immediately() {
        let readiness = await_cards(Vec::new(), Duration::ZERO).await;
        assert_eq!(readiness, CardReadiness::default());
    }

    #[tokio::test]
    async fn sorts_ready_and_missing_cards() -> Result<()> {
        let dir = tempdir()?;
        let present = dir.path().join("present.gif");
        let empty = dir.path().join("empty.gif");
        let absent = dir.path().join("absent.gif");
        fs::write(&present, b"GIF89a")?;
        fs::write(&empty, b"")?;

        let readiness = await_cards(
            vec![present.clone(), empty.clone(), absent.clone()],
            Duration::from_secs(5),
        )
        .await;
        assert!(!readiness.timed_out);
        assert_eq!(readiness.ready, vec![present]);
        assert_eq!(readiness.missing.len(), 2);
        assert!(readiness.missing.contains(&empty));
        assert!(readiness.missing.contains(&absent));
        Ok(())
    }

    #[tokio::test]
    async fn hung_probe_is_bounded_by_timeout() {
        let paths = vec![PathBuf::from("fast.gif"), PathBuf::from("hung.gif")];
        let readiness = join_probes(paths, Duration::from_millis(50), |path: PathBuf| async move {
            if path.ends_with("hung.gif") {
                std::future::pending::<()>().await;
            }
            true
        })
        .await;
        assert!(readiness.timed_out);
        assert_eq!(readiness.ready, vec![PathBuf::from("fast.gif")]);
        assert!(readiness.missing.is_empty());
    }
}
