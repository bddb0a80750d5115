use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use tokio::sync::oneshot;
use tracing::{error, info};

use super::event::Event;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub type DefaultEventsRx = oneshot::Receiver<Result<Vec<Event>>>;

/// Load the read-only default events from an `http(s)` URL or a local JSON file.
pub async fn fetch_default_events(source: &str) -> Result<Vec<Event>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        let events = client
            .get(source)
            .send()
            .await
            .wrap_err_with(|| format!("Request to {source} failed"))?
            .error_for_status()
            .wrap_err("Failed to fetch default events")?
            .json::<Vec<Event>>()
            .await
            .wrap_err("Default events response is not a JSON event list")?;
        Ok(events)
    } else {
        let content = tokio::fs::read_to_string(source)
            .await
            .wrap_err_with(|| format!("Failed to read {source}"))?;
        serde_json::from_str(&content).wrap_err_with(|| format!("Failed to parse {source}"))
    }
}

/// Start the fetch on `runtime`. The receiver yields exactly one result.
pub fn spawn_fetch(runtime: &tokio::runtime::Runtime, source: String) -> DefaultEventsRx {
    let (tx, rx) = oneshot::channel();
    runtime.spawn(async move {
        info!(%source, "fetching default events");
        let result = fetch_default_events(&source).await;
        if let Err(ref err) = result {
            let cause = format!("{err:#}");
            error!(error = %cause, "Failed to load default events");
        }
        let _ = tx.send(result);
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn reads_default_events_from_a_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defaults.json");
        std::fs::write(
            &path,
            r#"[{"title":"New Year","date":"2026-01-01","start":"00:00","end":"23:59","category":"Holiday"}]"#,
        )
        .unwrap();

        let events = runtime()
            .block_on(fetch_default_events(path.to_str().unwrap()))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "New Year");
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let result = runtime().block_on(fetch_default_events(path.to_str().unwrap()));
        assert!(result.is_err());
    }

    #[test]
    fn spawned_fetch_delivers_through_the_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defaults.json");
        std::fs::write(&path, "[]").unwrap();

        let rt = runtime();
        let rx = spawn_fetch(&rt, path.to_string_lossy().into_owned());
        let events = rt.block_on(rx).unwrap().unwrap();
        assert!(events.is_empty());
    }
}
