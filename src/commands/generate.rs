//! Generate static files

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::ContentLoader;
use crate::generator::Generator;
use crate::Site;

/// Load all content and write the site to the public directory
pub fn run(site: &Site) -> Result<()> {
    let start = Instant::now();

    let store = ContentLoader::new(site).load_all()?;
    tracing::info!("Loaded {} posts", store.len());

    Generator::new(site)?.generate(&store)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch for file changes and regenerate
///
/// A failed generation is logged and the watch keeps going, so fixing the
/// broken file triggers the next build.
pub fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&site.content_dir, &site.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
        }
    }

    let config_path = site.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                for event in &events {
                    tracing::debug!("File changed: {}", event.path.display());
                }

                // Re-read the config so edits to it apply to this build
                let result = Site::new(&site.base_dir).and_then(|site| run(&site));
                if let Err(e) = result {
                    tracing::error!("Generation failed: {:#}", e);
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(_) => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_generates_site() {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("content/blog");
        fs::create_dir_all(&blog).unwrap();
        fs::write(
            blog.join("first.md"),
            "---\ntitle: First\ndescription: d\npublished: 02 02 2024 1 PM\n---\nHi\n",
        )
        .unwrap();

        let site = Site::new(tmp.path()).unwrap();
        run(&site).unwrap();
        assert!(tmp.path().join("public/blog/first/index.html").is_file());
    }

    #[test]
    fn test_run_fails_fast() {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("content/blog");
        fs::create_dir_all(&blog).unwrap();
        fs::write(blog.join("broken.md"), "no front-matter here").unwrap();

        let site = Site::new(tmp.path()).unwrap();
        let err = run(&site).unwrap_err();
        assert!(err.to_string().contains("broken.md"));
        assert!(!tmp.path().join("public").exists());
    }
}
