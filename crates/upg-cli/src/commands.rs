//! One-shot subcommands: print the tree, show a function, search, check,
//! mirror.

use std::path::PathBuf;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use upg_core::icons::unbundled_icons;
use upg_core::source::{self, DataSource};
use upg_core::{Config, DefPathKind, Explorer, FileSource, Kind, Navigation, Panel, SourceError};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Function documents downloaded at once by `mirror`.
const MIRROR_CONCURRENCY: usize = 8;

/// Load the navigation index, with a spinner while it downloads.
pub async fn open(config: &Config) -> Result<Explorer<Box<dyn DataSource>>> {
    let source = source::from_config(&config.data)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Loading {}", source.describe()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let explorer = Explorer::load(source).await;
    spinner.finish_and_clear();

    Ok(explorer?)
}

pub async fn navi(config: &Config, depth: Option<usize>) -> Result<()> {
    let explorer = open(config).await?;
    let navi = explorer.navigation();
    for root in navi.roots() {
        print_tree(navi, root, 0, depth);
    }
    Ok(())
}

fn print_tree(navi: &Navigation, idx: usize, level: usize, depth: Option<usize>) {
    if depth.is_some_and(|d| level >= d) {
        return;
    }
    if let Some(seg) = navi.path(idx).and_then(|p| p.last()) {
        println!("{}{} ({})", "  ".repeat(level), seg.name, seg.kind);
    }
    for child in navi.children(idx) {
        print_tree(navi, child, level + 1, depth);
    }
}

pub async fn show(config: &Config, name: &str, panel: Panel) -> Result<()> {
    let explorer = open(config).await?;
    let func = explorer.function(name).await?;

    println!("{}", func.name);
    println!("  {}", if func.safe { "safe" } else { "unsafe" });
    if !func.span.is_empty() {
        println!("  at {}", func.span);
    }
    let tags = func.tags();
    for tag in tags.render_all() {
        match &tag.desc {
            Some(desc) => println!("  #[{}] {}", tag.label, desc),
            None => println!("  #[{}]", tag.label),
        }
    }
    println!("\n--- {} ---\n", panel.label());
    println!("{}", panel.render(&func)?);
    Ok(())
}

pub async fn search(config: &Config, query: &str) -> Result<()> {
    let explorer = open(config).await?;
    let navi = explorer.navigation();
    for (idx, name) in navi.search(query) {
        let kind = navi.kind_of(idx).map(Kind::as_str).unwrap_or("?");
        println!("{idx:>6}  {name}  ({kind})");
    }
    Ok(())
}

pub async fn check(config: &Config) -> Result<()> {
    // Loading validates the document.
    let explorer = open(config).await?;
    let navi = explorer.navigation();

    let functions = (0..navi.len()).filter(|&idx| navi.is_fn(idx)).count();
    println!("Navigation OK: {} paths, {} functions", navi.len(), functions);
    match navi.version {
        Some(v) => println!("  schema version {v}"),
        None => println!("  unversioned document"),
    }
    for kind in DefPathKind::ALL {
        let count = navi.of_kind(kind).len();
        if count > 0 {
            println!("  {:>8} {}", count, kind);
        }
    }

    let mut unknown: Vec<&str> = navi
        .data
        .iter()
        .flatten()
        .filter(|seg| matches!(seg.kind, Kind::Unrecognized(_)))
        .map(|seg| seg.kind.as_str())
        .collect();
    unknown.sort_unstable();
    unknown.dedup();
    if !unknown.is_empty() {
        println!("  kinds unknown to this version: {}", unknown.join(", "));
    }

    for (kind, icon) in unbundled_icons() {
        println!("  icon {icon} for {kind} is not bundled");
    }
    Ok(())
}

pub async fn mirror(config: &Config, out: PathBuf) -> Result<()> {
    let explorer = open(config).await?;
    let navi = explorer.navigation();
    let target = FileSource::with_config(&out, &config.data);
    target.save_navigation(navi).await?;

    let names: Vec<&str> = (0..navi.len())
        .filter(|&idx| navi.is_fn(idx))
        .filter_map(|idx| navi.name_of(idx))
        .collect();

    let progress = ProgressBar::new(names.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let explorer = &explorer;
    let target = &target;
    let progress_ref = &progress;
    let results: Vec<std::result::Result<bool, SourceError>> = stream::iter(names)
        .map(|name| async move {
            progress_ref.set_message(name.to_string());
            let saved = match explorer.function(name).await {
                Ok(func) => target.save_function(name, &func).await.map(|_| true),
                Err(SourceError::NotFound(_)) => {
                    warn!(function = %name, "no document published");
                    Ok(false)
                }
                Err(e) => Err(e),
            };
            progress_ref.inc(1);
            saved
        })
        .buffer_unordered(MIRROR_CONCURRENCY)
        .collect()
        .await;
    progress.finish_and_clear();

    let mut saved = 0;
    let mut skipped = 0;
    for result in results {
        if result? {
            saved += 1;
        } else {
            skipped += 1;
        }
    }
    println!(
        "Mirrored {} functions into {} ({} without a document)",
        saved,
        target.root().display(),
        skipped
    );
    Ok(())
}
