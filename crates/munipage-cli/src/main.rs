//! munipage command-line tools.
//!
//! Works on page files: the JSON documents the page store holds, one page
//! each.
//!
//! Usage:
//!   # Render a page as visitors see it
//!   munipage render pages/deportes.json --out deportes.html
//!
//!   # Validate before publishing
//!   munipage check pages/deportes.json
//!
//!   # Move block <active> to where block <over> is
//!   munipage reorder pages/deportes.json <active> <over> --in-place
//!
//!   # Start a page, then save it into a directory store
//!   munipage init /deportes --title Deportes --out deportes.json
//!   munipage publish deportes.json --store ./site
//!
//! Logs go to stderr; set `RUST_LOG` to change the level.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::fs;
use tracing_subscriber::{EnvFilter, fmt};

use munipage_editor::validate::has_blocking;
use munipage_editor::{
    EditorConfig, LocalPageStore, PageSeed, PageStore, default_blocks, ensure_path, reorder,
    timestamp, validate_page,
};
use munipage_render::{RenderContext, compose, render_page};
use munipage_types::{BlockId, PageContent, featured_cards};

/// Render, check and edit munipage page files.
#[derive(Parser, Debug)]
#[command(name = "munipage", version)]
#[command(about = "Render, check and edit munipage page files")]
struct Args {
    /// Editor config (RON); defaults to <config_dir>/munipage/editor.ron
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a page file to HTML
    Render {
        page: PathBuf,

        /// Render the editing surface instead of the public view
        #[arg(long)]
        edit: bool,

        /// Print the composed cells (id, kind, width, columns) as JSON
        #[arg(long)]
        summary: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Validate a page file; exits non-zero on blocking issues
    Check { page: PathBuf },

    /// Move block <active> to the position of block <over>
    Reorder {
        page: PathBuf,
        active: String,
        over: String,

        /// Rewrite the page file instead of printing the result
        #[arg(long)]
        in_place: bool,
    },

    /// Print the featured cards a save of this page would mirror
    Featured { page: PathBuf },

    /// Create a page file with the default hero and text blocks
    Init {
        /// Site path of the page, e.g. /deportes
        path: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        subtitle: Option<String>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Save a page file into a directory store
    Publish {
        page: PathBuf,

        /// Store root (pages/ and featured_cards.json live under it)
        #[arg(long)]
        store: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = EditorConfig::load(args.config.as_deref()).context("loading editor config")?;

    match args.command {
        Command::Render {
            page,
            edit,
            summary,
            out,
        } => render(&config, &page, edit, summary, out.as_deref()).await,
        Command::Check { page } => check(&config, &page).await,
        Command::Reorder {
            page,
            active,
            over,
            in_place,
        } => reorder_blocks(&page, &active, &over, in_place).await,
        Command::Featured { page } => {
            let page = read_page(&page).await?;
            let cards = featured_cards(&page, &timestamp());
            emit(None, &serde_json::to_string_pretty(&cards)?).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Init {
            path,
            title,
            subtitle,
            out,
        } => init(&path, &title, subtitle, out.as_deref()).await,
        Command::Publish { page, store } => publish(&config, &page, &store).await,
    }
}

async fn read_page(path: &Path) -> Result<PageContent> {
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("decoding page {}", path.display()))
}

async fn write_page(path: &Path, page: &PageContent) -> Result<()> {
    let json = serde_json::to_string_pretty(page)?;
    fs::write(path, json + "\n")
        .await
        .with_context(|| format!("writing {}", path.display()))
}

/// Write `text` to `out`, or to stdout.
async fn emit(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => fs::write(path, text)
            .await
            .with_context(|| format!("writing {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

async fn render(
    config: &EditorConfig,
    path: &Path,
    edit: bool,
    summary: bool,
    out: Option<&Path>,
) -> Result<ExitCode> {
    let page = read_page(path).await?;
    let images = config.image_policy();
    let ctx = if edit {
        RenderContext::edit(&images)
    } else {
        RenderContext::display(&images)
    };
    let text = if summary {
        compose(&page.blocks, &ctx, None).summary_json()?
    } else {
        render_page(&page, &ctx).to_html()
    };
    emit(out, &text).await?;
    tracing::debug!(page = %page.path, blocks = page.blocks.len(), edit, "page rendered");
    Ok(ExitCode::SUCCESS)
}

async fn check(config: &EditorConfig, path: &Path) -> Result<ExitCode> {
    let page = read_page(path).await?;
    let issues = validate_page(&page, &config.image_policy());
    for issue in &issues {
        println!("{issue}");
    }
    if has_blocking(&issues) {
        return Ok(ExitCode::FAILURE);
    }
    if issues.is_empty() {
        println!("{}: ok", page.path);
    }
    Ok(ExitCode::SUCCESS)
}

async fn reorder_blocks(path: &Path, active: &str, over: &str, in_place: bool) -> Result<ExitCode> {
    let mut page = read_page(path).await?;
    let active = BlockId::parse(active)?;
    let over = BlockId::parse(over)?;
    for id in [&active, &over] {
        if page.position(id).is_none() {
            bail!("no block {id} in {}", path.display());
        }
    }
    page.blocks = reorder(page.blocks, &active, &over);

    if in_place {
        write_page(path, &page).await?;
        tracing::info!(file = %path.display(), active = %active, over = %over, "blocks reordered");
    } else {
        emit(None, &serde_json::to_string_pretty(&page)?).await?;
    }
    Ok(ExitCode::SUCCESS)
}

async fn init(path: &str, title: &str, subtitle: Option<String>, out: Option<&Path>) -> Result<ExitCode> {
    let path = ensure_path(path);
    let seed = PageSeed {
        subtitle: subtitle.clone(),
        ..PageSeed::new(title).with_href(path.as_str())
    };
    let page = PageContent {
        subtitle,
        blocks: default_blocks(&seed),
        ..PageContent::new(path.as_str(), title)
    };
    match out {
        Some(file) => write_page(file, &page).await?,
        None => emit(None, &serde_json::to_string_pretty(&page)?).await?,
    }
    Ok(ExitCode::SUCCESS)
}

async fn publish(config: &EditorConfig, path: &Path, root: &Path) -> Result<ExitCode> {
    let page = read_page(path).await?;
    let issues = validate_page(&page, &config.image_policy());
    if has_blocking(&issues) {
        for issue in &issues {
            eprintln!("{issue}");
        }
        tracing::warn!(page = %page.path, "not published: page has blocking issues");
        return Ok(ExitCode::FAILURE);
    }

    let store = LocalPageStore::new(root);
    let stored = store
        .upsert(page)
        .await
        .with_context(|| format!("saving into {}", root.display()))?;
    let file = store.page_file(&stored.path)?;
    tracing::info!(page = %stored.path, file = %file.display(), "page published");
    println!(
        "{} {}",
        stored.path,
        stored.updated_at.as_deref().unwrap_or_default()
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_reorder() {
        let args = Args::try_parse_from([
            "munipage", "reorder", "p.json", "a", "c", "--in-place", "--config", "x.ron",
        ])
        .unwrap();
        assert_eq!(args.config.as_deref(), Some(Path::new("x.ron")));
        let Command::Reorder { active, over, in_place, .. } = args.command else {
            panic!("expected reorder");
        };
        assert_eq!((active.as_str(), over.as_str(), in_place), ("a", "c", true));
    }

    #[tokio::test]
    async fn test_init_then_reorder_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("deportes.json");
        init("deportes", "Deportes", None, Some(file.as_path())).await.unwrap();

        let page = read_page(&file).await.unwrap();
        assert_eq!(page.path, "/deportes");
        let ids: Vec<_> = page.blocks.iter().map(|b| b.id().to_string()).collect();
        assert_eq!(ids.len(), 2);

        reorder_blocks(&file, &ids[0], &ids[1], true).await.unwrap();
        let page = read_page(&file).await.unwrap();
        let reordered: Vec<_> = page.blocks.iter().map(|b| b.id().to_string()).collect();
        assert_eq!(reordered, vec![ids[1].clone(), ids[0].clone()]);

        assert!(reorder_blocks(&file, "missing", &ids[0], true).await.is_err());
    }

    #[tokio::test]
    async fn test_publish_writes_store() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("p.json");
        init("/cultura", "Cultura", Some("Talleres".into()), Some(file.as_path()))
            .await
            .unwrap();
        let root = dir.path().join("site");
        publish(&EditorConfig::default(), &file, &root).await.unwrap();
        assert!(root.join("pages").join("cultura.json").exists());
    }
}
