//! Classify a page and file it as a bookmark
//!
//! ```text
//! BOOKMARK_CLASSIFIER_API_KEY=sk-or-v1-... \
//!     cargo run --example classify -- https://github.com/tokio-rs/tokio "Tokio"
//! ```
//!
//! Settings and the model catalog cache are kept under `./bookmark-data`. The
//! bookmark tree is in memory, so the printed node is the only trace of it.

use anyhow::{bail, Context};
use bookmark_classifier::bookmarks::{FolderMaterializer, MemoryBookmarkTree};
use bookmark_classifier::messaging::{handle_message, BookmarkMessage};
use bookmark_classifier::storage::{JsonFileStore, Storage};
use bookmark_classifier::Classifier;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookmark_classifier=info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let url = args.next().context("usage: classify <url> [title]")?;
    let title = args.next().unwrap_or_else(|| url.clone());

    let classifier = Classifier::builder()
        .storage(Storage::new(JsonFileStore::new("./bookmark-data")))
        .build()?;

    if let Ok(key) = std::env::var("BOOKMARK_CLASSIFIER_API_KEY") {
        classifier.credentials().save(&key).await?;
    }

    let provider = classifier
        .current_provider()
        .await
        .context("no API key saved; set BOOKMARK_CLASSIFIER_API_KEY")?;
    println!("Provider: {} ({})", provider.display_name, provider.model);

    let classification = match classifier.classify(&url, &title).await {
        Ok(classification) => classification,
        Err(e) => bail!(e.user_message()),
    };
    println!("Folder:   {}", classification.folder_path.join(" / "));
    println!("Tags:     {}", classification.tags.join(", "));

    let materializer = FolderMaterializer::new(Arc::new(MemoryBookmarkTree::new()));
    let request = BookmarkMessage::create_bookmark(&url, &title, classification).to_value()?;
    let response = handle_message(&materializer, &request).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
