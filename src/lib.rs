//! # bookmark-classifier
//!
//! Classifies a web page into a bookmark folder path and a set of tags by asking an
//! OpenAI-compatible chat-completion endpoint, then files the bookmark under that
//! folder hierarchy.
//!
//! ## Overview
//!
//! Most of the work is choosing *where* to send the request:
//!
//! - the provider is inferred from the credential text, unless the user pinned one
//! - OpenRouter's model catalog is fetched at runtime and cached for 15 minutes, with
//!   the stale copy served when a refetch fails
//! - when OpenRouter rejects the selected model (HTTP 404), a replacement is picked
//!   from the catalog, persisted, and the request is retried once
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bookmark_classifier::storage::{JsonFileStore, Storage};
//! use bookmark_classifier::Classifier;
//!
//! #[tokio::main]
//! async fn main() -> bookmark_classifier::Result<()> {
//!     let classifier = Classifier::builder()
//!         .storage(Storage::new(JsonFileStore::new("./bookmark-data")))
//!         .build()?;
//!
//!     classifier.credentials().save("sk-or-v1-...").await?;
//!     let result = classifier
//!         .classify("https://github.com/tokio-rs/tokio", "Tokio")
//!         .await?;
//!     println!("{:?} {:?}", result.folder_path, result.tags);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`classifier`] | Request orchestration, prompt, response parsing |
//! | [`provider`] | Static provider catalog and credential-based resolution |
//! | [`models`] | Model catalog cache and default model selection |
//! | [`credential`] | Credential persistence |
//! | [`preferences`] | Provider preference and selected model |
//! | [`storage`] | Scoped key-value storage backends |
//! | [`bookmarks`] | Folder materialization on the host bookmark tree |
//! | [`messaging`] | Message boundary to the materializer |
//! | [`events`] | Optional lifecycle events for analytics |

pub mod bookmarks;
pub mod classifier;
pub mod config;
pub mod credential;
pub mod error_code;
pub mod events;
pub mod messaging;
pub mod models;
pub mod preferences;
pub mod provider;
pub mod storage;
pub mod transport;

pub use classifier::{Attempt, ClassificationResult, Classifier, ClassifierBuilder};
pub use config::ClassifierConfig;
pub use credential::{Credential, CredentialStore};
pub use models::{ModelCacheEnvelope, ModelCatalog, ModelDescriptor};
pub use provider::{resolve_provider, ProviderDescriptor, ProviderId};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
