//! Folder materialization on top of the host bookmark tree.
//!
//! The host tree is consumed through [`BookmarkTree`]: list the children of a folder,
//! create a folder or a leaf bookmark under a parent. [`FolderMaterializer`] walks a
//! classification's folder path from the bookmarks root, reusing folders that already
//! exist and creating the rest, then files the bookmark in the innermost folder.

use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Folder new bookmarks are filed under.
pub const BOOKMARKS_ROOT_ID: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub title: String,
    /// `None` for folders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl BookmarkNode {
    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }
}

#[async_trait]
pub trait BookmarkTree: Send + Sync {
    async fn children(&self, parent_id: &str) -> Result<Vec<BookmarkNode>>;
    /// Creates a folder when `url` is `None`, a bookmark otherwise.
    async fn create(&self, parent_id: &str, title: &str, url: Option<&str>) -> Result<BookmarkNode>;
}

pub struct FolderMaterializer {
    tree: Arc<dyn BookmarkTree>,
    root_id: String,
}

impl FolderMaterializer {
    pub fn new(tree: Arc<dyn BookmarkTree>) -> Self {
        Self {
            tree,
            root_id: BOOKMARKS_ROOT_ID.to_string(),
        }
    }

    pub fn with_root(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }

    pub async fn create_bookmark(
        &self,
        url: &str,
        title: &str,
        folder_path: &[String],
    ) -> Result<BookmarkNode> {
        let folder_id = self.ensure_folder_path(folder_path).await?;
        let bookmark = self.tree.create(&folder_id, title, Some(url)).await?;
        tracing::info!(id = %bookmark.id, folder = %folder_id, "bookmark created");
        Ok(bookmark)
    }

    /// Returns the id of the innermost folder of `path`, creating missing folders.
    pub async fn ensure_folder_path(&self, path: &[String]) -> Result<String> {
        let mut current = self.root_id.clone();
        for name in path {
            current = match self.find_folder(&current, name).await? {
                Some(existing) => existing.id,
                None => {
                    tracing::debug!(parent = %current, name = %name, "creating folder");
                    self.tree.create(&current, name, None).await?.id
                }
            };
        }
        Ok(current)
    }

    async fn find_folder(&self, parent_id: &str, name: &str) -> Result<Option<BookmarkNode>> {
        Ok(self
            .tree
            .children(parent_id)
            .await?
            .into_iter()
            .find(|child| child.title == name && child.is_folder()))
    }
}

/// In-memory bookmark tree with the bookmarks root pre-created.
pub struct MemoryBookmarkTree {
    nodes: RwLock<HashMap<String, BookmarkNode>>,
    next_id: RwLock<u64>,
}

impl MemoryBookmarkTree {
    pub fn new() -> Self {
        let root = BookmarkNode {
            id: BOOKMARKS_ROOT_ID.to_string(),
            parent_id: None,
            title: "Bookmarks".to_string(),
            url: None,
        };
        Self {
            nodes: RwLock::new(HashMap::from([(root.id.clone(), root)])),
            next_id: RwLock::new(100),
        }
    }

    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn get(&self, id: &str) -> Option<BookmarkNode> {
        self.nodes.read().await.get(id).cloned()
    }
}

impl Default for MemoryBookmarkTree {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookmarkTree for MemoryBookmarkTree {
    async fn children(&self, parent_id: &str) -> Result<Vec<BookmarkNode>> {
        let nodes = self.nodes.read().await;
        if !nodes.contains_key(parent_id) {
            return Err(Error::Bookmark {
                message: format!("can't find parent bookmark '{}'", parent_id),
            });
        }
        let mut children: Vec<BookmarkNode> = nodes
            .values()
            .filter(|n| n.parent_id.as_deref() == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(children)
    }

    async fn create(&self, parent_id: &str, title: &str, url: Option<&str>) -> Result<BookmarkNode> {
        let mut nodes = self.nodes.write().await;
        match nodes.get(parent_id) {
            Some(parent) if parent.is_folder() => {}
            Some(_) => {
                return Err(Error::Bookmark {
                    message: format!("parent '{}' is not a folder", parent_id),
                })
            }
            None => {
                return Err(Error::Bookmark {
                    message: format!("can't find parent bookmark '{}'", parent_id),
                })
            }
        }

        let mut next_id = self.next_id.write().await;
        *next_id += 1;
        let node = BookmarkNode {
            id: next_id.to_string(),
            parent_id: Some(parent_id.to_string()),
            title: title.to_string(),
            url: url.map(str::to_string),
        };
        nodes.insert(node.id.clone(), node.clone());
        Ok(node)
    }
}
