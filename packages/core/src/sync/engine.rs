//! List-item sync engine
//!
//! Executes one of the four sync directions for a single list item. Each
//! invocation derives the item's [`ListItemCore`] fresh from the store - the
//! host may have mutated blocks since the last call (live user typing), so
//! nothing is cached across calls.
//!
//! Continuity mismatches never abort: the affected container ids accumulate
//! on the engine and the walk reports them as "needs manual review" at the
//! end. Store failures abort the whole walk via [`SyncError`].

use crate::models::{
    filter_preservable, BlockQuery, BlockType, ATTR_LINKED_DOC, ATTR_LINKED_HEADING,
};
use crate::store::BlockStore;
use crate::sync::config::{HeadingPayload, HeadingPullFallback, SyncConfig};
use crate::sync::error::SyncError;
use crate::sync::walker::WalkCursor;
use crate::text::{
    clean_heading_content, icon, merge, split_attr_suffix, strip_markdown_syntax,
    ContentExtractor, ContinuityOutcome,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The four sync directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncAction {
    /// List item -> new/existing sub-document title
    PushToDocument,
    /// Sub-document title -> list item
    PullFromDocument,
    /// List item -> heading block at the document's end
    PushToHeading,
    /// Heading block -> list item
    PullFromHeading,
}

impl SyncAction {
    /// Whether this action establishes a parent-document context for nested
    /// items (the walker threads the result id as `parent_doc_id`).
    pub fn links_document(&self) -> bool {
        matches!(self, SyncAction::PushToDocument | SyncAction::PullFromDocument)
    }

    /// Whether siblings are visited in reverse order so that sequential
    /// creation anchored "after previous" lands in forward reading order.
    pub(crate) fn reverses_traversal(&self) -> bool {
        matches!(self, SyncAction::PushToDocument)
    }
}

/// The synced-content view of one list item, derived per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItemCore {
    /// The list-item block
    pub container_id: String,
    /// The child paragraph carrying the synced text
    pub content_id: String,
    /// The content block's markdown, verbatim
    pub raw_markdown: String,
    /// Whether the separator segment was present
    pub has_wrapper: bool,
    /// Payload with icon and separator removed
    pub rich_markdown: String,
    /// `rich_markdown` stripped to plain text
    pub plain_text: String,
    /// Explicit icon token at the start of the block, if any
    pub icon_token: Option<String>,
    /// Trailing `{: ...}` suffix, verbatim
    pub trailing_attr_suffix: Option<String>,
}

/// Per-session sync executor. Holds no state beyond the configuration, the
/// compiled wrapper patterns, and the accumulated manual-review list.
pub struct ListItemSyncEngine<'a> {
    store: &'a dyn BlockStore,
    config: &'a SyncConfig,
    extractor: ContentExtractor,
    errors: Vec<String>,
}

impl<'a> ListItemSyncEngine<'a> {
    pub fn new(store: &'a dyn BlockStore, config: &'a SyncConfig) -> Self {
        Self {
            store,
            config,
            extractor: ContentExtractor::new(&config.separator),
            errors: Vec::new(),
        }
    }

    /// Container ids whose text could not be patched safely so far.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub(crate) fn take_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }

    /// Run one sync action on one list item.
    ///
    /// Returns the id that becomes the traversal cursor's new `previous_id`:
    /// the linked document id for document actions, the heading id for
    /// heading actions. `None` when the item was skipped (not a list item,
    /// no paragraph child, empty derived title, or nothing linked).
    pub async fn sync_item(
        &mut self,
        list_item_id: &str,
        action: SyncAction,
        cursor: &WalkCursor,
    ) -> Result<Option<String>, SyncError> {
        let Some(core) = self.core_content(list_item_id).await? else {
            return Ok(None);
        };
        let container_attrs = self.store.get_attributes(&core.container_id).await?;

        match action {
            SyncAction::PushToDocument => {
                self.handle_push_to_document(&core, &container_attrs, cursor).await
            }
            SyncAction::PullFromDocument => {
                self.handle_pull_from_document(&core, &container_attrs).await?;
                Ok(container_attrs
                    .get(ATTR_LINKED_DOC)
                    .filter(|v| !v.is_empty())
                    .cloned())
            }
            SyncAction::PushToHeading => {
                self.handle_push_to_heading(&core, &container_attrs, cursor).await
            }
            SyncAction::PullFromHeading => {
                self.handle_pull_from_heading(&core, &container_attrs).await
            }
        }
    }

    /// Derive the synced-content view of a list item: the carrier paragraph
    /// is the first child whose markdown shows a wrapper marker, else the
    /// first child paragraph.
    async fn core_content(&self, list_item_id: &str) -> Result<Option<ListItemCore>, SyncError> {
        let items = self.store.query(BlockQuery::by_id(list_item_id)).await?;
        match items.first() {
            Some(item) if item.block_type == BlockType::ListItem => {}
            _ => return Ok(None),
        }

        let children = self
            .store
            .query(BlockQuery::children_of(list_item_id).with_block_type(BlockType::Paragraph))
            .await?;
        let Some(target) = children
            .iter()
            .find(|c| self.extractor.is_sync_candidate(&c.markdown))
            .or_else(|| children.first())
        else {
            return Ok(None);
        };

        let extracted = self.extractor.extract(&target.markdown);
        Ok(Some(ListItemCore {
            container_id: list_item_id.to_string(),
            content_id: target.id.clone(),
            raw_markdown: target.markdown.clone(),
            has_wrapper: extracted.has_wrapper,
            rich_markdown: extracted.rich_markdown,
            plain_text: extracted.plain_text,
            icon_token: extracted.icon_token,
            trailing_attr_suffix: extracted.trailing_attr_suffix,
        }))
    }

    /// Read a link attribute and validate it with an existence probe; a
    /// stale id is treated as "not yet linked".
    async fn validated_link(
        &self,
        attrs: &HashMap<String, String>,
        key: &str,
    ) -> Result<Option<String>, SyncError> {
        match attrs.get(key) {
            Some(id) if !id.is_empty() => {
                if self.store.exists(id).await? {
                    Ok(Some(id.clone()))
                } else {
                    tracing::debug!(
                        target_id = %id,
                        attribute = key,
                        "linked block no longer exists, treating as unlinked"
                    );
                    Ok(None)
                }
            }
            _ => Ok(None),
        }
    }

    /// The id of the document owning a block.
    async fn document_root(&self, block_id: &str) -> Result<String, SyncError> {
        let blocks = self.store.query(BlockQuery::by_id(block_id)).await?;
        blocks
            .first()
            .and_then(|b| b.root_id.clone())
            .ok_or_else(|| SyncError::MissingDocumentRoot {
                id: block_id.to_string(),
            })
    }

    /// Full wrapper reconstruction for a content block: icon link for the
    /// currently linked document (default glyph when its icon cannot be
    /// read), separator bound to `heading_id` when given, then the payload.
    async fn construct_item_markdown(
        &self,
        container_id: &str,
        heading_id: Option<&str>,
        payload: &str,
    ) -> Result<String, SyncError> {
        let container_attrs = self.store.get_attributes(container_id).await?;
        let icon_link = match container_attrs.get(ATTR_LINKED_DOC) {
            Some(doc_id) if !doc_id.is_empty() => {
                let raw = self
                    .store
                    .get_attributes(doc_id)
                    .await
                    .map(|attrs| attrs.get("icon").cloned().unwrap_or_default())
                    .unwrap_or_default();
                let display = icon::decode(&raw, false);
                Some(format!("[{display}](host://blocks/{doc_id})"))
            }
            _ => None,
        };
        Ok(self
            .extractor
            .construct_wrapper(icon_link.as_deref(), heading_id, payload))
    }

    async fn apply_styles(
        &self,
        block_id: &str,
        styles: &HashMap<String, String>,
    ) -> Result<(), SyncError> {
        if styles.is_empty() {
            return Ok(());
        }
        self.store.set_attributes(block_id, styles.clone()).await?;
        Ok(())
    }

    async fn handle_push_to_document(
        &mut self,
        core: &ListItemCore,
        container_attrs: &HashMap<String, String>,
        cursor: &WalkCursor,
    ) -> Result<Option<String>, SyncError> {
        let title = core.plain_text.trim().to_string();
        if title.is_empty() {
            tracing::debug!(
                container = %core.container_id,
                "derived title is empty, skipping document push"
            );
            return Ok(None);
        }

        let styles = filter_preservable(&self.store.get_attributes(&core.content_id).await?);
        let linked = self.validated_link(container_attrs, ATTR_LINKED_DOC).await?;

        let doc_id = match linked {
            Some(doc_id) => {
                self.store.rename_document(&doc_id, &title).await?;
                if let Some(token) = &core.icon_token {
                    let doc_attrs = self.store.get_attributes(&doc_id).await?;
                    let raw = doc_attrs.get("icon").cloned().unwrap_or_default();
                    if icon::decode(&raw, false) != *token {
                        tracing::debug!(doc = %doc_id, icon = %token, "updating document icon");
                        let update =
                            HashMap::from([("icon".to_string(), icon::encode(token))]);
                        self.store.set_attributes(&doc_id, update).await?;
                    }
                }
                doc_id
            }
            None => {
                // Anchor the new document under the parent context when this
                // item is nested below a just-linked parent document
                let anchor = cursor.parent_doc_id.as_deref().unwrap_or(&core.container_id);
                let notebook_id = self.store.resolve_path(anchor).await?.notebook_id;
                let base = self.store.resolve_human_path(anchor).await?;
                let path = format!("{}/{}", base.trim_end_matches('/'), title);

                let new_id = self.store.create_document(&notebook_id, &path, "").await?;
                tracing::debug!(doc = %new_id, %path, "created linked document");
                let link = HashMap::from([(ATTR_LINKED_DOC.to_string(), new_id.clone())]);
                self.store.set_attributes(&core.container_id, link).await?;
                if let Some(token) = &core.icon_token {
                    let update = HashMap::from([("icon".to_string(), icon::encode(token))]);
                    self.store.set_attributes(&new_id, update).await?;
                }
                new_id
            }
        };

        let heading_id = container_attrs
            .get(ATTR_LINKED_HEADING)
            .filter(|v| !v.is_empty())
            .cloned();
        let markdown = self
            .construct_item_markdown(&core.container_id, heading_id.as_deref(), &core.rich_markdown)
            .await?;
        self.store.update_text(&core.content_id, &markdown).await?;
        self.apply_styles(&core.content_id, &styles).await?;
        Ok(Some(doc_id))
    }

    async fn handle_pull_from_document(
        &mut self,
        core: &ListItemCore,
        container_attrs: &HashMap<String, String>,
    ) -> Result<(), SyncError> {
        let Some(doc_id) = self.validated_link(container_attrs, ATTR_LINKED_DOC).await? else {
            return Ok(());
        };
        let doc_attrs = self.store.get_attributes(&doc_id).await?;
        let Some(title) = doc_attrs.get("title").filter(|t| !t.is_empty()).cloned() else {
            return Ok(());
        };

        let icon_display = icon::decode(
            doc_attrs.get("icon").map(String::as_str).unwrap_or_default(),
            false,
        );
        let icon_link = format!("[{icon_display}](host://blocks/{doc_id})");

        let styles = filter_preservable(&self.store.get_attributes(&core.content_id).await?);
        let (body, suffix) = split_attr_suffix(&core.raw_markdown);
        let suffix_part = suffix.map(|s| format!(" {s}")).unwrap_or_default();

        let final_md = if core.has_wrapper {
            // Icon refresh is unconditional; the text only changes when the
            // continuity check allows it
            let mut body = self.extractor.replace_or_prepend_icon(&body, &icon_link);
            match merge(&core.rich_markdown, &core.plain_text, &title) {
                ContinuityOutcome::Replaced(_) => {
                    body = body.replacen(&core.plain_text, &title, 1);
                }
                ContinuityOutcome::Identical => {}
                ContinuityOutcome::FormatTooComplex => {
                    if core.plain_text != title {
                        tracing::debug!(
                            container = %core.container_id,
                            "continuity check failed, refreshed icon only"
                        );
                        self.errors.push(core.container_id.clone());
                    }
                }
            }
            format!("{body}{suffix_part}")
        } else {
            let rebuilt = self
                .construct_item_markdown(
                    &core.container_id,
                    container_attrs
                        .get(ATTR_LINKED_HEADING)
                        .filter(|v| !v.is_empty())
                        .map(String::as_str),
                    &title,
                )
                .await?;
            format!("{rebuilt}{suffix_part}")
        };

        self.store.update_text(&core.content_id, &final_md).await?;
        self.apply_styles(&core.content_id, &styles).await?;
        Ok(())
    }

    /// Plain text with leading wrapper artifacts (stray separator glyphs)
    /// removed, used when pushing plain-text headings.
    fn cleaned_plain(&self, plain: &str) -> String {
        let sep = self.config.separator.as_str();
        let mut rest = plain.trim_start();
        while let Some(stripped) = rest.strip_prefix(sep) {
            rest = stripped.trim_start();
        }
        rest.trim().to_string()
    }

    async fn handle_push_to_heading(
        &mut self,
        core: &ListItemCore,
        container_attrs: &HashMap<String, String>,
        cursor: &WalkCursor,
    ) -> Result<Option<String>, SyncError> {
        let payload = match self.config.heading_payload {
            HeadingPayload::RichMarkdown => core.rich_markdown.trim().to_string(),
            HeadingPayload::PlainText => self.cleaned_plain(&core.plain_text),
        };
        let payload = if payload.is_empty() {
            "Untitled".to_string()
        } else {
            payload
        };
        let heading_md = format!("{} {}", "#".repeat(cursor.level.min(6)), payload);

        let styles = filter_preservable(&self.store.get_attributes(&core.content_id).await?);
        let target = self.validated_link(container_attrs, ATTR_LINKED_HEADING).await?;

        let heading_id = match target {
            Some(id) => {
                self.store.update_text(&id, &heading_md).await?;
                self.apply_styles(&id, &styles).await?;
                id
            }
            None => {
                let new_id = match &cursor.previous_id {
                    Some(prev) => self.store.insert_after(prev, &heading_md).await?,
                    None => {
                        let root_id = self.document_root(&core.container_id).await?;
                        self.store.append_child(&root_id, &heading_md).await?
                    }
                };
                tracing::debug!(heading = %new_id, "created linked heading");
                let link =
                    HashMap::from([(ATTR_LINKED_HEADING.to_string(), new_id.clone())]);
                self.store.set_attributes(&core.container_id, link).await?;
                self.apply_styles(&new_id, &styles).await?;
                new_id
            }
        };

        let markdown = self
            .construct_item_markdown(&core.container_id, Some(&heading_id), &core.rich_markdown)
            .await?;
        self.store.update_text(&core.content_id, &markdown).await?;
        self.apply_styles(&core.content_id, &styles).await?;
        Ok(Some(heading_id))
    }

    async fn handle_pull_from_heading(
        &mut self,
        core: &ListItemCore,
        container_attrs: &HashMap<String, String>,
    ) -> Result<Option<String>, SyncError> {
        let Some(heading_id) = container_attrs
            .get(ATTR_LINKED_HEADING)
            .filter(|v| !v.is_empty())
            .cloned()
        else {
            return Ok(None);
        };
        let rows = self.store.query(BlockQuery::by_id(&heading_id)).await?;
        let Some(heading) = rows.first() else {
            return Ok(None);
        };

        let payload = clean_heading_content(&heading.markdown);
        let styles = filter_preservable(&self.store.get_attributes(&heading_id).await?);
        let (_, suffix) = split_attr_suffix(&core.raw_markdown);
        let suffix_part = suffix.map(|s| format!(" {s}")).unwrap_or_default();

        let final_md = if core.has_wrapper {
            // Patch against the heading's plain text so the item keeps its
            // own decorations; fall back per configuration when the region
            // has diverged
            match merge(&core.rich_markdown, &core.plain_text, &strip_markdown_syntax(&payload)) {
                ContinuityOutcome::Replaced(patched) => Some(
                    self.construct_item_markdown(&core.container_id, Some(&heading_id), &patched)
                        .await?,
                ),
                ContinuityOutcome::Identical => Some(
                    self.construct_item_markdown(
                        &core.container_id,
                        Some(&heading_id),
                        &core.rich_markdown,
                    )
                    .await?,
                ),
                ContinuityOutcome::FormatTooComplex => match self.config.heading_pull_fallback {
                    HeadingPullFallback::Reconstruct => Some(
                        self.construct_item_markdown(
                            &core.container_id,
                            Some(&heading_id),
                            &payload,
                        )
                        .await?,
                    ),
                    HeadingPullFallback::RecordError => {
                        tracing::debug!(
                            container = %core.container_id,
                            "continuity check failed, leaving text untouched"
                        );
                        self.errors.push(core.container_id.clone());
                        None
                    }
                },
            }
        } else {
            Some(
                self.construct_item_markdown(&core.container_id, Some(&heading_id), &payload)
                    .await?,
            )
        };

        if let Some(md) = final_md {
            self.store
                .update_text(&core.content_id, &format!("{md}{suffix_part}"))
                .await?;
        }
        self.apply_styles(&core.content_id, &styles).await?;
        Ok(Some(heading_id))
    }
}
