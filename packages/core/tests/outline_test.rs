//! Integration tests for the index and outline producers

use anyhow::Result;
use blocklink_core::outline::{generate_index, generate_outline, LinkStyle, OutlineConfig};
use blocklink_core::store::{BlockStore, MemoryBlockStore};
use std::collections::HashMap;

async fn seed_tree(store: &MemoryBlockStore) -> Result<HashMap<String, String>> {
    let mut ids = HashMap::new();
    for path in ["/Home", "/Home/Alpha", "/Home/Alpha/Inner", "/Home/Beta"] {
        let id = store.create_document("nb1", path, "").await?;
        ids.insert(path.to_string(), id);
    }
    // Alpha carries an explicit icon
    store
        .set_attributes(
            &ids["/Home/Alpha"],
            HashMap::from([("icon".to_string(), "1f600".to_string())]),
        )
        .await?;
    Ok(ids)
}

#[tokio::test]
async fn test_index_ref_links_with_icons() -> Result<()> {
    let store = MemoryBlockStore::new();
    let ids = seed_tree(&store).await?;

    let out = generate_index(&store, "nb1", "/", &OutlineConfig::default()).await?;
    let expected = format!(
        "* 📑 [Home](host://blocks/{home})\n    \
         * 😀 [Alpha](host://blocks/{alpha})\n        \
         * 📄 [Inner](host://blocks/{inner})\n    \
         * 📄 [Beta](host://blocks/{beta})\n",
        home = ids["/Home"],
        alpha = ids["/Home/Alpha"],
        inner = ids["/Home/Alpha/Inner"],
        beta = ids["/Home/Beta"],
    );
    assert_eq!(out, expected);
    Ok(())
}

#[tokio::test]
async fn test_index_depth_limit() -> Result<()> {
    let store = MemoryBlockStore::new();
    seed_tree(&store).await?;

    let config = OutlineConfig {
        depth: 1,
        ..Default::default()
    };
    let out = generate_index(&store, "nb1", "/", &config).await?;
    assert_eq!(out.lines().count(), 1);
    assert!(out.contains("[Home]"));
    Ok(())
}

#[tokio::test]
async fn test_index_embed_style_without_icons() -> Result<()> {
    let store = MemoryBlockStore::new();
    let ids = seed_tree(&store).await?;

    let config = OutlineConfig {
        depth: 1,
        link_style: LinkStyle::Embed,
        icons_enabled: false,
        ..Default::default()
    };
    let out = generate_index(&store, "nb1", "/", &config).await?;
    assert_eq!(out, format!("(({} \"\")) Home\n", ids["/Home"]));
    Ok(())
}

#[tokio::test]
async fn test_outline_from_store_headings() -> Result<()> {
    let store = MemoryBlockStore::new();
    let doc_id = store.create_document("nb1", "/Doc", "").await?;
    let top = store.append_child(&doc_id, "# Intro").await?;
    let nested = store.append_child(&doc_id, "## Details **rich**").await?;
    let second = store.append_child(&doc_id, "# Closing").await?;

    let entries = store.document_outline(&doc_id).await?;
    let out = generate_outline(&entries, 0, &OutlineConfig::default());
    assert_eq!(
        out,
        format!(
            "> * [Intro](host://blocks/{top})\n\
             >     * [Details **rich**](host://blocks/{nested})\n\
             > * [Closing](host://blocks/{second})\n",
        ),
    );
    Ok(())
}
