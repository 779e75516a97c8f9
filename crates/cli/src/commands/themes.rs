//! Theme inspection commands.
//!
//! Fragment paths follow `{store}/{theme...}/components/{slot}`. The
//! default tree nests one level deeper
//! (`default/{category}/{variant}/components/{slot}`), which falls out of
//! the same parse: the theme segment is simply everything between the store
//! and the `components` marker.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use thiserror::Error;
use vitrine_theme::{
    ComponentSource, FragmentPath, FsComponentSource, LoadError, SlotHandle, ThemeEngine, ThemeKey,
};

/// Errors from theme inspection commands.
#[derive(Debug, Error)]
pub enum ThemesError {
    #[error("failed to scan themes root: {0}")]
    Scan(#[from] LoadError),
}

/// One entry in the scanned tree: store -> theme -> slots.
type ThemeTree = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

/// Split a fragment path into (store, theme, slot).
///
/// Returns `None` for files that do not sit under a `components` directory.
fn parse_fragment_path(path: &str) -> Option<(String, String, String)> {
    let (prefix, slot) = path.split_once("/components/")?;
    let (store, theme) = prefix.split_once('/')?;
    Some((store.to_string(), theme.to_string(), slot.to_string()))
}

/// Build the store/theme/slot tree from a scan.
fn build_tree(paths: &[FragmentPath]) -> ThemeTree {
    let mut tree = ThemeTree::new();
    for path in paths {
        if let Some((store, theme, slot)) = parse_fragment_path(path.as_str()) {
            tree.entry(store)
                .or_default()
                .entry(theme)
                .or_default()
                .insert(slot);
        } else {
            tracing::warn!(path = %path, "file ignored: not under a components directory");
        }
    }
    tree
}

/// List stores, themes, and slots under the themes root.
pub async fn list(root: &str) -> Result<(), ThemesError> {
    let source = FsComponentSource::new(root);
    let paths = source.scan().await?;
    let tree = build_tree(&paths);

    #[allow(clippy::print_stdout)]
    {
        if tree.is_empty() {
            println!("No theme fragments found under {root}");
            return Ok(());
        }

        for (store, themes) in &tree {
            println!("{store}");
            for (theme, slots) in themes {
                println!("  {theme}");
                for slot in slots {
                    println!("    {slot}");
                }
            }
        }
    }

    Ok(())
}

/// Validate every fragment and dry-run slot resolution per store.
///
/// Reports, for each store theme and each slot name seen anywhere in the
/// tree, whether resolution would use the store's own fragment, fall back
/// to the category default, or come up empty.
pub async fn check(root: &str) -> Result<(), ThemesError> {
    let source = Arc::new(FsComponentSource::new(root));
    let paths = source.scan().await?;

    // Parse validation: a fragment that fails to parse loads as an error at
    // runtime, which silently downgrades that slot to its fallback. Better
    // to hear about it here.
    let mut parse_failures = 0_u32;
    for path in &paths {
        if let Err(e @ LoadError::Parse { .. }) = source.load(path).await {
            parse_failures += 1;
            tracing::error!("{e}");
        }
    }

    let tree = build_tree(&paths);

    // Every slot name seen anywhere: stores are checked against the full
    // set, since a missing slot is exactly what fallback is for.
    let all_slots: BTreeSet<String> = tree
        .values()
        .flat_map(BTreeMap::values)
        .flatten()
        .cloned()
        .collect();

    let engine = ThemeEngine::new(Arc::clone(&source) as Arc<dyn ComponentSource>);

    #[allow(clippy::print_stdout)]
    {
        for (store, themes) in &tree {
            if store == "default" {
                continue;
            }
            for theme in themes.keys() {
                println!("{store}/{theme}");
                let key = ThemeKey {
                    store_id: store.clone(),
                    theme_id: theme.clone(),
                    ..ThemeKey::default()
                };
                for slot in &all_slots {
                    let outcome = match engine.resolve(&key, slot).await {
                        SlotHandle::Resolved(_) => "primary",
                        SlotHandle::Fallback(_) => "fallback",
                        SlotHandle::Empty => "EMPTY",
                    };
                    println!("  {slot}: {outcome}");
                }
            }
        }

        if parse_failures > 0 {
            println!("{parse_failures} fragment(s) failed to parse");
        } else {
            println!("All fragments parsed");
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_path_store_theme() {
        let (store, theme, slot) =
            parse_fragment_path("acme/theme3/components/Navbar").unwrap();
        assert_eq!(store, "acme");
        assert_eq!(theme, "theme3");
        assert_eq!(slot, "Navbar");
    }

    #[test]
    fn test_parse_fragment_path_default_tree() {
        let (store, theme, slot) =
            parse_fragment_path("default/Grocery/theme1/components/profile/ProfileCard").unwrap();
        assert_eq!(store, "default");
        assert_eq!(theme, "Grocery/theme1");
        assert_eq!(slot, "profile/ProfileCard");
    }

    #[test]
    fn test_parse_fragment_path_rejects_stray_files() {
        assert!(parse_fragment_path("README").is_none());
    }

    #[tokio::test]
    async fn test_check_reports_resolution_against_fixture_tree() {
        let dir = tempfile::tempdir().unwrap();
        for p in [
            "acme/theme1/components/Navbar",
            "default/Grocery/theme1/components/Navbar",
            "default/Grocery/theme1/components/Hero",
        ] {
            let file = dir.path().join(format!("{p}.html"));
            std::fs::create_dir_all(file.parent().unwrap()).unwrap();
            std::fs::write(file, "<div></div>").unwrap();
        }

        check(&dir.path().to_string_lossy()).await.unwrap();
        list(&dir.path().to_string_lossy()).await.unwrap();
    }
}
