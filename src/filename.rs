//! Output filename derivation.
//!
//! Every quest gets a filename stem from its title, or from the item of its
//! first item task, or from its id. The id → stem map has to be complete
//! before any advancement is built because `parent` links are resolved
//! through it.

use crate::error::{ParseError, Result};
use crate::model::Quest;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;

/// Map from quest id to filename stem.
pub type FilenameMap = HashMap<String, String>;

const RESERVED: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Build the id → stem map for every quest that has an id.
///
/// Two quests may end up with the same stem; the later one then overwrites
/// the earlier one's file. Use [`derive_filenames_strict`] to refuse that.
pub fn derive_filenames(quests: &[Quest]) -> FilenameMap {
    let mut map = FilenameMap::new();
    for quest in quests {
        if let Some(id) = &quest.id {
            let stem = filename_for(quest);
            debug!("quest {id} -> {stem}.json");
            map.insert(id.to_string(), stem);
        }
    }
    map
}

/// Like [`derive_filenames`] but fails on the first stem shared by two quests.
pub fn derive_filenames_strict(quests: &[Quest]) -> Result<FilenameMap> {
    let mut owners: HashMap<String, String> = HashMap::new();
    for quest in quests {
        let stem = filename_for(quest);
        let owner = quest
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| format!("#{}", quest.index));
        if let Some(first) = owners.get(&stem) {
            return Err(ParseError::FilenameCollision {
                filename: stem,
                first: first.clone(),
                second: owner,
            });
        }
        owners.insert(stem, owner);
    }
    Ok(derive_filenames(quests))
}

/// Filename stem for a single quest.
pub fn filename_for(quest: &Quest) -> String {
    let root = match quest.title.as_deref().filter(|t| !t.is_empty()) {
        Some(title) => title_text(title),
        None => match quest.first_task_item() {
            Some(item) => item.split(':').nth(1).unwrap_or(item).to_string(),
            None => match &quest.id {
                Some(id) => id.to_string(),
                None => format!("quest_{}", quest.index),
            },
        },
    };
    normalize_stem(&root)
}

/// The `text` of a rich-text title, or the title itself when it is plain.
pub fn title_text(title: &str) -> String {
    match serde_json::from_str::<Value>(title) {
        Ok(Value::Object(component)) => match component.get("text") {
            Some(Value::String(text)) => text.clone(),
            _ => title.to_string(),
        },
        _ => title.to_string(),
    }
}

pub fn normalize_stem(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c if RESERVED.contains(&c) => '_',
            c => c,
        })
        .collect::<String>()
        .to_lowercase()
}
