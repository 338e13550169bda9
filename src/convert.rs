use crate::advancement::{self, Advancement};
use crate::error::{ParseError, Result, ValidationError};
use crate::filename::{FilenameMap, derive_filenames, derive_filenames_strict, filename_for};
use crate::model::{Chapter, Quest};
use crate::parser::parse_chapter_from_str;
use crate::quest_id::QuestId;
use crate::render::render;
use log::{debug, warn};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const DEFAULT_NAMESPACE: &str = "minecraft";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Namespace used to qualify `parent` references.
    pub namespace: String,
    /// Fail on duplicate quest ids and on two quests sharing a filename
    /// instead of letting the later one win.
    pub strict: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            namespace: DEFAULT_NAMESPACE.to_string(),
            strict: false,
        }
    }
}

/// One converted quest, ready to be written as `<filename>.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub quest_id: Option<QuestId>,
    pub filename: String,
    pub advancement: Advancement,
    pub text: String,
    pub errors: Vec<ValidationError>,
}

pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<Vec<Generated>> {
    let text = fs::read_to_string(path)?;
    convert_str(&text, options)
}

/// Parse a chapter and convert every quest in it, in file order.
///
/// Only an unreadable file is fatal (plus collisions in strict mode); quests
/// with structural problems are still converted and carry their errors.
pub fn convert_str(text: &str, options: &ConvertOptions) -> Result<Vec<Generated>> {
    let chapter = parse_chapter_from_str(text)?;
    debug!(
        "chapter {} has {} quests",
        chapter.filename.as_deref().unwrap_or("<unnamed>"),
        chapter.quests.len()
    );
    convert_chapter(&chapter, options)
}

pub fn convert_chapter(chapter: &Chapter, options: &ConvertOptions) -> Result<Vec<Generated>> {
    check_duplicate_ids(&chapter.quests, options.strict)?;

    let filenames = if options.strict {
        derive_filenames_strict(&chapter.quests)?
    } else {
        derive_filenames(&chapter.quests)
    };

    chapter
        .quests
        .iter()
        .map(|quest| convert_quest(quest, &options.namespace, &filenames))
        .collect()
}

fn convert_quest(quest: &Quest, namespace: &str, filenames: &FilenameMap) -> Result<Generated> {
    let filename = match &quest.id {
        Some(id) => filenames
            .get(id.as_str())
            .cloned()
            .unwrap_or_else(|| filename_for(quest)),
        None => filename_for(quest),
    };

    let built = advancement::build(quest, namespace, filenames);
    let text = render(&built.advancement)?;
    debug!(
        "built {filename}.json with {} validation errors",
        built.errors.len()
    );

    Ok(Generated {
        quest_id: quest.id.clone(),
        filename,
        advancement: built.advancement,
        text,
        errors: built.errors,
    })
}

fn check_duplicate_ids(quests: &[Quest], strict: bool) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for id in quests.iter().filter_map(|q| q.id.as_ref()) {
        if !seen.insert(id.as_str()) {
            if strict {
                return Err(ParseError::DuplicateQuestId(id.to_string()));
            }
            warn!("quest id {id} appears more than once; the last one wins");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAPTER: &str = r#"{
        quests: [
            {id: "q1", title: '{"text":"Get Wood"}', tasks: [{item: "minecraft:log", count: 1}]}
            {id: "q2", title: "Bonus Quest", dependencies: ["q1"],
             tasks: [{item: "minecraft:stick"}]}
            {id: "q3", dependencies: ["missing"], tasks: [{item: "minecraft:stone"}]}
        ]
    }"#;

    #[test]
    fn converts_every_quest_in_order() {
        let out = convert_str(CHAPTER, &ConvertOptions::default()).expect("convert");
        let names: Vec<&str> = out.iter().map(|g| g.filename.as_str()).collect();
        assert_eq!(names, ["get_wood", "bonus_quest", "stone"]);

        assert!(out[0].errors.is_empty());
        assert_eq!(out[0].advancement.parent, None);
        assert!(out[0].text.contains("\"minecraft:log\""));
        assert!(!out[0].text.contains("\"parent\""));

        assert_eq!(out[1].advancement.parent.as_deref(), Some("minecraft:get_wood"));

        assert_eq!(out[2].advancement.parent, None);
        assert_eq!(
            out[2].errors,
            vec![ValidationError::UnresolvedDependency {
                dependency: "missing".into()
            }]
        );
    }

    #[test]
    fn namespace_qualifies_parent() {
        let options = ConvertOptions {
            namespace: "mypack".into(),
            strict: false,
        };
        let out = convert_str(CHAPTER, &options).expect("convert");
        assert_eq!(out[1].advancement.parent.as_deref(), Some("mypack:get_wood"));
    }

    #[test]
    fn duplicate_ids_only_fail_in_strict_mode() {
        let text = "{quests: [{id: \"a\", title: \"One\"}, {id: \"a\", title: \"Two\"}]}";
        let out = convert_str(text, &ConvertOptions::default()).expect("lenient");
        assert_eq!(out.len(), 2);

        let strict = ConvertOptions {
            strict: true,
            ..ConvertOptions::default()
        };
        match convert_str(text, &strict) {
            Err(ParseError::DuplicateQuestId(id)) => assert_eq!(id, "a"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn malformed_input_is_fatal() {
        match convert_str("{quests: [{id: \"a\"}", &ConvertOptions::default()) {
            Err(ParseError::Malformed { .. }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }
}
