//! Quest → advancement translation.
//!
//! [`build`] always produces an advancement. Structural problems found along
//! the way are collected in [`Built::errors`] instead of aborting, so a single
//! broken quest never blocks the rest of a chapter.

use crate::error::ValidationError;
use crate::filename::FilenameMap;
use crate::model::{Quest, Reward, Task, TaskKind};
use crate::parser::{get_u64, parse_item, parse_item_count};
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use std::collections::HashMap;

const DEFAULT_ICON: &str = "minecraft:book";
const PLACEHOLDER_CRITERION: &str = "impossible";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advancement {
    pub display: Display,
    #[serde(serialize_with = "ordered_map")]
    pub criteria: Vec<(String, Criterion)>,
    pub requirements: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub rewards: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Display {
    pub icon: Icon,
    pub title: Value,
    pub description: Value,
    pub frame: Frame,
    pub show_toast: bool,
    pub announce_to_chat: bool,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub item: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frame {
    Task,
    Goal,
    Challenge,
}

impl Frame {
    fn from_shape(shape: Option<&str>) -> Self {
        match shape {
            Some("gear") => Frame::Challenge,
            Some("hexagon" | "octagon") => Frame::Goal,
            _ => Frame::Task,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Criterion {
    pub trigger: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Value>,
}

impl Criterion {
    fn new(trigger: &str, conditions: Option<Value>) -> Self {
        Criterion {
            trigger: trigger.to_string(),
            conditions,
        }
    }

    fn impossible() -> Self {
        Criterion::new("minecraft:impossible", None)
    }
}

/// An advancement together with everything that looked wrong while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Built {
    pub advancement: Advancement,
    pub errors: Vec<ValidationError>,
}

impl Built {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn ordered_map<S: Serializer>(entries: &[(String, Criterion)], s: S) -> Result<S::Ok, S::Error> {
    s.collect_map(entries.iter().map(|(k, v)| (k, v)))
}

/// Translate one quest into an advancement under `namespace`.
///
/// `filenames` must already hold every quest id of the chapter; the first
/// dependency is resolved through it to build `parent`.
pub fn build(quest: &Quest, namespace: &str, filenames: &FilenameMap) -> Built {
    let mut errors = Vec::new();

    if quest.id.is_none() {
        errors.push(ValidationError::MissingId);
    }

    let display = build_display(quest, &mut errors);

    let (criteria, requirements) = if quest.tasks.is_empty() {
        errors.push(ValidationError::EmptyTasks);
        (
            vec![(PLACEHOLDER_CRITERION.to_string(), Criterion::impossible())],
            vec![vec![PLACEHOLDER_CRITERION.to_string()]],
        )
    } else {
        let criteria = build_criteria(&quest.tasks, &mut errors);
        let keys: Vec<String> = criteria.iter().map(|(k, _)| k.clone()).collect();
        let requirements = build_requirements(quest, &keys);
        (criteria, requirements)
    };

    let parent = resolve_parent(quest, namespace, filenames, &mut errors);
    let rewards = quest.rewards.iter().map(reward_block).collect();

    Built {
        advancement: Advancement {
            display,
            criteria,
            requirements,
            parent,
            rewards,
        },
        errors,
    }
}

fn build_display(quest: &Quest, errors: &mut Vec<ValidationError>) -> Display {
    let icon = quest
        .icon
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| quest.first_task_item())
        .unwrap_or(DEFAULT_ICON);

    let title = match quest.title.as_deref() {
        Some(title) => title_component(title, errors),
        None => Value::String(String::new()),
    };

    let description = if !quest.description.is_empty() {
        quest.description.join("\n")
    } else {
        quest.subtitle.clone().unwrap_or_default()
    };

    Display {
        icon: Icon {
            item: icon.to_string(),
        },
        title,
        description: Value::String(encode_color_codes(&description)),
        frame: Frame::from_shape(quest.shape.as_deref()),
        show_toast: true,
        announce_to_chat: true,
        hidden: quest.hidden,
    }
}

/// Titles written as JSON text components are kept as components; anything
/// else is a plain string.
fn title_component(title: &str, errors: &mut Vec<ValidationError>) -> Value {
    let trimmed = title.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        match serde_json::from_str::<Value>(title) {
            Ok(mut component @ (Value::Object(_) | Value::Array(_))) => {
                encode_component(&mut component);
                return component;
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::MalformedTitle {
                reason: e.to_string(),
            }),
        }
    }
    Value::String(encode_color_codes(title))
}

fn encode_component(v: &mut Value) {
    match v {
        Value::String(s) => *s = encode_color_codes(s),
        Value::Array(items) => items.iter_mut().for_each(encode_component),
        Value::Object(map) => map.values_mut().for_each(encode_component),
        _ => {}
    }
}

/// Rewrite FTB's `&` formatting codes into the game's `§` codes.
///
/// An escaped `\&` stands for a literal ampersand and becomes `\§`, which the
/// renderer turns back into `&` after serialization.
pub fn encode_color_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'&') => {
                chars.next();
                out.push_str("\\§");
            }
            '&' if chars.peek().is_some_and(|n| is_format_code(*n)) => out.push('§'),
            c => out.push(c),
        }
    }
    out
}

fn is_format_code(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), '0'..='9' | 'a'..='f' | 'k'..='o' | 'r')
}

fn build_criteria(tasks: &[Task], errors: &mut Vec<ValidationError>) -> Vec<(String, Criterion)> {
    let mut criteria: Vec<(String, Criterion)> = Vec::with_capacity(tasks.len());
    for task in tasks {
        let mut key = task.key();
        if criteria.iter().any(|(k, _)| *k == key) {
            key = format!("{key}_{}", task.index);
        }
        let criterion = task_criterion(task, &key, errors);
        criteria.push((key, criterion));
    }
    criteria
}

fn task_criterion(task: &Task, key: &str, errors: &mut Vec<ValidationError>) -> Criterion {
    match task.task_kind() {
        TaskKind::Item => match task.item_id() {
            Some(item) => {
                let count = task.count.unwrap_or(1).max(1);
                Criterion::new(
                    "minecraft:inventory_changed",
                    Some(json!({
                        "items": [{"items": [item], "count": {"min": count}}]
                    })),
                )
            }
            None => {
                errors.push(ValidationError::MissingTaskItem {
                    task: key.to_string(),
                });
                Criterion::impossible()
            }
        },
        TaskKind::Checkmark => Criterion::new("minecraft:tick", None),
        TaskKind::Kill => Criterion::new(
            "minecraft:player_killed_entity",
            task.entity
                .as_ref()
                .map(|entity| json!({"entity": {"type": entity}})),
        ),
        TaskKind::Dimension => Criterion::new(
            "minecraft:changed_dimension",
            task.dimension.as_ref().map(|dim| json!({"to": dim})),
        ),
        TaskKind::Advancement => match &task.advancement {
            Some(adv) => Criterion::new(
                "minecraft:tick",
                Some(json!({"player": {"player": {"advancements": {adv.as_str(): true}}}})),
            ),
            None => Criterion::impossible(),
        },
        TaskKind::Other(kind) => {
            errors.push(ValidationError::UnsupportedTaskType {
                task: key.to_string(),
                kind,
            });
            Criterion::impossible()
        }
    }
}

/// Rows are AND-ed, keys inside a row are OR-ed.
fn build_requirements(quest: &Quest, keys: &[String]) -> Vec<Vec<String>> {
    if quest.any_task_completes() {
        return vec![keys.to_vec()];
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut group_rows: HashMap<&str, usize> = HashMap::new();
    for (task, key) in quest.tasks.iter().zip(keys) {
        match task.group.as_deref() {
            Some(group) => match group_rows.get(group) {
                Some(&row) => rows[row].push(key.clone()),
                None => {
                    group_rows.insert(group, rows.len());
                    rows.push(vec![key.clone()]);
                }
            },
            None => rows.push(vec![key.clone()]),
        }
    }
    rows
}

fn resolve_parent(
    quest: &Quest,
    namespace: &str,
    filenames: &FilenameMap,
    errors: &mut Vec<ValidationError>,
) -> Option<String> {
    let mut parent = None;
    for (i, dep) in quest.dependencies.iter().enumerate() {
        match filenames.get(dep.as_str()) {
            Some(stem) if i == 0 => parent = Some(format!("{namespace}:{stem}")),
            Some(_) => {}
            None => errors.push(ValidationError::UnresolvedDependency {
                dependency: dep.to_string(),
            }),
        }
    }
    parent
}

/// One reward block per FTB reward, by reward type. Unknown types keep their
/// own fields.
fn reward_block(reward: &Reward) -> Value {
    let fields = &reward.fields;
    let kind = reward
        .kind
        .as_deref()
        .map(|k| k.strip_prefix("ftbquests:").unwrap_or(k));

    let translated = match kind {
        Some("xp") => fields.get("xp").map(|xp| json!({"experience": xp})),
        Some("xp_levels") => fields
            .get("xp_levels")
            .map(|levels| json!({"experience_levels": levels})),
        Some("item") => fields.get("item").and_then(|item| {
            let id = parse_item(item)?;
            let count = fields
                .get("count")
                .and_then(get_u64)
                .or_else(|| parse_item_count(item))
                .unwrap_or(1);
            Some(json!({"item": id, "count": count}))
        }),
        Some("loot" | "random" | "choice") => fields
            .get("table")
            .or_else(|| fields.get("table_id"))
            .map(|table| json!({"loot": [table]})),
        Some("command") => fields
            .get("command")
            .map(|command| json!({"function": command})),
        _ => None,
    };
    translated.unwrap_or_else(|| Value::Object(fields.clone()))
}
