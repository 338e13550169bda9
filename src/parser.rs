use crate::error::{ParseError, Result};
use crate::model::*;
use crate::quest_id::QuestId;
use crate::snbt;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const QUEST_KEYS: &[&str] = &[
    "id",
    "title",
    "subtitle",
    "description",
    "dependencies",
    "tasks",
    "rewards",
    "icon",
    "shape",
    "hide",
    "invisible",
    "task_logic",
];

const TASK_KEYS: &[&str] = &[
    "id",
    "type",
    "item",
    "count",
    "group",
    "entity",
    "dimension",
    "advancement",
];

pub fn parse_chapter_from_str(text: &str) -> Result<Chapter> {
    let v = snbt::parse(text)?;
    parse_chapter_from_value(&v)
}

pub fn parse_chapter_from_reader<R: Read>(mut r: R) -> Result<Chapter> {
    let mut s = String::new();
    r.read_to_string(&mut s)?;
    parse_chapter_from_str(&s)
}

pub fn parse_chapter_from_file(path: &Path) -> Result<Chapter> {
    let f = File::open(path)?;
    parse_chapter_from_reader(f)
}

/// Read a chapter out of a parsed SNBT tree.
///
/// The root must be a compound with a `quests` list; everything inside a
/// quest is read leniently so one odd quest never stops the others.
pub fn parse_chapter_from_value(v: &Value) -> Result<Chapter> {
    let obj = v
        .as_object()
        .ok_or_else(|| ParseError::InvalidFormat("root is not a compound".into()))?;
    let quests = match obj.get("quests") {
        Some(Value::Array(arr)) => arr
            .iter()
            .enumerate()
            .map(|(i, q)| parse_quest_from_value(i, q))
            .collect(),
        Some(_) => {
            return Err(ParseError::InvalidFormat("`quests` is not a list".into()));
        }
        None => {
            return Err(ParseError::InvalidFormat("no `quests` list at the root".into()));
        }
    };

    Ok(Chapter {
        id: get_string_field(obj, &["id"]),
        filename: get_string_field(obj, &["filename"]),
        title: get_string_field(obj, &["title"]),
        quests,
    })
}

/// Read one quest. Anything that is not a compound reads as an empty quest,
/// which the advancement builder then flags.
pub fn parse_quest_from_value(index: usize, v: &Value) -> Quest {
    let Some(map) = v.as_object() else {
        return Quest {
            index,
            ..Quest::default()
        };
    };

    let hidden = ["hide", "invisible"]
        .iter()
        .filter_map(|k| map.get(*k).and_then(parse_bool_like))
        .any(|b| b);

    let mut extra = Map::new();
    for (k, val) in map.iter() {
        if QUEST_KEYS.contains(&k.as_str()) {
            continue;
        }
        extra.insert(k.clone(), val.clone());
    }

    Quest {
        index,
        id: map.get("id").and_then(QuestId::from_value),
        title: get_string_field(map, &["title"]),
        subtitle: get_string_field(map, &["subtitle"]),
        description: parse_string_list(map.get("description")),
        dependencies: parse_dependencies(map.get("dependencies")),
        tasks: parse_tasks(map.get("tasks")),
        rewards: parse_rewards(map.get("rewards")),
        icon: map.get("icon").and_then(parse_item),
        shape: get_string_field(map, &["shape"]),
        hidden,
        task_logic: get_string_field(map, &["task_logic", "taskLogic"]),
        extra,
    }
}

fn get_string_field(m: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    for &k in keys {
        if let Some(v) = m.get(k)
            && let Some(s) = v.as_str()
        {
            return Some(s.to_string());
        }
    }
    None
}

/// Strings as-is, numbers and booleans stringified.
fn get_scalar_string(m: &Map<String, Value>, key: &str) -> Option<String> {
    match m.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn get_u64(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.parse::<u64>().ok(),
        _ => None,
    }
}

fn parse_bool_like(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|x| x != 0),
        Value::String(s) => match s.as_str() {
            "0" | "false" => Some(false),
            "1" | "true" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

/// An item is either a bare id string or a compound such as
/// `{id: "minecraft:stone", Count: 1b}`.
pub(crate) fn parse_item(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => get_string_field(map, &["id", "item"]),
        _ => None,
    }
}

pub(crate) fn parse_item_count(v: &Value) -> Option<u64> {
    let map = v.as_object()?;
    map.get("count")
        .or_else(|| map.get("Count"))
        .and_then(get_u64)
}

fn parse_string_list(opt: Option<&Value>) -> Vec<String> {
    match opt {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(|e| e.as_str().map(|s| s.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_dependencies(opt: Option<&Value>) -> Vec<QuestId> {
    match opt {
        Some(Value::Array(arr)) => arr.iter().filter_map(QuestId::from_value).collect(),
        Some(single) => QuestId::from_value(single).into_iter().collect(),
        None => Vec::new(),
    }
}

fn parse_task_entry(index: usize, v: &Value) -> Task {
    let Some(map) = v.as_object() else {
        return Task {
            index,
            ..Task::default()
        };
    };

    let item_value = map.get("item");
    let count = map
        .get("count")
        .and_then(get_u64)
        .or_else(|| item_value.and_then(parse_item_count));

    let mut extra = Map::new();
    for (k, val) in map.iter() {
        if TASK_KEYS.contains(&k.as_str()) {
            continue;
        }
        extra.insert(k.clone(), val.clone());
    }

    Task {
        index,
        id: get_scalar_string(map, "id"),
        kind: get_string_field(map, &["type"]),
        item: item_value.and_then(parse_item),
        count,
        group: get_scalar_string(map, "group"),
        entity: get_string_field(map, &["entity"]),
        dimension: get_string_field(map, &["dimension"]),
        advancement: get_string_field(map, &["advancement"]),
        extra,
    }
}

fn parse_tasks(opt: Option<&Value>) -> Vec<Task> {
    match opt {
        Some(Value::Array(arr)) => arr
            .iter()
            .enumerate()
            .map(|(i, e)| parse_task_entry(i, e))
            .collect(),
        // a single task written without the surrounding list
        Some(obj @ Value::Object(_)) => vec![parse_task_entry(0, obj)],
        _ => Vec::new(),
    }
}

fn parse_reward_entry(index: usize, v: &Value) -> Reward {
    let Some(map) = v.as_object() else {
        return Reward {
            index,
            ..Reward::default()
        };
    };

    let mut fields = Map::new();
    for (k, val) in map.iter() {
        if k == "id" || k == "type" {
            continue;
        }
        fields.insert(k.clone(), val.clone());
    }

    Reward {
        index,
        id: get_scalar_string(map, "id"),
        kind: get_string_field(map, &["type"]),
        fields,
    }
}

fn parse_rewards(opt: Option<&Value>) -> Vec<Reward> {
    match opt {
        Some(Value::Array(arr)) => arr
            .iter()
            .enumerate()
            .map(|(i, e)| parse_reward_entry(i, e))
            .collect(),
        Some(obj @ Value::Object(_)) => vec![parse_reward_entry(0, obj)],
        _ => Vec::new(),
    }
}

// File-system dependent tests belong in the integration test directory `tests/`.

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_quest_fields() {
        let v = json!({
            "id": "0F2B4C6D8E1A3C5E",
            "title": "Bonus Quest",
            "description": ["first", "second"],
            "dependencies": ["AAAA", 17],
            "icon": {"id": "minecraft:diamond", "Count": 1},
            "shape": "gear",
            "hide": 1,
            "x": 2.5,
            "tasks": [{"id": "T1", "type": "item", "item": "minecraft:oak_log", "count": 4}],
            "rewards": [{"id": "R1", "type": "xp", "xp": 50}]
        });
        let q = parse_quest_from_value(2, &v);
        assert_eq!(q.index, 2);
        assert_eq!(q.id, Some(QuestId::new("0F2B4C6D8E1A3C5E")));
        assert_eq!(q.title.as_deref(), Some("Bonus Quest"));
        assert_eq!(q.description, vec!["first", "second"]);
        assert_eq!(q.dependencies, vec![QuestId::new("AAAA"), QuestId::new("17")]);
        assert_eq!(q.icon.as_deref(), Some("minecraft:diamond"));
        assert_eq!(q.shape.as_deref(), Some("gear"));
        assert!(q.hidden);
        assert_eq!(q.extra.get("x"), Some(&json!(2.5)));
        assert!(!q.extra.contains_key("tasks"));

        assert_eq!(q.tasks.len(), 1);
        assert_eq!(q.tasks[0].item.as_deref(), Some("minecraft:oak_log"));
        assert_eq!(q.tasks[0].count, Some(4));

        assert_eq!(q.rewards.len(), 1);
        assert_eq!(q.rewards[0].kind.as_deref(), Some("xp"));
        assert_eq!(q.rewards[0].fields.get("xp"), Some(&json!(50)));
        assert!(!q.rewards[0].fields.contains_key("id"));
    }

    #[test]
    fn parse_task_item_compound() {
        let tasks = parse_tasks(Some(&json!([
            {"item": {"id": "minecraft:iron_ingot", "Count": 3}},
            {"type": "checkmark", "group": 2},
            {"item": ""}
        ])));
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].item.as_deref(), Some("minecraft:iron_ingot"));
        assert_eq!(tasks[0].count, Some(3));
        assert_eq!(tasks[1].task_kind(), TaskKind::Checkmark);
        assert_eq!(tasks[1].group.as_deref(), Some("2"));
        assert_eq!(tasks[2].item_id(), None);
        assert_eq!(tasks[2].index, 2);
    }

    #[test]
    fn non_compound_quest_reads_empty() {
        let q = parse_quest_from_value(5, &json!("not a quest"));
        assert_eq!(q.index, 5);
        assert!(q.id.is_none());
        assert!(q.tasks.is_empty());
    }

    #[test]
    fn chapter_requires_quests_list() {
        let text = "{filename: \"intro\", quests: [{id: \"A\"}, {id: \"B\"}]}";
        let chapter = parse_chapter_from_str(text).expect("chapter");
        assert_eq!(chapter.filename.as_deref(), Some("intro"));
        assert_eq!(chapter.quests.len(), 2);
        assert_eq!(chapter.quests[1].index, 1);

        match parse_chapter_from_str("{filename: \"intro\"}") {
            Err(ParseError::InvalidFormat(_)) => {}
            other => panic!("unexpected: {other:?}"),
        }
        match parse_chapter_from_str("[1, 2]") {
            Err(ParseError::InvalidFormat(_)) => {}
            other => panic!("unexpected: {other:?}"),
        }
        match parse_chapter_from_str("{quests: [") {
            Err(ParseError::Malformed { .. }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }
}
