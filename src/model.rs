use crate::quest_id::QuestId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One FTB Quests chapter file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Chapter {
    pub id: Option<String>,
    pub filename: Option<String>,
    pub title: Option<String>,
    pub quests: Vec<Quest>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Quest {
    /// Position of the quest inside its chapter.
    pub index: usize,
    pub id: Option<QuestId>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<QuestId>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    pub icon: Option<String>,
    pub shape: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    pub task_logic: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Quest {
    /// True when completing any single task completes the quest.
    pub fn any_task_completes(&self) -> bool {
        self.task_logic
            .as_deref()
            .map(|s| s.to_uppercase())
            .is_some_and(|s| s == "OR" || s == "ANY" || s == "ONE_OF")
    }

    /// The first task carrying a non-empty item id.
    pub fn first_task_item(&self) -> Option<&str> {
        self.tasks.iter().find_map(Task::item_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Item,
    Checkmark,
    Kill,
    Dimension,
    Advancement,
    Other(String),
}

impl TaskKind {
    pub fn requires_item(&self) -> bool {
        matches!(self, TaskKind::Item)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Task {
    pub index: usize,
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub item: Option<String>,
    pub count: Option<u64>,
    pub group: Option<String>,
    pub entity: Option<String>,
    pub dimension: Option<String>,
    pub advancement: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Key used for this task's criterion.
    pub fn key(&self) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("task_{}", self.index))
    }

    pub fn item_id(&self) -> Option<&str> {
        self.item.as_deref().filter(|s| !s.is_empty())
    }

    pub fn task_kind(&self) -> TaskKind {
        let kind = self.kind.as_deref().map(|k| k.strip_prefix("ftbquests:").unwrap_or(k));
        match kind {
            None | Some("") | Some("item") => TaskKind::Item,
            Some("checkmark") => TaskKind::Checkmark,
            Some("kill") => TaskKind::Kill,
            Some("dimension") => TaskKind::Dimension,
            Some("advancement") => TaskKind::Advancement,
            Some(other) => TaskKind::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reward {
    pub index: usize,
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Everything except `id` and `type`, in file order.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_kind_defaults_to_item() {
        let task = Task::default();
        assert_eq!(task.task_kind(), TaskKind::Item);
        assert!(task.task_kind().requires_item());

        let task = Task {
            kind: Some("ftbquests:kill".into()),
            ..Task::default()
        };
        assert_eq!(task.task_kind(), TaskKind::Kill);

        let task = Task {
            kind: Some("fluid".into()),
            ..Task::default()
        };
        assert_eq!(task.task_kind(), TaskKind::Other("fluid".into()));
    }

    #[test]
    fn task_key_falls_back_to_index() {
        let task = Task {
            index: 3,
            ..Task::default()
        };
        assert_eq!(task.key(), "task_3");
        let task = Task {
            id: Some("5A".into()),
            ..Task::default()
        };
        assert_eq!(task.key(), "5A");
    }

    #[test]
    fn task_logic_variants() {
        let mut quest = Quest::default();
        assert!(!quest.any_task_completes());
        quest.task_logic = Some("or".into());
        assert!(quest.any_task_completes());
        quest.task_logic = Some("AND".into());
        assert!(!quest.any_task_completes());
    }
}
