use std::fs::read_to_string;
use std::path::PathBuf;

use ftbq_advancements::{ConvertOptions, ParseError, convert_str, write_all};

fn mk_tmp_dir(suffix: &str) -> PathBuf {
    let mut base = std::env::temp_dir();
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time");
    base.push(format!(
        "ftbq_advancements_test_{}_{}_{}",
        suffix,
        std::process::id(),
        now.as_nanos()
    ));
    base
}

#[test]
fn writes_one_file_per_quest() -> Result<(), Box<dyn std::error::Error>> {
    let out = mk_tmp_dir("per_quest").join("out");
    let chapter = r#"{quests: [
        {id: "q1", title: '{"text":"Get Wood"}', tasks: [{item: "minecraft:log", count: 1}]}
        {id: "q2", title: "Bonus Quest", dependencies: ["q1"], tasks: [{item: "minecraft:stick"}]}
    ]}"#;
    let generated = convert_str(chapter, &ConvertOptions::default())?;
    let written = write_all(&out, &generated)?;

    assert_eq!(written, vec![out.join("get_wood.json"), out.join("bonus_quest.json")]);
    let bonus = read_to_string(out.join("bonus_quest.json"))?;
    assert_eq!(bonus, generated[1].text);
    assert!(bonus.contains("\"parent\": \"minecraft:get_wood\""));
    Ok(())
}

#[test]
fn later_quest_overwrites_on_collision() -> Result<(), Box<dyn std::error::Error>> {
    let out = mk_tmp_dir("collision");
    let chapter = r#"{quests: [
        {id: "a", title: "Same Name", tasks: [{item: "minecraft:dirt"}]}
        {id: "b", title: "same-name", tasks: [{item: "minecraft:stone"}]}
    ]}"#;
    let generated = convert_str(chapter, &ConvertOptions::default())?;
    let written = write_all(&out, &generated)?;
    assert_eq!(written.len(), 2);
    assert_eq!(written[0], written[1]);

    let on_disk = read_to_string(out.join("same_name.json"))?;
    assert!(on_disk.contains("minecraft:stone"));
    assert!(!on_disk.contains("minecraft:dirt"));
    Ok(())
}

#[test]
fn strict_mode_refuses_collisions() {
    let chapter = r#"{quests: [
        {id: "a", title: "Same Name", tasks: [{item: "minecraft:dirt"}]}
        {id: "b", title: "same-name", tasks: [{item: "minecraft:stone"}]}
    ]}"#;
    let strict = ConvertOptions {
        strict: true,
        ..ConvertOptions::default()
    };
    match convert_str(chapter, &strict) {
        Err(ParseError::FilenameCollision { filename, .. }) => assert_eq!(filename, "same_name"),
        other => panic!("unexpected: {other:?}"),
    }
}
