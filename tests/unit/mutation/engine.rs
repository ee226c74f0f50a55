use super::*;
use crate::foundation::notice::NoticeLevel;
use crate::instance::builder::build_form;
use crate::render::view::LeafValue;
use serde_json::json;

fn template() -> Template {
    Template::from_value(&json!({
        "version": { "_type": "readonly", "_default": "1" },
        "title": { "_type": "text" },
        "scenes": {
            "_type": "array",
            "_title": "Scenes",
            "scene": {
                "_type": "object",
                "_title": "Scene",
                "title": { "_type": "text" },
                "shots": {
                    "_type": "array",
                    "shot": { "_type": "object", "_title": "Shot", "text": { "_type": "text" } }
                }
            }
        }
    }))
    .unwrap()
}

fn p(s: &str) -> FormPath {
    FormPath::parse(s).unwrap()
}

fn req(action: Action, target: &str) -> Request {
    Request::parse(action, target).unwrap()
}

fn set(form: &mut Form, path: &str, v: &str) {
    form.set_value(&p(path), LeafValue::Text(v.to_owned()))
        .unwrap();
}

fn text(form: &Form, path: &str) -> String {
    form.value_at(&p(path))
        .and_then(|v| v.as_text())
        .unwrap_or_default()
        .to_owned()
}

fn items(form: &Form, array: &str) -> Vec<String> {
    form.get(&p(array))
        .unwrap()
        .children()
        .iter()
        .map(|el| el.path().to_string())
        .collect()
}

fn assert_unique_paths(form: &Form) {
    let paths = form.paths();
    let mut sorted = paths.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), paths.len(), "duplicate identity in {paths:?}");
}

#[test]
fn scenes_scenario() {
    let t = template();
    let mut form = build_form(&t).unwrap();
    assert_eq!(items(&form, "scenes"), ["scenes.scene_1"]);
    set(&mut form, "scenes.scene_1.title", "first");

    let mut engine = MutationEngine::new(&t, &mut form);
    let n = engine.apply(&req(Action::AddItem, "scenes")).unwrap();
    assert_eq!(n.level, NoticeLevel::Info);
    assert_eq!(items(&form, "scenes"), ["scenes.scene_1", "scenes.scene_2"]);
    set(&mut form, "scenes.scene_2.title", "second");

    MutationEngine::new(&t, &mut form)
        .apply(&req(Action::Clone, "scenes.scene_1"))
        .unwrap();
    assert_eq!(
        items(&form, "scenes"),
        ["scenes.scene_1", "scenes.scene_2", "scenes.scene_3"]
    );
    assert_eq!(text(&form, "scenes.scene_1.title"), "first");
    assert_eq!(text(&form, "scenes.scene_2.title"), "first");
    assert_eq!(text(&form, "scenes.scene_3.title"), "second");

    MutationEngine::new(&t, &mut form)
        .apply(&req(Action::MoveUp, "scenes.scene_3"))
        .unwrap();
    assert_eq!(
        items(&form, "scenes"),
        ["scenes.scene_1", "scenes.scene_2", "scenes.scene_3"]
    );
    assert_eq!(text(&form, "scenes.scene_2.title"), "second");
    assert_eq!(text(&form, "scenes.scene_3.title"), "first");
    assert_eq!(form.get(&p("scenes.scene_2")).unwrap().title(), "Scene 2");

    MutationEngine::new(&t, &mut form)
        .apply(&req(Action::Delete, "scenes.scene_1"))
        .unwrap();
    assert_eq!(items(&form, "scenes"), ["scenes.scene_1", "scenes.scene_2"]);
    assert_eq!(text(&form, "scenes.scene_1.title"), "second");
    assert_eq!(text(&form, "scenes.scene_2.title"), "first");
    assert_unique_paths(&form);
}

#[test]
fn add_before_inserts_blank_item_and_shifts() {
    let t = template();
    let mut form = build_form(&t).unwrap();
    set(&mut form, "scenes.scene_1.title", "a");
    MutationEngine::new(&t, &mut form)
        .apply(&req(Action::AddItem, "scenes"))
        .unwrap();
    set(&mut form, "scenes.scene_2.title", "b");

    let n = MutationEngine::new(&t, &mut form)
        .apply(&req(Action::Add, "scenes.scene_1"))
        .unwrap();
    assert_eq!(n.message, "new item added");
    assert_eq!(
        items(&form, "scenes"),
        ["scenes.scene_1", "scenes.scene_2", "scenes.scene_3"]
    );
    assert_eq!(text(&form, "scenes.scene_1.title"), "");
    assert_eq!(text(&form, "scenes.scene_2.title"), "a");
    assert_eq!(text(&form, "scenes.scene_3.title"), "b");
    assert_eq!(form.get(&p("scenes.scene_3")).unwrap().title(), "Scene 3");
    assert_unique_paths(&form);
}

#[test]
fn move_boundaries_are_noops_with_notice() {
    let t = template();
    let mut form = build_form(&t).unwrap();
    MutationEngine::new(&t, &mut form)
        .apply(&req(Action::AddItem, "scenes"))
        .unwrap();
    set(&mut form, "scenes.scene_1.title", "a");
    set(&mut form, "scenes.scene_2.title", "b");
    let before = form.clone();

    let up = MutationEngine::new(&t, &mut form)
        .apply(&req(Action::MoveUp, "scenes.scene_1"))
        .unwrap();
    assert_eq!(up.level, NoticeLevel::Info);
    assert!(up.message.contains("top"));
    let down = MutationEngine::new(&t, &mut form)
        .apply(&req(Action::MoveDown, "scenes.scene_2"))
        .unwrap();
    assert!(down.message.contains("bottom"));
    assert_eq!(form, before);
}

#[test]
fn move_down_swaps_with_next() {
    let t = template();
    let mut form = build_form(&t).unwrap();
    MutationEngine::new(&t, &mut form)
        .apply(&req(Action::AddItem, "scenes"))
        .unwrap();
    set(&mut form, "scenes.scene_1.title", "a");
    set(&mut form, "scenes.scene_2.title", "b");
    MutationEngine::new(&t, &mut form)
        .apply(&req(Action::MoveDown, "scenes.scene_1"))
        .unwrap();
    assert_eq!(text(&form, "scenes.scene_1.title"), "b");
    assert_eq!(text(&form, "scenes.scene_2.title"), "a");
    assert_eq!(form.get(&p("scenes.scene_1")).unwrap().title(), "Scene 1");
}

#[test]
fn clear_is_idempotent() {
    let t = template();
    let mut form = build_form(&t).unwrap();
    set(&mut form, "scenes.scene_1.title", "x");
    MutationEngine::new(&t, &mut form)
        .apply(&req(Action::Clear, "scenes.scene_1"))
        .unwrap();
    let once = form.clone();
    MutationEngine::new(&t, &mut form)
        .apply(&req(Action::Clear, "scenes.scene_1"))
        .unwrap();
    assert_eq!(form, once);
    assert_eq!(text(&form, "scenes.scene_1.title"), "");
}

#[test]
fn deleting_last_item_equals_clearing_it() {
    let t = template();
    let mut deleted = build_form(&t).unwrap();
    set(&mut deleted, "scenes.scene_1.title", "x");
    let mut cleared = deleted.clone();

    MutationEngine::new(&t, &mut deleted)
        .apply(&req(Action::Delete, "scenes.scene_1"))
        .unwrap();
    MutationEngine::new(&t, &mut cleared)
        .apply(&req(Action::Clear, "scenes.scene_1"))
        .unwrap();
    assert_eq!(deleted, cleared);
    assert_eq!(items(&deleted, "scenes"), ["scenes.scene_1"]);
}

#[test]
fn clear_items_resets_array() {
    let t = template();
    let mut form = build_form(&t).unwrap();
    for _ in 0..3 {
        MutationEngine::new(&t, &mut form)
            .apply(&req(Action::AddItem, "scenes"))
            .unwrap();
    }
    set(&mut form, "scenes.scene_1.title", "x");
    MutationEngine::new(&t, &mut form)
        .apply(&req(Action::ClearItems, "scenes"))
        .unwrap();
    assert_eq!(form, build_form(&t).unwrap());
}

#[test]
fn nested_array_mutations_stay_local() {
    let t = template();
    let mut form = build_form(&t).unwrap();
    MutationEngine::new(&t, &mut form)
        .apply(&req(Action::AddItem, "scenes"))
        .unwrap();
    MutationEngine::new(&t, &mut form)
        .apply(&req(Action::AddItem, "scenes.scene_2.shots"))
        .unwrap();
    set(&mut form, "scenes.scene_2.shots.shot_2.text", "close-up");
    assert_eq!(
        items(&form, "scenes.scene_2.shots"),
        ["scenes.scene_2.shots.shot_1", "scenes.scene_2.shots.shot_2"]
    );
    assert_eq!(items(&form, "scenes.scene_1.shots"), ["scenes.scene_1.shots.shot_1"]);

    // Moving the outer item rewrites the prefix of its nested items but not their ordinals.
    MutationEngine::new(&t, &mut form)
        .apply(&req(Action::MoveUp, "scenes.scene_2"))
        .unwrap();
    assert_eq!(
        items(&form, "scenes.scene_1.shots"),
        ["scenes.scene_1.shots.shot_1", "scenes.scene_1.shots.shot_2"]
    );
    assert_eq!(text(&form, "scenes.scene_1.shots.shot_2.text"), "close-up");
    let shot = form.get(&p("scenes.scene_1.shots.shot_2")).unwrap();
    assert_eq!(shot.title(), "Shot 2");
    assert_eq!(
        shot.item().unwrap().parent.to_string(),
        "scenes.scene_1.shots"
    );
    assert_unique_paths(&form);
}

#[test]
fn missing_targets_report_error_notice_without_mutating() {
    let t = template();
    let mut form = build_form(&t).unwrap();
    let before = form.clone();

    for r in [
        req(Action::AddItem, "nope"),
        req(Action::AddItem, "title"),
        req(Action::Delete, "scenes.scene_7"),
        req(Action::Clone, "scenes"),
        req(Action::MoveUp, "scene_1"),
    ] {
        let n = MutationEngine::new(&t, &mut form).apply(&r).unwrap();
        assert!(n.is_error(), "{r:?} should report an error notice");
    }
    assert_eq!(form, before);
}

#[test]
fn ordinals_are_not_confused_across_digit_boundaries() {
    let t = template();
    let mut form = build_form(&t).unwrap();
    for _ in 0..11 {
        MutationEngine::new(&t, &mut form)
            .apply(&req(Action::AddItem, "scenes"))
            .unwrap();
    }
    set(&mut form, "scenes.scene_12.title", "twelve");
    MutationEngine::new(&t, &mut form)
        .apply(&req(Action::Delete, "scenes.scene_1"))
        .unwrap();
    assert_eq!(text(&form, "scenes.scene_11.title"), "twelve");
    assert!(!form.contains(&p("scenes.scene_12")));
    assert_eq!(items(&form, "scenes").len(), 11);
    assert_unique_paths(&form);
}
