use super::*;
use crate::render::view::{ElementView, LeafValue};
use serde_json::json;

fn template() -> Template {
    Template::from_value(&json!({
        "version": { "_type": "readonly", "_default": "1.0" },
        "title": { "_type": "text" },
        "style": {
            "_type": "box",
            "_spoiler": "Style",
            "palette": { "_type": "color", "_default": "#ffffff" }
        },
        "scenes": {
            "_type": "array",
            "_title": "Scenes",
            "scene": {
                "_type": "object",
                "_title": "Scene",
                "title": { "_type": "text" },
                "shots": {
                    "_type": "array",
                    "shot": { "_type": "object", "_title": "Shot", "text": { "_type": "textarea" } }
                }
            }
        }
    }))
    .unwrap()
}

fn p(s: &str) -> FormPath {
    FormPath::parse(s).unwrap()
}

#[test]
fn whole_form_seeds_every_array_with_one_item() {
    let form = build_form(&template()).unwrap();
    let paths: Vec<String> = form.paths().iter().map(ToString::to_string).collect();
    assert_eq!(
        paths,
        [
            "version",
            "title",
            "style",
            "style.palette",
            "scenes",
            "scenes.scene_1",
            "scenes.scene_1.title",
            "scenes.scene_1.shots",
            "scenes.scene_1.shots.shot_1",
            "scenes.scene_1.shots.shot_1.text",
        ]
    );
    assert_eq!(
        form.value_at(&p("style.palette")),
        Some(&LeafValue::Text("#ffffff".to_owned()))
    );
}

#[test]
fn partial_rebuild_at_item_path_keeps_ordinal() {
    let el = build(&template(), &p("scenes.scene_4")).unwrap();
    assert_eq!(el.path().to_string(), "scenes.scene_4");
    assert_eq!(el.title(), "Scene 4");
    let shots = &el.children()[1];
    assert_eq!(shots.path().to_string(), "scenes.scene_4.shots");
    assert_eq!(
        shots.children()[0].path().to_string(),
        "scenes.scene_4.shots.shot_1"
    );
    let ElementView::Object(item) = shots.children()[0].view() else {
        panic!("expected an item");
    };
    assert_eq!(item.parent.to_string(), "scenes.scene_4.shots");
}

#[test]
fn rebuilding_array_resets_to_single_item() {
    let el = build(&template(), &p("scenes")).unwrap();
    assert_eq!(el.children().len(), 1);
    assert_eq!(el.children()[0].ordinal(), Some(1));
}

#[test]
fn unknown_path_is_configuration_error() {
    let err = build(&template(), &p("scenes.scene_1.missing")).unwrap_err();
    assert!(matches!(err, FormError::Configuration(_)));
}

#[test]
fn numeric_suffixed_keys_are_addressable_fields() {
    let t = Template::from_value(&serde_json::json!({
        "address_2": { "_type": "text", "_default": "flat 4" }
    }))
    .unwrap();
    let form = build_form(&t).unwrap();
    let el = form.get(&p("address_2")).unwrap();
    assert_eq!(el.ordinal(), None);
    assert_eq!(
        form.value_at(&p("address_2")).and_then(|v| v.as_text()),
        Some("flat 4")
    );
}
