use super::*;
use crate::instance::builder::build_form;
use crate::mutation::engine::MutationEngine;
use crate::mutation::request::{Action, Request};
use serde_json::json;

fn template() -> Template {
    Template::from_value(&json!({
        "version": { "_type": "readonly", "_default": "2" },
        "title": { "_type": "text", "_label": "Title" },
        "tone": {
            "_type": "select",
            "_options": [{ "_value": "none" }, { "_value": "calm" }, { "_value": "loud" }]
        },
        "camera": {
            "_type": "box",
            "_title": "Camera",
            "lens": { "_type": "text", "_important": true },
            "notes": { "_type": "textarea" }
        },
        "scenes": {
            "_type": "array",
            "scene": {
                "_type": "object",
                "_title": "Scene",
                "title": { "_type": "text" },
                "duration": { "_type": "number" },
                "tags": {
                    "_type": "checkbox",
                    "_options": [{ "_value": "day" }, { "_value": "night" }]
                }
            }
        }
    }))
    .unwrap()
}

fn p(s: &str) -> FormPath {
    FormPath::parse(s).unwrap()
}

fn set(form: &mut Form, path: &str, v: &str) {
    form.set_value(&p(path), LeafValue::Text(v.to_owned()))
        .unwrap();
}

fn filled() -> (Template, Form) {
    let t = template();
    let mut form = build_form(&t).unwrap();
    set(&mut form, "title", "Night drive");
    (t, form)
}

#[test]
fn fresh_form_yields_only_mandatory_fields() {
    let (t, form) = filled();
    let out = extract(&t, &form, &ExtractOpts::default()).unwrap();
    assert_eq!(out, json!({ "version": "2", "title": "Night drive" }));
}

#[test]
fn mandatory_fields_lead_the_document() {
    let (t, mut form) = filled();
    set(&mut form, "tone", "calm");
    let out = extract(&t, &form, &ExtractOpts::default()).unwrap();
    let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["version", "title", "tone"]);
}

#[test]
fn missing_mandatory_field_is_a_validation_error() {
    let t = template();
    let form = build_form(&t).unwrap();
    let err = extract(&t, &form, &ExtractOpts::default()).unwrap_err();
    match err {
        FormError::Validation { field, message } => {
            assert_eq!(field, "title");
            assert!(message.contains("Title"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn undeclared_mandatory_field_is_a_configuration_error() {
    let (t, form) = filled();
    let opts = ExtractOpts {
        mandatory_root_fields: vec!["author".to_owned()],
        ..ExtractOpts::default()
    };
    let err = extract(&t, &form, &opts).unwrap_err();
    assert!(matches!(err, FormError::Configuration(_)));
}

#[test]
fn select_none_is_absent() {
    let (t, mut form) = filled();
    set(&mut form, "tone", "none");
    let out = extract(&t, &form, &ExtractOpts::default()).unwrap();
    assert!(out.get("tone").is_none());
}

#[test]
fn box_without_its_important_field_is_dropped() {
    let (t, mut form) = filled();
    set(&mut form, "camera.notes", "handheld");
    let out = extract(&t, &form, &ExtractOpts::default()).unwrap();
    assert!(out.get("camera").is_none());

    set(&mut form, "camera.lens", "35mm");
    let out = extract(&t, &form, &ExtractOpts::default()).unwrap();
    assert_eq!(out["camera"], json!({ "lens": "35mm", "notes": "handheld" }));
}

#[test]
fn empty_items_are_omitted_and_choices_become_lists() {
    let (t, mut form) = filled();
    MutationEngine::new(&t, &mut form)
        .apply(&Request::parse(Action::AddItem, "scenes").unwrap())
        .unwrap();
    set(&mut form, "scenes.scene_2.duration", " 4.5 ");
    form.set_value(
        &p("scenes.scene_2.tags"),
        LeafValue::Choices(vec!["night".to_owned(), "day".to_owned()]),
    )
    .unwrap();

    let out = extract(&t, &form, &ExtractOpts::default()).unwrap();
    assert_eq!(
        out["scenes"],
        json!({ "scene_2": { "duration": "4.5", "tags": ["day", "night"] } })
    );
}

#[test]
fn number_text_is_emitted_verbatim() {
    let (t, mut form) = filled();
    set(&mut form, "scenes.scene_1.duration", "007");
    MutationEngine::new(&t, &mut form)
        .apply(&Request::parse(Action::AddItem, "scenes").unwrap())
        .unwrap();
    set(&mut form, "scenes.scene_2.duration", "12345678901234567891");
    let out = extract(&t, &form, &ExtractOpts::default()).unwrap();
    assert_eq!(out["scenes"]["scene_1"]["duration"], "007");
    assert_eq!(out["scenes"]["scene_2"]["duration"], "12345678901234567891");
}

#[test]
fn unchecked_checkbox_is_absent() {
    let (t, mut form) = filled();
    form.set_value(&p("scenes.scene_1.tags"), LeafValue::Choices(Vec::new()))
        .unwrap();
    let out = extract(&t, &form, &ExtractOpts::default()).unwrap();
    assert!(out.get("scenes").is_none());
}

#[test]
fn list_repr_orders_items_by_ordinal() {
    let (t, mut form) = filled();
    for _ in 0..2 {
        MutationEngine::new(&t, &mut form)
            .apply(&Request::parse(Action::AddItem, "scenes").unwrap())
            .unwrap();
    }
    set(&mut form, "scenes.scene_1.title", "a");
    set(&mut form, "scenes.scene_3.title", "c");
    let opts = ExtractOpts {
        array_repr: ArrayRepr::List,
        ..ExtractOpts::default()
    };
    let out = extract(&t, &form, &opts).unwrap();
    assert_eq!(out["scenes"], json!([{ "title": "a" }, { "title": "c" }]));
}

#[test]
fn keyed_items_convert_to_ordered_list() {
    let keyed = json!({ "scene_10": 10, "scene_2": 2, "extra": 0, "scene_1": 1 });
    let list = keyed_to_list(keyed.as_object().unwrap());
    assert_eq!(list, [json!(1), json!(2), json!(10), json!(0)]);
}

#[test]
fn important_gate_does_not_reach_through_containers() {
    let t = Template::from_value(&json!({
        "version": { "_type": "readonly", "_default": "1" },
        "title": { "_type": "text" },
        "outer": {
            "_type": "box",
            "inner": {
                "_type": "box",
                "_important": true,
                "flag": { "_type": "text", "_important": true },
                "note": { "_type": "text" }
            },
            "memo": { "_type": "text" }
        }
    }))
    .unwrap();
    let mut form = build_form(&t).unwrap();
    set(&mut form, "title", "t");
    set(&mut form, "outer.inner.note", "n");
    set(&mut form, "outer.memo", "m");
    let out = extract(&t, &form, &ExtractOpts::default()).unwrap();
    // `inner` is dropped for its unmet gate, which in turn leaves `outer` without its important child.
    assert!(out.get("outer").is_none());

    set(&mut form, "outer.inner.flag", "f");
    let out = extract(&t, &form, &ExtractOpts::default()).unwrap();
    assert_eq!(
        out["outer"],
        json!({ "inner": { "flag": "f", "note": "n" }, "memo": "m" })
    );
}

#[test]
fn unmet_important_root_field_is_a_validation_error() {
    let t = Template::from_value(&json!({
        "version": { "_type": "readonly", "_default": "1" },
        "title": { "_type": "text" },
        "prompt": { "_type": "textarea", "_label": "Prompt", "_important": true }
    }))
    .unwrap();
    let mut form = build_form(&t).unwrap();
    set(&mut form, "title", "t");
    let err = extract(&t, &form, &ExtractOpts::default()).unwrap_err();
    assert!(matches!(err, FormError::Validation { ref field, .. } if field == "prompt"));

    set(&mut form, "prompt", "go");
    let out = extract(&t, &form, &ExtractOpts::default()).unwrap();
    assert_eq!(out["prompt"], "go");
}

#[test]
fn important_mandatory_field_does_not_satisfy_root_gate() {
    let t = Template::from_value(&json!({
        "version": { "_type": "readonly", "_default": "1" },
        "title": { "_type": "text", "_important": true },
        "prompt": { "_type": "textarea", "_label": "Prompt", "_important": true }
    }))
    .unwrap();
    let mut form = build_form(&t).unwrap();
    set(&mut form, "title", "t");
    let err = extract(&t, &form, &ExtractOpts::default()).unwrap_err();
    match err {
        FormError::Validation { field, message } => {
            assert_eq!(field, "prompt");
            assert!(message.contains("Prompt"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }

    set(&mut form, "prompt", "go");
    let out = extract(&t, &form, &ExtractOpts::default()).unwrap();
    assert_eq!(out, json!({ "version": "1", "title": "t", "prompt": "go" }));
}
