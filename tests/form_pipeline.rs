//! End-to-end tests of the form metadata pipeline

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use form_layouts::form::{defaults, FormConfig, FormRequest, FormResource, FormSpec, FormTitle, RouteTable};
use form_layouts::layout::{columns, field, fieldset, Control, DecorationHook, LayoutNode};
use form_layouts::naming::camelize;
use form_layouts::schema::{ColumnKind, FieldInfo, StaticSchema};
use form_layouts::{dispatch, ResourceRegistry};

fn invoice_schema() -> StaticSchema {
    StaticSchema::new("Invoice")
        .field("id", FieldInfo::new("integer").read_only())
        .stored_field(
            "number",
            FieldInfo::new("string").required().with_label("Number"),
            ColumnKind::Char,
        )
        .stored_field(
            "status",
            FieldInfo::new("choice").with_choices(vec![
                json!({"value": "draft", "display_name": "Draft"}),
                json!({"value": "sent", "display_name": "Sent"}),
            ]),
            ColumnKind::Char,
        )
        .stored_field(
            "notes",
            FieldInfo::default().with_help_text("Shown on the invoice"),
            ColumnKind::Text,
        )
        .field("total_display", FieldInfo::default())
}

fn registry(config: FormConfig) -> ResourceRegistry {
    let resource = FormResource::new("invoices", config, Arc::new(invoice_schema())).with_routes(
        RouteTable::new()
            .with_route("compact", "form/compact")
            .with_route("details", "form/details/"),
    );
    let mut registry = ResourceRegistry::new();
    registry.register(resource).unwrap();
    registry
}

fn get(registry: &ResourceRegistry, path: &str) -> (u16, Value) {
    let response = dispatch(registry, &FormRequest::new(path));
    (response.status, response.body)
}

fn ids(layout: &Value) -> Vec<&str> {
    layout
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap_or("<container>"))
        .collect()
}

#[test]
fn test_editing_existing_record() {
    let (status, body) = get(&registry(FormConfig::new()), "/invoices/42/form/");
    assert_eq!(status, 200);
    assert_eq!(body["formTitle"], json!("Editing Invoice"));
    assert_eq!(body["method"], json!("patch"));
    assert_eq!(body["hasInitialData"], json!(true));
    assert_eq!(
        body["actions"],
        json!([
            {"id": "save", "label": "Save", "color": "primary"},
            {"id": "cancel", "label": "Cancel", "cancel": true},
        ])
    );
    assert_eq!(body["djangoUrl"], json!("/invoices/42/"));
}

#[test]
fn test_auto_layout_follows_metadata_order() {
    let (_, body) = get(&registry(FormConfig::new()), "/invoices/form/");
    assert_eq!(ids(&body["layout"]), vec!["number", "status", "notes", "total_display"]);
}

#[test]
fn test_textarea_upgrade_and_virtual_field() {
    let (_, body) = get(&registry(FormConfig::new()), "/invoices/form/");
    let layout = body["layout"].as_array().unwrap();
    assert_eq!(layout[2]["type"], json!("textarea"));
    assert_eq!(layout[2]["helpText"], json!("Shown on the invoice"));
    assert_eq!(layout[3]["type"], json!("string"));
}

#[test]
fn test_choices_are_normalized() {
    let (_, body) = get(&registry(FormConfig::new()), "/invoices/form/");
    let status = &body["layout"][1];
    assert_eq!(status["type"], json!("select"));
    assert_eq!(
        status["choices"],
        json!([{"label": "Draft", "value": "draft"}, {"label": "Sent", "value": "sent"}])
    );
}

#[test]
fn test_explicit_layout_beats_defaults_and_metadata() {
    let config = FormConfig::new().with_default_form(
        FormSpec::new()
            .with_layout(LayoutNode::List(vec![
                field("number").with("label", "Invoice no.").into(),
                "notes".into(),
            ]))
            .with_defaults(defaults([
                ("number", "label", "Ignored"),
                ("number", "placeholder", "INV-0001"),
                ("notes", "type", "html"),
            ])),
    );
    let (_, body) = get(&registry(config), "/invoices/form/");
    assert_eq!(
        body["layout"],
        json!([
            {
                "id": "number",
                "type": "string",
                "required": true,
                "readOnly": false,
                "label": "Invoice no.",
                "placeholder": "INV-0001",
            },
            {
                "id": "notes",
                "type": "html",
                "required": false,
                "readOnly": false,
                "helpText": "Shown on the invoice",
            },
        ])
    );
}

#[test]
fn test_named_form_with_containers() {
    let config = FormConfig::new().with_form(
        "details",
        FormSpec::new()
            .with_title(FormTitle::variants("New invoice", "Invoice details"))
            .with_layout(LayoutNode::List(vec![
                fieldset("Header", vec![columns(vec!["number".into(), "status".into()])]),
                LayoutNode::List(vec!["notes".into()]),
            ])),
    );
    let (status, body) = get(&registry(config), "/invoices/7/form/details/");
    assert_eq!(status, 200);
    assert_eq!(body["formTitle"], json!("Invoice details"));
    assert_eq!(body["djangoUrl"], json!("/invoices/7/form/details/"));

    let header = &body["layout"][0];
    assert_eq!(header["type"], json!("fieldset"));
    assert_eq!(header["label"], json!("Header"));
    assert_eq!(header["controls"][0]["type"], json!("columns"));
    assert_eq!(header["controls"][0]["controls"][1]["type"], json!("select"));
    assert_eq!(body["layout"][1]["type"], json!("group"));
    assert_eq!(body["layout"][1]["controls"][0]["type"], json!("textarea"));
}

#[test]
fn test_computed_layout_and_properties() {
    let config = FormConfig::new().with_form(
        "compact",
        FormSpec::new().with_computed_layout(|fields| {
            Ok(LayoutNode::List(
                fields
                    .writable_ids()
                    .filter(|id| fields.get(id).is_some_and(|info| info.required))
                    .map(|id| {
                        field(id)
                            .computed("label", |ctx| {
                                json!(if ctx.has_instance { "Change number" } else { "Number" })
                            })
                            .into()
                    })
                    .collect(),
            ))
        }),
    );
    let registry = registry(config);

    let (_, created) = get(&registry, "/invoices/form/compact/");
    assert_eq!(ids(&created["layout"]), vec!["number"]);
    assert_eq!(created["layout"][0]["label"], json!("Number"));
    assert_eq!(created["djangoUrl"], json!("/invoices/form/compact/"));

    let (_, edited) = get(&registry, "/invoices/3/form/compact/");
    assert_eq!(edited["layout"][0]["label"], json!("Change number"));
}

#[test]
fn test_named_forms_not_configured() {
    let (status, body) = get(&registry(FormConfig::new()), "/invoices/form/compact/");
    assert_eq!(status, 404);
    assert!(body["detail"].as_str().unwrap().contains("not configured"));
}

#[test]
fn test_named_form_not_found_suggests() {
    let config = FormConfig::new().with_form("compact", FormSpec::new());
    let (status, body) = get(&registry(config), "/invoices/form/compakt/");
    assert_eq!(status, 404);
    assert_eq!(
        body["detail"],
        json!("form with name 'compakt' not found (did you mean: compact?)")
    );
}

#[test]
fn test_unknown_paths_are_404() {
    let registry = registry(FormConfig::new());
    assert_eq!(get(&registry, "/invoices/42/").0, 404);
    assert_eq!(get(&registry, "/orders/form/").0, 404);
}

#[test]
fn test_layout_errors_are_500() {
    let config = FormConfig::new().with_default_form(FormSpec::new().with_layout(LayoutNode::List(
        vec!["number".into(), "number".into()],
    )));
    let (status, body) = get(&registry(config), "/invoices/form/");
    assert_eq!(status, 500);
    assert!(body["detail"].as_str().unwrap().contains("number"));
}

#[test]
fn test_choice_without_label_is_500() {
    let schema = StaticSchema::new("Ticket").field(
        "priority",
        FieldInfo::new("choice").with_choices(vec![json!({"value": 1})]),
    );
    let mut registry = ResourceRegistry::new();
    registry
        .register(FormResource::new("tickets", FormConfig::new(), Arc::new(schema)))
        .unwrap();

    let (status, body) = get(&registry, "/tickets/form/");
    assert_eq!(status, 500);
    assert!(body["detail"].as_str().unwrap().contains("'priority'"));
}

struct MarkControls;

impl DecorationHook for MarkControls {
    fn decorate_item(&self, control: &mut Control) {
        let mark = match control {
            Control::Container { .. } => "container",
            Control::Field(_) => "field",
        };
        control.props_mut().insert("data_mark".to_string(), json!(mark));
    }
}

#[test]
fn test_resource_decoration_hook() {
    let config = FormConfig::new().with_default_form(
        FormSpec::new().with_layout(LayoutNode::List(vec![fieldset(
            "Header",
            vec!["number".into()],
        )])),
    );
    let resource = FormResource::new("invoices", config, Arc::new(invoice_schema()))
        .with_decoration_hook(Arc::new(MarkControls));
    let mut registry = ResourceRegistry::new();
    registry.register(resource).unwrap();

    let (status, body) = get(&registry, "/invoices/form/");
    assert_eq!(status, 200);
    let header = &body["layout"][0];
    assert_eq!(header["dataMark"], json!("container"));
    assert_eq!(header["controls"][0]["id"], json!("number"));
    assert_eq!(header["controls"][0]["dataMark"], json!("field"));
}

#[test]
fn test_camelize_is_idempotent_on_output() {
    let (_, body) = get(&registry(FormConfig::new()), "/invoices/form/");
    assert_eq!(camelize(body["layout"].clone()), body["layout"]);
}

#[test]
fn test_resource_is_shared_across_threads() {
    let registry = registry(FormConfig::new().with_form("compact", FormSpec::new()));
    std::thread::scope(|scope| {
        for i in 0..8 {
            let registry = &registry;
            scope.spawn(move || {
                let path = format!("/invoices/{}/form/compact/", i);
                let (status, body) = get(registry, &path);
                assert_eq!(status, 200);
                assert_eq!(body["djangoUrl"], json!(format!("/invoices/{}/form/compact/", i)));
            });
        }
    });
}

#[test]
fn test_create_response_snapshot() {
    let schema = StaticSchema::new("City").stored_field(
        "name",
        FieldInfo::new("string").required().with_label("Name"),
        ColumnKind::Char,
    );
    let mut registry = ResourceRegistry::new();
    registry
        .register(FormResource::new("cities", FormConfig::new(), Arc::new(schema)))
        .unwrap();

    let response = dispatch(&registry, &FormRequest::new("/cities/form/"));
    insta::assert_json_snapshot!(response.body, @r###"
    {
      "layout": [
        {
          "id": "name",
          "type": "string",
          "required": true,
          "readOnly": false,
          "label": "Name"
        }
      ],
      "formTitle": "Creating a new City",
      "actions": [
        {
          "id": "create",
          "label": "Create",
          "color": "primary"
        },
        {
          "id": "cancel",
          "label": "Cancel",
          "cancel": true
        }
      ],
      "method": "post",
      "hasInitialData": false,
      "djangoUrl": "/cities/"
    }
    "###);
}
