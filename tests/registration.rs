use blockconv::events::{EXTENSION_ADDED, EXTENSION_FIELD_ADDED};
use blockconv::generator::block_json::{OUTPUT_SHAPE_ROUND, OUTPUT_SHAPE_SQUARE};
use blockconv::model::{BlockInfo, CategoryInfo, ConversionResult, ExtensionMetadata};
use blockconv::{ExtensionHost, FieldTypeRegistry, RecordingBus};
use serde_json::{Value, json};

fn test_extension() -> ExtensionMetadata {
    serde_json::from_value(json!({
        "id": "test",
        "name": "fake test extension",
        "color1": "#111111",
        "color2": "#222222",
        "color3": "#333333",
        "blocks": [
            {
                "func": "MAKE_A_VARIABLE",
                "blockType": "button",
                "text": "this is a button"
            },
            {
                "opcode": "reporter",
                "blockType": "reporter",
                "text": "simple text",
                "blockIconURI": "invalid icon URI"
            },
            {
                "opcode": "inlineImage",
                "blockType": "reporter",
                "text": "text and [IMAGE]",
                "arguments": {
                    "IMAGE": { "type": "image", "dataURI": "invalid image URI" }
                }
            },
            "---",
            {
                "opcode": "command",
                "blockType": "command",
                "text": "text with [ARG] [ARG_WITH_DEFAULT]",
                "arguments": {
                    "ARG": { "type": "string" },
                    "ARG_WITH_DEFAULT": { "type": "string", "defaultValue": "default text" }
                }
            },
            {
                "opcode": "ifElse",
                "blockType": "conditional",
                "branchCount": 2,
                "text": ["test if [THING] is spiffy and if so then", "or elsewise"],
                "arguments": {
                    "THING": { "type": "Boolean" }
                }
            },
            {
                "opcode": "loop",
                "blockType": "loop",
                "isTerminal": true,
                "text": ["loopty [MANY] loops"],
                "arguments": {
                    "MANY": { "type": "number" }
                }
            }
        ]
    }))
    .expect("valid metadata")
}

fn register(meta: &ExtensionMetadata) -> (CategoryInfo, RecordingBus) {
    let registry = FieldTypeRegistry::new();
    let mut host = ExtensionHost::with_registry(&registry, RecordingBus::new());
    let category = host.register_extension(meta).expect("extension converts");
    (category, host.into_bus())
}

fn json_of(result: &ConversionResult) -> &Value {
    result.json.as_ref().expect("scriptable block has json")
}

fn has(json: &Value, key: &str) -> bool {
    json.get(key).is_some()
}

fn assert_category_info(json: &Value) {
    assert_eq!(json["category"], "fake test extension");
    assert_eq!(json["colour"], "#111111");
    assert_eq!(json["colourSecondary"], "#222222");
    assert_eq!(json["colourTertiary"], "#333333");
    assert_eq!(json["inputsInline"], true);
}

#[test]
fn one_extension_added_event_with_all_blocks_in_order() {
    let meta = test_extension();
    let (category, bus) = register(&meta);

    assert_eq!(bus.count(EXTENSION_ADDED), 1);
    assert_eq!(bus.count(EXTENSION_FIELD_ADDED), 0);
    let published = bus.categories().next().unwrap();
    assert_eq!(published, &category);

    assert_eq!(category.id, "test");
    assert_eq!(category.blocks.len(), meta.blocks.len());
    for result in &category.blocks {
        let non_empty = match &result.info {
            BlockInfo::Block(_) | BlockInfo::Separator => true,
            BlockInfo::Callback(func) => !func.is_empty(),
        };
        assert!(non_empty, "every block and pseudo-block must have info");
    }
    let opcodes: Vec<Option<&str>> = category
        .blocks
        .iter()
        .map(|r| r.info.as_block().and_then(|b| b.opcode.as_deref()))
        .collect();
    assert_eq!(
        opcodes,
        vec![
            None,
            Some("reporter"),
            Some("inlineImage"),
            None,
            Some("command"),
            Some("ifElse"),
            Some("loop")
        ]
    );
}

#[test]
fn button() {
    let (category, _) = register(&test_extension());
    let button = &category.blocks[0];
    assert!(button.json.is_none());
    assert_eq!(button.info, BlockInfo::Callback("MAKE_A_VARIABLE".into()));
    assert_eq!(
        button.xml,
        r#"<button text="this is a button" callbackKey="MAKE_A_VARIABLE"></button>"#
    );
}

#[test]
fn reporter_with_icon() {
    let (category, _) = register(&test_extension());
    let reporter = &category.blocks[1];
    let json = json_of(reporter);

    assert_eq!(json["type"], "test_reporter");
    assert_category_info(json);
    assert_eq!(json["checkboxInFlyout"], true);
    assert_eq!(json["outputShape"], OUTPUT_SHAPE_ROUND);
    assert_eq!(json["output"], "String");
    assert!(!has(json, "previousStatement"));
    assert!(!has(json, "nextStatement"));
    assert_eq!(json["extensions"], json!(["from_extension", "scratch_extension"]));
    assert_eq!(json["message0"], "%1 %2simple text");
    assert!(!has(json, "message1"));
    assert_eq!(
        json["args0"],
        json!([
            { "type": "field_image", "src": "invalid icon URI", "width": 40, "height": 40 },
            { "type": "field_vertical_separator" }
        ])
    );
    assert!(!has(json, "args1"));
    assert_eq!(reporter.xml, r#"<block type="test_reporter"></block>"#);
}

#[test]
fn inline_image() {
    let (category, _) = register(&test_extension());
    let inline_image = &category.blocks[2];
    let json = json_of(inline_image);

    assert_eq!(json["type"], "test_inlineImage");
    assert_category_info(json);
    assert_eq!(json["checkboxInFlyout"], true);
    assert_eq!(json["outputShape"], OUTPUT_SHAPE_ROUND);
    assert_eq!(json["output"], "String");
    assert!(!has(json, "previousStatement"));
    assert!(!has(json, "nextStatement"));
    assert_eq!(json["extensions"], json!(["from_extension"]));
    assert_eq!(json["message0"], "text and %1");
    assert!(!has(json, "message1"));
    assert_eq!(
        json["args0"],
        json!([{
            "type": "field_image",
            "src": "invalid image URI",
            "width": 24,
            "height": 24,
            "flip_rtl": false
        }])
    );
    assert!(!has(json, "args1"));
    assert_eq!(inline_image.xml, r#"<block type="test_inlineImage"></block>"#);
}

#[test]
fn separator() {
    let (category, _) = register(&test_extension());
    let separator = &category.blocks[3];
    assert!(separator.json.is_none());
    assert_eq!(separator.info, BlockInfo::Separator);
    assert_eq!(separator.xml, r#"<sep gap="36"/>"#);
}

#[test]
fn command() {
    let (category, _) = register(&test_extension());
    let command = &category.blocks[4];
    let json = json_of(command);

    assert_eq!(json["type"], "test_command");
    assert_category_info(json);
    assert_eq!(json["outputShape"], OUTPUT_SHAPE_SQUARE);
    assert!(has(json, "previousStatement"));
    assert!(has(json, "nextStatement"));
    assert!(!has(json, "output"));
    assert_eq!(json["extensions"], json!(["from_extension"]));
    assert_eq!(json["message0"], "text with %1 %2");
    assert!(!has(json, "message1"));
    assert_eq!(json["args0"][0], json!({ "type": "input_value", "name": "ARG" }));
    assert!(!has(json, "args1"));
    assert_eq!(
        command.xml,
        concat!(
            r#"<block type="test_command"><value name="ARG"><shadow type="text"></shadow></value>"#,
            r#"<value name="ARG_WITH_DEFAULT"><shadow type="text"><field name="TEXT">"#,
            r#"default text</field></shadow></value></block>"#
        )
    );
}

#[test]
fn conditional() {
    let (category, _) = register(&test_extension());
    let conditional = &category.blocks[5];
    let json = json_of(conditional);

    assert_eq!(json["type"], "test_ifElse");
    assert_category_info(json);
    assert_eq!(json["outputShape"], OUTPUT_SHAPE_SQUARE);
    assert!(has(json, "previousStatement"));
    assert!(has(json, "nextStatement"));
    assert_eq!(json["extensions"], json!(["from_extension"]));
    assert_eq!(json["message0"], "test if %1 is spiffy and if so then");
    assert_eq!(json["message1"], "%1");
    assert_eq!(json["message2"], "or elsewise");
    assert_eq!(json["message3"], "%1");
    assert!(!has(json, "message4"));
    assert_eq!(
        json["args0"][0],
        json!({ "type": "input_value", "name": "THING", "check": "Boolean" })
    );
    assert_eq!(json["args1"][0], json!({ "type": "input_statement", "name": "SUBSTACK" }));
    assert!(!has(json, "args2"));
    assert_eq!(json["args3"][0], json!({ "type": "input_statement", "name": "SUBSTACK2" }));
    assert!(!has(json, "args4"));
    assert_eq!(
        conditional.xml,
        r#"<block type="test_ifElse"><value name="THING"></value></block>"#
    );
}

#[test]
fn terminal_loop() {
    let (category, _) = register(&test_extension());
    let lp = &category.blocks[6];
    let json = json_of(lp);

    assert_eq!(json["type"], "test_loop");
    assert_category_info(json);
    assert_eq!(json["outputShape"], OUTPUT_SHAPE_SQUARE);
    assert!(has(json, "previousStatement"));
    assert!(!has(json, "nextStatement"));
    assert_eq!(json["extensions"], json!(["from_extension"]));
    assert_eq!(json["message0"], "loopty %1 loops");
    assert_eq!(json["message1"], "%1");
    assert_eq!(json["message2"], "%1");
    assert!(!has(json, "message3"));
    assert_eq!(json["args0"][0], json!({ "type": "input_value", "name": "MANY" }));
    assert_eq!(json["args1"][0], json!({ "type": "input_statement", "name": "SUBSTACK" }));
    assert_eq!(json["lastDummyAlign2"], "RIGHT");
    assert_eq!(json["args2"][0]["type"], "field_image");
    assert_eq!(json["args2"][0]["flip_rtl"], true);
    assert!(!has(json, "args3"));
    assert_eq!(
        lp.xml,
        r#"<block type="test_loop"><value name="MANY"><shadow type="math_number"></shadow></value></block>"#
    );
}

#[test]
fn toolbox_xml_is_well_formed() {
    let (category, _) = register(&test_extension());
    for result in &category.blocks {
        let doc = roxmltree::Document::parse(&result.xml)
            .unwrap_or_else(|e| panic!("{} is not well-formed: {}", result.xml, e));
        let root = doc.root_element().tag_name().name();
        assert!(matches!(root, "block" | "button" | "sep"), "unexpected root {}", root);
    }
}

#[test]
fn event_payload_serializes_like_the_bus_expects() {
    let (_, bus) = register(&test_extension());
    let value = serde_json::to_value(&bus.events[0]).unwrap();
    assert_eq!(value["event"], "EXTENSION_ADDED");
    assert_eq!(value["payload"]["id"], "test");
    let blocks = value["payload"]["blocks"].as_array().unwrap();
    assert_eq!(blocks[0]["info"], "MAKE_A_VARIABLE");
    assert_eq!(blocks[3]["info"], "---");
    assert_eq!(blocks[4]["info"]["opcode"], "command");
    assert!(blocks[0].get("json").is_none());
}

fn extra_blocks() -> ExtensionMetadata {
    serde_json::from_value(json!({
        "id": "extra",
        "name": "Extra",
        "blocks": [
            {
                "opcode": "isTouching",
                "blockType": "Boolean",
                "text": "touching [OBJECT]?",
                "arguments": { "OBJECT": { "type": "string", "defaultValue": "edge" } }
            },
            { "opcode": "stamp", "text": "stamp", "disableMonitor": true },
            {
                "opcode": "echo",
                "blockType": "command",
                "text": "[A] and [A]",
                "arguments": { "A": { "type": "number", "defaultValue": 1 } }
            }
        ]
    }))
    .expect("valid metadata")
}

#[test]
fn boolean_reporter() {
    let (category, _) = register(&extra_blocks());
    let boolean = &category.blocks[0];
    let json = json_of(boolean);

    assert_eq!(json["type"], "extra_isTouching");
    assert_eq!(json["checkboxInFlyout"], true);
    assert_eq!(json["outputShape"], OUTPUT_SHAPE_ROUND);
    assert_eq!(json["output"], "Boolean");
    assert!(!has(json, "previousStatement"));
    assert!(!has(json, "nextStatement"));
    assert_eq!(json["message0"], "touching %1?");
    assert_eq!(json["args0"], json!([{ "type": "input_value", "name": "OBJECT" }]));
    assert_eq!(
        boolean.xml,
        concat!(
            r#"<block type="extra_isTouching"><value name="OBJECT"><shadow type="text">"#,
            r#"<field name="TEXT">edge</field></shadow></value></block>"#
        )
    );
}

#[test]
fn info_keeps_the_descriptor_as_declared() {
    let (category, _) = register(&extra_blocks());
    let stamp = &category.blocks[1];

    assert!(has(json_of(stamp), "nextStatement"));
    assert_eq!(
        serde_json::to_value(&stamp.info).unwrap(),
        json!({ "opcode": "stamp", "text": "stamp", "disableMonitor": true })
    );
}

#[test]
fn repeated_placeholder_yields_one_input_per_occurrence() {
    let (category, _) = register(&extra_blocks());
    let echo = &category.blocks[2];
    let json = json_of(echo);

    assert_eq!(json["message0"], "%1 and %2");
    assert_eq!(json["args0"][0]["name"], "A");
    assert_eq!(json["args0"][1]["name"], "A");
    assert_eq!(echo.xml.matches(r#"<value name="A">"#).count(), 2);
}
