use super::*;

fn editor_page() -> (Document, NodeId) {
    let mut doc = Document::new();
    let body = doc.body();
    let editor = doc.append_element(body, "div").unwrap();
    doc.set_attribute(editor, "contenteditable", "true").unwrap();
    (doc, editor)
}

#[test]
fn test_new_document_has_body() {
    let doc = Document::new();
    assert_eq!(doc.tag_name(doc.body()), Some("body"));
    let html = doc.parent(doc.body()).unwrap();
    assert_eq!(doc.tag_name(html), Some("html"));
    assert_eq!(doc.parent(html), Some(doc.root()));
}

#[test]
fn test_dangling_node_is_an_error() {
    let doc = Document::new();
    let dangling = NodeId(9_999);
    assert!(matches!(doc.node(dangling), Err(DomError::NodeNotFound(_))));
    assert_eq!(doc.tag_name(dangling), None);
}

#[test]
fn test_append_child_moves_node() {
    let mut doc = Document::new();
    let body = doc.body();
    let a = doc.append_element(body, "div").unwrap();
    let b = doc.append_element(body, "div").unwrap();
    let p = doc.append_element(a, "p").unwrap();

    doc.append_child(b, p).unwrap();

    assert!(doc.children(a).unwrap().is_empty());
    assert_eq!(doc.children(b).unwrap(), &[p]);
    assert_eq!(doc.parent(p), Some(b));
}

#[test]
fn test_append_child_rejects_cycles() {
    let mut doc = Document::new();
    let body = doc.body();
    let outer = doc.append_element(body, "div").unwrap();
    let inner = doc.append_element(outer, "div").unwrap();

    assert!(matches!(doc.append_child(inner, outer), Err(DomError::Cycle { .. })));
    assert!(matches!(doc.append_child(outer, outer), Err(DomError::Cycle { .. })));
}

#[test]
fn test_attributes_are_case_insensitive() {
    let mut doc = Document::new();
    let body = doc.body();
    let el = doc.append_element(body, "DIV").unwrap();
    doc.set_attribute(el, "Data-TestId", "chat-input").unwrap();

    assert_eq!(doc.tag_name(el), Some("div"));
    assert_eq!(doc.attribute(el, "data-testid"), Some("chat-input"));

    doc.set_attribute(el, "data-testid", "other").unwrap();
    assert_eq!(doc.attribute(el, "data-testid"), Some("other"));
}

#[test]
fn test_set_attribute_on_text_fails() {
    let mut doc = Document::new();
    let body = doc.body();
    let text = doc.append_text(body, "hello").unwrap();
    assert!(matches!(doc.set_attribute(text, "id", "x"), Err(DomError::NotAnElement(_))));
}

#[test]
fn test_attach_shadow_is_idempotent() {
    let mut doc = Document::new();
    let body = doc.body();
    let host = doc.append_element(body, "chat-message").unwrap();

    let first = doc.attach_shadow(host).unwrap();
    let second = doc.attach_shadow(host).unwrap();

    assert_eq!(first, second);
    assert_eq!(doc.shadow_root(host), Some(first));
    assert_eq!(doc.shadow_host(first), Some(host));
    assert_eq!(doc.parent(first), None);
}

#[test]
fn test_text_content_skips_shadow_tree() {
    let mut doc = Document::new();
    let body = doc.body();
    let host = doc.append_element(body, "div").unwrap();
    doc.append_text(host, "light").unwrap();
    let shadow = doc.attach_shadow(host).unwrap();
    doc.append_text(shadow, "shadow").unwrap();

    assert_eq!(doc.text_content(host).unwrap(), "light");
}

#[test]
fn test_inner_text_breaks_blocks_and_br() {
    let mut doc = Document::new();
    let body = doc.body();
    let div = doc.append_element(body, "div").unwrap();
    let p1 = doc.append_element(div, "p").unwrap();
    doc.append_text(p1, "first").unwrap();
    let p2 = doc.append_element(div, "p").unwrap();
    doc.append_text(p2, "second").unwrap();
    doc.append_element(p2, "br").unwrap();
    doc.append_text(p2, "third").unwrap();

    assert_eq!(doc.inner_text(div).unwrap(), "first\nsecond\nthird");
}

#[test]
fn test_inner_text_inline_elements_do_not_break() {
    let mut doc = Document::new();
    let body = doc.body();
    let p = doc.append_element(body, "p").unwrap();
    doc.append_text(p, "hello ").unwrap();
    let b = doc.append_element(p, "b").unwrap();
    doc.append_text(b, "world").unwrap();

    assert_eq!(doc.inner_text(p).unwrap(), "hello world");
}

#[test]
fn test_set_inner_text_round_trip() {
    let (mut doc, editor) = editor_page();
    let text = "line one\n\nline three\n";

    doc.set_inner_text(editor, text).unwrap();

    assert_eq!(doc.inner_text(editor).unwrap(), text);
    let brs = doc
        .children(editor)
        .unwrap()
        .iter()
        .filter(|c| doc.tag_name(**c) == Some("br"))
        .count();
    assert_eq!(brs, 3);
}

#[test]
fn test_set_inner_text_replaces_children() {
    let (mut doc, editor) = editor_page();
    let p = doc.append_element(editor, "p").unwrap();
    doc.append_text(p, "old").unwrap();

    doc.set_inner_text(editor, "new").unwrap();

    assert_eq!(doc.inner_text(editor).unwrap(), "new");
    assert_eq!(doc.parent(p), None);
}

#[test]
fn test_content_editable_inheritance() {
    let (mut doc, editor) = editor_page();
    let p = doc.append_element(editor, "p").unwrap();
    let span = doc.append_element(p, "span").unwrap();
    let locked = doc.append_element(editor, "div").unwrap();
    doc.set_attribute(locked, "contenteditable", "false").unwrap();

    assert!(doc.is_content_editable(editor));
    assert!(doc.is_content_editable(span));
    assert!(!doc.is_content_editable(locked));
    assert!(!doc.is_content_editable(doc.body()));
}

#[test]
fn test_content_editable_empty_and_plaintext_values() {
    let mut doc = Document::new();
    let body = doc.body();
    let a = doc.append_element(body, "div").unwrap();
    doc.set_attribute(a, "contenteditable", "").unwrap();
    let b = doc.append_element(body, "div").unwrap();
    doc.set_attribute(b, "contenteditable", "plaintext-only").unwrap();

    assert!(doc.is_content_editable(a));
    assert!(doc.is_content_editable(b));
}

#[test]
fn test_form_field_value() {
    let mut doc = Document::new();
    let body = doc.body();
    let textarea = doc.append_element(body, "textarea").unwrap();
    let div = doc.append_element(body, "div").unwrap();

    assert!(doc.is_form_field(textarea));
    assert_eq!(doc.value(textarea), Some(""));
    doc.set_value(textarea, "draft").unwrap();
    assert_eq!(doc.value(textarea), Some("draft"));

    assert!(!doc.is_form_field(div));
    assert!(doc.set_value(div, "x").is_err());
}

#[test]
fn test_input_value_attribute_seeds_value() {
    let mut doc = Document::new();
    let body = doc.body();
    let input = doc.append_element(body, "input").unwrap();
    doc.set_attribute(input, "value", "seed").unwrap();
    assert_eq!(doc.value(input), Some("seed"));
}

#[test]
fn test_selection_range_is_clamped() {
    let mut doc = Document::new();
    let body = doc.body();
    let textarea = doc.append_element(body, "textarea").unwrap();
    doc.set_value(textarea, "héllo").unwrap();

    doc.set_selection_range(textarea, 99, 99).unwrap();

    assert_eq!(doc.selection_range(textarea), Some((5, 5)));
}

#[test]
fn test_set_value_resets_selection() {
    let mut doc = Document::new();
    let body = doc.body();
    let textarea = doc.append_element(body, "textarea").unwrap();
    doc.set_value(textarea, "abc").unwrap();
    doc.set_selection_range(textarea, 1, 2).unwrap();

    doc.set_value(textarea, "abcdef").unwrap();

    assert_eq!(doc.selection_range(textarea), None);
}

#[test]
fn test_collapse_selection_to_end() {
    let (mut doc, editor) = editor_page();
    doc.set_inner_text(editor, "a\nb").unwrap();

    doc.collapse_selection_to_end(editor).unwrap();

    assert_eq!(
        doc.selection(),
        Some(Selection {
            container: editor,
            offset: 3
        })
    );
}

#[test]
fn test_focus_records_single_event() {
    let (mut doc, editor) = editor_page();

    doc.focus(editor).unwrap();
    doc.focus(editor).unwrap();

    assert_eq!(doc.active_element(), Some(editor));
    let focus_events = doc.events().iter().filter(|e| e.kind == EventKind::Focus).count();
    assert_eq!(focus_events, 1);
}

#[test]
fn test_dispatch_event() {
    let (mut doc, editor) = editor_page();
    doc.dispatch_event(editor, EventKind::Input).unwrap();
    doc.dispatch_event(editor, EventKind::Change).unwrap();

    let kinds: Vec<_> = doc.events().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Input, EventKind::Change]);
    assert!(doc.events().iter().all(|e| e.target == editor && e.bubbles));
}

#[test]
fn test_query_selector_id_and_descendants() {
    let mut doc = Document::new();
    let body = doc.body();
    let ask = doc.append_element(body, "div").unwrap();
    doc.set_attribute(ask, "id", "ask-input").unwrap();
    let p = doc.append_element(ask, "p").unwrap();
    let span = doc.append_element(p, "span").unwrap();

    assert_eq!(doc.query_selector("#ask-input").unwrap(), Some(ask));
    assert_eq!(doc.query_selector("#ask-input p").unwrap(), Some(p));
    assert_eq!(doc.query_selector("#ask-input p span").unwrap(), Some(span));
    assert_eq!(doc.query_selector("#ask-input span p").unwrap(), None);
}

#[test]
fn test_query_selector_attributes_and_classes() {
    let mut doc = Document::new();
    let body = doc.body();
    let decoy = doc.append_element(body, "div").unwrap();
    doc.set_attribute(decoy, "contenteditable", "true").unwrap();
    let input = doc.append_element(body, "div").unwrap();
    doc.set_attribute(input, "contenteditable", "true").unwrap();
    doc.set_attribute(input, "data-testid", "chat-input").unwrap();
    doc.set_attribute(input, "class", "ql-editor textarea").unwrap();

    assert_eq!(
        doc.query_selector(r#"div[contenteditable="true"][data-testid="chat-input"]"#)
            .unwrap(),
        Some(input)
    );
    assert_eq!(doc.query_selector(".ql-editor").unwrap(), Some(input));
    assert_eq!(doc.query_selector("[contenteditable]").unwrap(), Some(decoy));
}

#[test]
fn test_query_selector_does_not_enter_shadow() {
    let mut doc = Document::new();
    let body = doc.body();
    let host = doc.append_element(body, "div").unwrap();
    let shadow = doc.attach_shadow(host).unwrap();
    let hidden = doc.append_element(shadow, "textarea").unwrap();
    doc.set_attribute(hidden, "id", "prompt-textarea").unwrap();

    assert_eq!(doc.query_selector("#prompt-textarea").unwrap(), None);
}

#[test]
fn test_query_selector_invalid() {
    let doc = Document::new();
    assert!(matches!(
        doc.query_selector("div >"),
        Err(DomError::InvalidSelector { .. })
    ));
}
