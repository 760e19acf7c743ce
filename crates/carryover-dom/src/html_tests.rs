use super::*;

const CHAT_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Chat</title><style>body { color: red; }</style></head>
  <body>
    <main>
      <div class="turn"><h5>You said:</h5><p>What is a monad?</p></div>
      <div class="turn"><p>A monad is a &lt;pattern&gt;.</p></div>
    </main>
    <form>
      <textarea id="prompt-textarea" placeholder="Ask">half typed</textarea>
      <input id="title" value="seed">
    </form>
  </body>
</html>"#;

#[test]
fn test_parse_locates_body() {
    let doc = Document::parse_html(CHAT_PAGE);
    assert_eq!(doc.tag_name(doc.body()), Some("body"));
}

#[test]
fn test_parse_decodes_entities() {
    let doc = Document::parse_html(CHAT_PAGE);
    let main = doc.query_selector("main").unwrap().unwrap();
    assert!(doc.text_content(main).unwrap().contains("A monad is a <pattern>."));
}

#[test]
fn test_parse_seeds_form_values() {
    let doc = Document::parse_html(CHAT_PAGE);
    let textarea = doc.query_selector("#prompt-textarea").unwrap().unwrap();
    let input = doc.query_selector("#title").unwrap().unwrap();

    assert_eq!(doc.value(textarea), Some("half typed"));
    assert_eq!(doc.value(input), Some("seed"));
    assert_eq!(doc.attribute(textarea, "placeholder"), Some("Ask"));
}

#[test]
fn test_parse_fragment_without_body() {
    let doc = Document::parse_html("<p>just a paragraph</p>");
    assert_eq!(doc.tag_name(doc.body()), Some("body"));
    assert_eq!(doc.inner_text(doc.body()).unwrap(), "just a paragraph");
}

#[test]
fn test_set_inner_html() {
    let mut doc = Document::new();
    let body = doc.body();
    let p = doc.append_element(body, "p").unwrap();
    doc.append_text(p, "stale").unwrap();

    doc.set_inner_html(p, r#"<span data-lexical-text="true">fresh &amp; new</span>"#)
        .unwrap();

    let span = doc.query_selector("p span").unwrap().unwrap();
    assert_eq!(doc.attribute(span, "data-lexical-text"), Some("true"));
    assert_eq!(doc.inner_text(p).unwrap(), "fresh & new");
}

#[test]
fn test_set_inner_html_on_text_fails() {
    let mut doc = Document::new();
    let body = doc.body();
    let text = doc.append_text(body, "x").unwrap();
    assert!(doc.set_inner_html(text, "<b>y</b>").is_err());
}

#[test]
fn test_outer_html_escapes_text_and_attributes() {
    let mut doc = Document::new();
    let body = doc.body();
    let div = doc.append_element(body, "div").unwrap();
    doc.set_attribute(div, "title", "a \"quoted\" <title>").unwrap();
    doc.append_text(div, "1 < 2 & 3 > 2").unwrap();
    doc.append_element(div, "br").unwrap();

    assert_eq!(
        doc.outer_html(div).unwrap(),
        r#"<div title="a &quot;quoted&quot; &lt;title&gt;">1 &lt; 2 &amp; 3 &gt; 2<br></div>"#
    );
}

#[test]
fn test_outer_html_serializes_live_values() {
    let mut doc = Document::new();
    let body = doc.body();
    let textarea = doc.append_element(body, "textarea").unwrap();
    doc.set_value(textarea, "injected <text>").unwrap();
    let input = doc.append_element(body, "input").unwrap();
    doc.set_value(input, "typed").unwrap();

    assert_eq!(
        doc.outer_html(textarea).unwrap(),
        "<textarea>injected &lt;text&gt;</textarea>"
    );
    assert_eq!(doc.outer_html(input).unwrap(), r#"<input value="typed">"#);
}

#[test]
fn test_outer_html_writes_shadow_roots() {
    let mut doc = Document::new();
    let body = doc.body();
    let host = doc.append_element(body, "x-card").unwrap();
    let shadow = doc.attach_shadow(host).unwrap();
    doc.append_text(shadow, "inside").unwrap();

    assert_eq!(
        doc.outer_html(host).unwrap(),
        r#"<x-card><template shadowrootmode="open">inside</template></x-card>"#
    );
}

#[test]
fn test_parse_declarative_shadow_root() {
    let doc = Document::parse_html(
        r#"<html><body><x-chat><template shadowrootmode="open"><div contenteditable="true" data-testid="chat-input">hidden</div></template></x-chat></body></html>"#,
    );
    let host = doc.query_selector("x-chat").unwrap().unwrap();

    let shadow = doc.shadow_root(host).expect("shadow fragment attached");
    assert!(doc.children(host).unwrap().is_empty());
    assert_eq!(doc.shadow_host(shadow), Some(host));

    let editor = doc.children(shadow).unwrap()[0];
    assert_eq!(doc.attribute(editor, "data-testid"), Some("chat-input"));
    assert_eq!(doc.inner_text(editor).unwrap(), "hidden");

    assert_eq!(doc.query_selector(r#"div[data-testid="chat-input"]"#).unwrap(), None);
    assert_eq!(doc.query_selector("template").unwrap(), None);
}

#[test]
fn test_plain_template_keeps_its_content() {
    let doc = Document::parse_html("<body><template id=\"row\"><li>item</li></template></body>");
    let template = doc.query_selector("#row").unwrap().unwrap();

    assert_eq!(doc.shadow_root(doc.body()), None);
    assert_eq!(doc.outer_html(template).unwrap(), r#"<template id="row"><li>item</li></template>"#);
}

#[test]
fn test_set_inner_html_with_shadow_template() {
    let mut doc = Document::new();
    let body = doc.body();
    let container = doc.append_element(body, "div").unwrap();

    doc.set_inner_html(container, r#"<x-msg><template shadowrootmode="open"><p>S</p></template>light</x-msg>"#)
        .unwrap();

    let host = doc.children(container).unwrap()[0];
    assert!(doc.shadow_root(host).is_some());
    assert_eq!(doc.text_content(host).unwrap(), "light");
}

#[test]
fn test_shadow_roots_survive_to_html() {
    let doc = Document::parse_html(
        r#"<html><body><x-msg><template shadowrootmode="open"><p>S</p></template>light</x-msg></body></html>"#,
    );
    let html = doc.to_html().unwrap();
    assert!(html.contains(r#"<x-msg><template shadowrootmode="open"><p>S</p></template>light</x-msg>"#));

    let reparsed = Document::parse_html(&html);
    let host = reparsed.query_selector("x-msg").unwrap().unwrap();
    assert!(reparsed.shadow_root(host).is_some());
}

#[test]
fn test_to_html_round_trips_through_parser() {
    let doc = Document::parse_html(CHAT_PAGE);
    let html = doc.to_html().unwrap();
    assert!(html.starts_with("<!DOCTYPE html><html>"));

    let reparsed = Document::parse_html(&html);
    let textarea = reparsed.query_selector("#prompt-textarea").unwrap().unwrap();
    assert_eq!(reparsed.value(textarea), Some("half typed"));
}

#[test]
fn test_escape_text() {
    assert_eq!(escape_text("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
    assert_eq!(escape_text("plain"), "plain");
}
