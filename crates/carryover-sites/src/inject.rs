//! Composer + adapter write.

use carryover_dom::Document;
use carryover_protocols::ContextError;
use tracing::info;

use crate::adapter::EditorAdapter;
use crate::composer::compose;

/// Prefix `context` to the user's draft in the page editor and put the caret
/// after it. Returns the injected message.
///
/// The draft is only touched once the composed message is ready. A caret
/// failure does not undo the write.
pub fn inject_context<A: EditorAdapter>(
    adapter: &A,
    doc: &mut Document,
    context: &str,
) -> Result<String, ContextError> {
    let site = adapter.site();
    let handle = adapter
        .locate(doc)
        .ok_or_else(|| ContextError::Lookup(format!("{} editor", site.display_name())))?;

    let draft = adapter.read_text(doc, Some(handle));
    let message = compose(context, &draft)
        .ok_or_else(|| ContextError::EmptyResult("no context to inject".to_string()))?;

    if !adapter.write_text(doc, Some(handle), &message) {
        return Err(ContextError::Injection(format!(
            "{} editor rejected the write",
            site.display_name()
        )));
    }
    adapter.place_cursor_at_end(doc, Some(handle));

    info!(site = %site, chars = message.chars().count(), "context injected");
    Ok(message)
}
