//! Context + draft composition.

/// Instruction placed in front of injected context.
pub const CONTEXT_PREFIX: &str = "Here is some persistent user context you should always consider:";

/// Build the injected message: instruction, context, a blank line, then the
/// user's draft unchanged.
///
/// Returns `None` when `context` is blank; the caller skips the injection
/// and leaves the draft alone.
///
/// Not idempotent: composing over a draft that already carries the prefix
/// stacks a second one.
pub fn compose(context: &str, draft: &str) -> Option<String> {
    let context = context.trim();
    if context.is_empty() {
        return None;
    }
    Some(format!("{} {}\n\n{}", CONTEXT_PREFIX, context, draft))
}
