//! The dispatch chain.
//!
//! For every node, transform modules are asked in a fixed priority order
//! whether they handle its kind; the first taker emits and recurses. The
//! order is load-bearing: the calls module must intercept constructor-body
//! blocks before the statements module treats them as plain blocks. A node
//! no module claims is a diagnostic, never a silent no-op.
//!
//! Before delegating, the chain emits any leading comment whose start
//! offset lies beyond the last-emitted-comment cursor, translating a small
//! fixed set of documentation tags on the way out.

use tsdart_ast::NodeId;
use tsdart_common::FatalError;

use crate::session::Transpiler;
use crate::transforms;

type Handler = fn(&mut Transpiler, NodeId) -> Result<bool, FatalError>;

/// Transform modules in priority order.
pub(crate) const CHAIN: &[(&str, Handler)] = &[
    ("calls", transforms::calls::try_emit),
    ("declarations", transforms::declarations::try_emit),
    ("expressions", transforms::expressions::try_emit),
    ("literals", transforms::literals::try_emit),
    ("modules", transforms::modules::try_emit),
    ("statements", transforms::statements::try_emit),
    ("types", transforms::types::try_emit),
];

/// Names of the chain modules in priority order, for tests.
#[must_use]
pub fn chain_order() -> Vec<&'static str> {
    CHAIN.iter().map(|(name, _)| *name).collect()
}

impl Transpiler<'_> {
    /// Visit one node: emit pending leading comments, then dispatch.
    pub fn visit(&mut self, id: NodeId) -> Result<(), FatalError> {
        self.emit_leading_comments(id);
        if self.options.generate_source_map {
            let span = self.module.ast.span(id);
            let original = self.line_map.position(span.start);
            self.sink.mark(original);
        }
        for (_, handler) in CHAIN {
            if handler(self, id)? {
                return Ok(());
            }
        }
        let kind = self.module.ast.kind(id);
        self.error(id, format!("unsupported node kind: {kind:?}"))
    }

    fn emit_leading_comments(&mut self, id: NodeId) {
        let module = self.module;
        for comment in &module.ast.get(id).leading_comments {
            if comment.pos < self.comment_cursor {
                continue;
            }
            self.comment_cursor = comment.pos + comment.text.len() as u32 + 1;
            if is_const_marker(&comment.text) {
                continue;
            }
            let translated = translate_comment(&comment.text);
            self.sink.newline();
            self.sink.emit(&translated);
            self.sink.newline();
        }
    }
}

/// Is this comment the structured const marker (`/* @const */`)?
#[must_use]
pub(crate) fn is_const_marker(text: &str) -> bool {
    let inner = text
        .trim()
        .trim_start_matches("/*")
        .trim_end_matches("*/")
        .trim_start_matches("//")
        .trim();
    inner == "@const"
}

/// Translate documentation markup: `{@link X}` becomes `[X]`, and the
/// parameter/return/throws/module/description/deprecated tags are stripped.
/// Ordinary text passes through untouched.
#[must_use]
pub(crate) fn translate_comment(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{@link ") {
        out.push_str(&rest[..start]);
        let after = &rest[start + "{@link ".len()..];
        match after.find('}') {
            Some(close) => {
                out.push('[');
                out.push_str(after[..close].trim());
                out.push(']');
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    // Longest tags first so `@returns` is not half-eaten by `@return`.
    for tag in [
        "@description",
        "@deprecated",
        "@returns",
        "@return",
        "@throws",
        "@module",
        "@param",
    ] {
        out = out.replace(tag, "");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_markup_becomes_brackets() {
        assert_eq!(
            translate_comment("/** See {@link MyClass} for details. */"),
            "/** See [MyClass] for details. */"
        );
    }

    #[test]
    fn tags_are_stripped_ordinary_text_kept() {
        let translated = translate_comment("/** @param x the value, @returns a copy */");
        assert!(!translated.contains("@param"));
        assert!(!translated.contains("@returns"));
        assert!(translated.contains("the value"));
        assert!(translated.contains("a copy"));
    }

    #[test]
    fn const_marker_detection() {
        assert!(is_const_marker("/* @const */"));
        assert!(is_const_marker("// @const"));
        assert!(!is_const_marker("/* @constant folding */"));
        assert!(!is_const_marker("/** docs */"));
    }
}
