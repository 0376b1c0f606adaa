use crate::component::{TokenParser, priority};
use crate::context::ParserContext;
use bindpath_expr::{ExprRef, Expression};
use std::fmt::Write;

/// Regular (`"a\n"`), verbatim (`@"a""b"`) and interpolated (`$"a{x:N2}"`)
/// string literals, in any combination. Single quotes delimit strings too.
///
/// An interpolated literal becomes `string.Format(template, holes...)`; with no
/// holes it collapses to a plain constant.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringTokenParser;

const PREFIXES: [(&str, bool, bool); 5] = [
    ("$@", true, true),
    ("@$", true, true),
    ("$", true, false),
    ("@", false, true),
    ("", false, false),
];

struct Literal {
    /// Unescaped text, with `{{`/`}}` already collapsed.
    text: String,
    /// Format template with holes renumbered and brace escapes kept.
    template: String,
    holes: Vec<ExprRef>,
}

impl TokenParser for StringTokenParser {
    fn priority(&self) -> i32 {
        priority::STRING
    }

    fn name(&self) -> &'static str {
        "string"
    }

    fn try_parse(
        &self,
        ctx: &mut ParserContext<'_>,
        expression: Option<&ExprRef>,
    ) -> Option<ExprRef> {
        if expression.is_some() {
            return None;
        }
        let start = ctx.position();
        ctx.skip_whitespaces();
        let begin = ctx.position();

        let Some((prefix_len, interpolated, verbatim)) = PREFIXES.iter().find_map(|&(p, i, v)| {
            let at = begin + p.chars().count();
            (ctx.is_token_at(p, begin) && matches!(ctx.char_at(at), Some('"' | '\'')))
                .then_some((p.len(), i, v))
        }) else {
            ctx.set_position(start);
            return None;
        };
        ctx.move_next(prefix_len);
        let Some(quote) = ctx.current() else {
            ctx.set_position(start);
            return None;
        };
        ctx.move_next(1);

        match read_body(ctx, begin, quote, interpolated, verbatim) {
            Some(literal) if literal.holes.is_empty() => Some(Expression::constant(literal.text)),
            Some(literal) => {
                let mut args = Vec::with_capacity(literal.holes.len() + 1);
                args.push(Expression::constant(literal.template));
                args.extend(literal.holes);
                Some(Expression::method_call(
                    Some(Expression::string_type()),
                    "Format",
                    args,
                    Vec::new(),
                ))
            }
            None => {
                ctx.set_position(start);
                None
            }
        }
    }
}

fn read_body(
    ctx: &mut ParserContext<'_>,
    begin: usize,
    quote: char,
    interpolated: bool,
    verbatim: bool,
) -> Option<Literal> {
    let mut literal = Literal {
        text: String::new(),
        template: String::new(),
        holes: Vec::new(),
    };
    loop {
        let Some(c) = ctx.current() else {
            ctx.add_error_at("Unterminated string literal", begin);
            return None;
        };
        match c {
            c if c == quote => {
                if verbatim && ctx.peek(1) == Some(quote) {
                    literal.push(quote);
                    ctx.move_next(2);
                    continue;
                }
                ctx.move_next(1);
                return Some(literal);
            }
            '\\' if !verbatim => {
                let escaped = unescape(ctx)?;
                literal.push(escaped);
            }
            '{' if interpolated => {
                if ctx.peek(1) == Some('{') {
                    literal.text.push('{');
                    literal.template.push_str("{{");
                    ctx.move_next(2);
                    continue;
                }
                ctx.move_next(1);
                read_hole(ctx, &mut literal)?;
            }
            '}' if interpolated => {
                if ctx.peek(1) == Some('}') {
                    literal.text.push('}');
                    literal.template.push_str("}}");
                    ctx.move_next(2);
                    continue;
                }
                ctx.add_error(
                    "Unexpected '}' in interpolated string; use '}}' for a literal brace",
                );
                return None;
            }
            c => {
                literal.push(c);
                ctx.move_next(1);
            }
        }
    }
}

impl Literal {
    fn push(&mut self, c: char) {
        self.text.push(c);
        self.template.push(c);
    }
}

/// Consumes a backslash escape at the cursor.
fn unescape(ctx: &mut ParserContext<'_>) -> Option<char> {
    let at = ctx.position();
    let escaped = match ctx.peek(1) {
        Some('n') => '\n',
        Some('t') => '\t',
        Some('r') => '\r',
        Some('0') => '\0',
        Some('a') => '\u{07}',
        Some('b') => '\u{08}',
        Some('f') => '\u{0C}',
        Some('v') => '\u{0B}',
        Some(c @ ('\\' | '\'' | '"')) => c,
        Some('u') => {
            let hex = ctx.slice(at + 2, at + 6);
            let decoded = (hex.len() == 4)
                .then(|| u32::from_str_radix(&hex, 16).ok())
                .flatten()
                .and_then(char::from_u32);
            let Some(c) = decoded else {
                ctx.add_error(format!("Invalid unicode escape sequence '\\u{}'", hex));
                return None;
            };
            ctx.move_next(6);
            return Some(c);
        }
        Some(other) => {
            ctx.add_error(format!("Unrecognized escape sequence '\\{}'", other));
            return None;
        }
        None => {
            ctx.add_error("Unterminated escape sequence");
            return None;
        }
    };
    ctx.move_next(2);
    Some(escaped)
}

/// Parses `expr[,alignment][:format]}` after the opening brace.
fn read_hole(ctx: &mut ParserContext<'_>, literal: &mut Literal) -> Option<()> {
    let Some(hole) = ctx.parse_expression() else {
        ctx.add_error("Expected expression in interpolation hole");
        return None;
    };
    ctx.skip_whitespaces();

    let index = literal.holes.len();
    literal.holes.push(hole);
    // Writing to a String cannot fail.
    let _ = write!(literal.template, "{{{}", index);

    if ctx.is_token(",") {
        ctx.move_next(1);
        ctx.skip_whitespaces();
        let align_start = ctx.position();
        if ctx.is_token("-") {
            ctx.move_next(1);
        }
        while ctx.is_digit(ctx.position()) {
            ctx.move_next(1);
        }
        let alignment = ctx.slice(align_start, ctx.position());
        if alignment.trim_start_matches('-').is_empty() {
            ctx.add_error("Expected alignment after ',' in interpolation hole");
            return None;
        }
        let _ = write!(literal.template, ",{}", alignment);
        ctx.skip_whitespaces();
    }

    if ctx.is_token(":") {
        ctx.move_next(1);
        let format_start = ctx.position();
        while ctx.current().is_some_and(|c| c != '}') {
            ctx.move_next(1);
        }
        let format = ctx.slice(format_start, ctx.position());
        let _ = write!(literal.template, ":{}", format);
    }

    if !ctx.is_token("}") {
        ctx.add_error("Expected '}' to close interpolation hole");
        return None;
    }
    ctx.move_next(1);
    literal.template.push('}');
    Some(())
}
