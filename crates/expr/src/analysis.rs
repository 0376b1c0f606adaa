//! Read-only queries over expression trees.

use crate::ast::{ExprRef, Expression};
use crate::constant::ConstantValue;
use crate::display::write_quoted;

/// Pre-order traversal.
pub fn walk<'a>(node: &'a ExprRef, f: &mut impl FnMut(&'a ExprRef)) {
    f(node);
    for child in node.children() {
        walk(child, f);
    }
}

/// Returns the member path text of a member/indexer chain rooted at the
/// implicit data context (`Items[0].Name`), or `None` for any other shape.
///
/// Indexer arguments must be constants; strings keep their quotes so that
/// `Map["a.b"]` stays a single indexer segment.
pub fn member_path_text(expr: &Expression) -> Option<String> {
    match expr {
        Expression::Member { target: None, name } => Some(name.clone()),
        Expression::Member {
            target: Some(target),
            name,
        } => {
            let prefix = member_path_text(target)?;
            Some(format!("{}.{}", prefix, name))
        }
        Expression::Index { target, args } => {
            let mut path = member_path_text(target)?;
            path.push('[');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    path.push(',');
                }
                path.push_str(&indexer_argument(arg)?);
            }
            path.push(']');
            Some(path)
        }
        _ => None,
    }
}

impl Expression {
    /// See [`member_path_text`].
    pub fn to_member_path(&self) -> Option<String> {
        member_path_text(self)
    }
}

fn indexer_argument(arg: &Expression) -> Option<String> {
    let value = arg.as_constant()?;
    let text = match value {
        ConstantValue::Null => "null".to_string(),
        ConstantValue::Bool(b) => b.to_string(),
        ConstantValue::Int32(v) => v.to_string(),
        ConstantValue::Int64(v) => v.to_string(),
        ConstantValue::UInt32(v) => v.to_string(),
        ConstantValue::UInt64(v) => v.to_string(),
        ConstantValue::BigInteger(v) => v.to_string(),
        ConstantValue::String(s) => {
            let mut quoted = String::new();
            write_quoted(s, &mut quoted).ok()?;
            quoted
        }
        ConstantValue::Single(_)
        | ConstantValue::Double(_)
        | ConstantValue::Decimal(_)
        | ConstantValue::Type(_) => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::BinaryOperator;

    #[test]
    fn test_member_path_text_for_member_chain() {
        let items = Expression::root_member("Items");
        let indexed = Expression::index(items, vec![Expression::constant(0)]);
        let name = Expression::member(Some(indexed), "Name");
        assert_eq!(member_path_text(&name).as_deref(), Some("Items[0].Name"));
        assert_eq!(name.to_member_path(), member_path_text(&name));
    }

    #[test]
    fn test_member_path_text_quotes_string_keys() {
        let map = Expression::root_member("Map");
        let indexed = Expression::index(map, vec![Expression::constant("a.b")]);
        assert_eq!(member_path_text(&indexed).as_deref(), Some("Map[\"a.b\"]"));
    }

    #[test]
    fn test_member_path_text_rejects_other_shapes() {
        let call = Expression::method_call(None, "M", vec![], vec![]);
        assert_eq!(member_path_text(&call), None);

        let dynamic_index = Expression::index(
            Expression::root_member("Items"),
            vec![Expression::root_member("SelectedIndex")],
        );
        assert_eq!(member_path_text(&dynamic_index), None);

        let binary = Expression::binary(
            Expression::root_member("a"),
            BinaryOperator::Add,
            Expression::root_member("b"),
        );
        assert_eq!(member_path_text(&binary), None);
    }

    #[test]
    fn test_walk_visits_every_node() {
        let tree = Expression::binary(
            Expression::member(Some(Expression::root_member("a")), "b"),
            BinaryOperator::Add,
            Expression::constant(1),
        );
        let mut kinds = Vec::new();
        walk(&tree, &mut |n| kinds.push(n.kind()));
        assert_eq!(kinds, vec!["binary", "member", "member", "constant"]);
    }
}
