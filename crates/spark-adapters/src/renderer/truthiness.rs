//! Tera treats an unknown name as `false` when it is tested for truth
//! (`{% if name %}`, `a and b`, `not a`). That hides typos in generator
//! templates, so such names are looked up before rendering.

use std::collections::HashSet;

use tera::ast::{Expr, ExprVal, LogicOperator, Node};
use tera::Value;

/// First name tested for truth that is neither bound in `context` nor
/// introduced by the template itself (`set`, `for`). Names guarded with
/// `is defined` or a `default` filter are accepted.
pub(crate) fn first_unbound(ast: &[Node], context: &Value) -> Option<String> {
    let mut locals = HashSet::from(["loop".to_string()]);
    collect_locals(ast, &mut locals);

    let mut tested = Vec::new();
    visit_nodes(ast, &mut tested);

    tested
        .into_iter()
        .find(|name| !locals.contains(root(name)) && !is_bound(context, name))
}

fn collect_locals(nodes: &[Node], locals: &mut HashSet<String>) {
    for node in nodes {
        match node {
            Node::Set(_, set) => {
                locals.insert(set.key.clone());
            }
            Node::Forloop(_, forloop, _) => {
                locals.insert(forloop.value.clone());
                if let Some(key) = &forloop.key {
                    locals.insert(key.clone());
                }
                collect_locals(&forloop.body, locals);
                if let Some(empty) = &forloop.empty_body {
                    collect_locals(empty, locals);
                }
            }
            Node::If(branches, _) => {
                for (_, _, body) in &branches.conditions {
                    collect_locals(body, locals);
                }
                if let Some((_, body)) = &branches.otherwise {
                    collect_locals(body, locals);
                }
            }
            Node::Block(_, block, _) => collect_locals(&block.body, locals),
            Node::FilterSection(_, section, _) => collect_locals(&section.body, locals),
            _ => {}
        }
    }
}

fn visit_nodes(nodes: &[Node], tested: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::VariableBlock(_, expr) => visit_expr(expr, false, tested),
            Node::Set(_, set) => visit_expr(&set.value, false, tested),
            Node::If(branches, _) => {
                for (_, condition, body) in &branches.conditions {
                    visit_expr(condition, true, tested);
                    visit_nodes(body, tested);
                }
                if let Some((_, body)) = &branches.otherwise {
                    visit_nodes(body, tested);
                }
            }
            Node::Forloop(_, forloop, _) => {
                visit_expr(&forloop.container, false, tested);
                visit_nodes(&forloop.body, tested);
                if let Some(empty) = &forloop.empty_body {
                    visit_nodes(empty, tested);
                }
            }
            Node::Block(_, block, _) => visit_nodes(&block.body, tested),
            Node::FilterSection(_, section, _) => {
                for arg in section.filter.args.values() {
                    visit_expr(arg, false, tested);
                }
                visit_nodes(&section.body, tested);
            }
            _ => {}
        }
    }
}

/// `truthy` marks expressions Tera evaluates as a boolean, where a lookup
/// failure becomes `false` instead of an error.
fn visit_expr(expr: &Expr, truthy: bool, tested: &mut Vec<String>) {
    match &expr.val {
        ExprVal::Ident(name) if truthy && !expr.has_default_filter() => tested.push(name.clone()),
        ExprVal::Logic(logic) => {
            let short_circuit = matches!(logic.operator, LogicOperator::And | LogicOperator::Or);
            visit_expr(&logic.lhs, short_circuit, tested);
            visit_expr(&logic.rhs, short_circuit, tested);
        }
        ExprVal::Math(math) => {
            visit_expr(&math.lhs, false, tested);
            visit_expr(&math.rhs, false, tested);
        }
        ExprVal::In(within) => {
            visit_expr(&within.lhs, false, tested);
            visit_expr(&within.rhs, false, tested);
        }
        ExprVal::Test(test) => test.args.iter().for_each(|a| visit_expr(a, false, tested)),
        ExprVal::FunctionCall(call) => call.args.values().for_each(|a| visit_expr(a, false, tested)),
        ExprVal::MacroCall(call) => call.args.values().for_each(|a| visit_expr(a, false, tested)),
        ExprVal::Array(items) => items.iter().for_each(|a| visit_expr(a, false, tested)),
        _ => {}
    }

    for filter in &expr.filters {
        filter.args.values().for_each(|a| visit_expr(a, false, tested));
    }
}

fn root(name: &str) -> &str {
    name.split(['.', '[']).next().unwrap_or(name)
}

fn is_bound(context: &Value, name: &str) -> bool {
    // Subscripts can hold expressions; only the root is checked for those.
    let path = if name.contains('[') { root(name) } else { name };
    tera::dotted_pointer(context, path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use tera::{Context, Tera};

    fn unbound(body: &str, context: Value) -> Option<String> {
        let mut tera = Tera::default();
        tera.add_raw_template("t", body).unwrap();
        let ast = &tera.get_template("t").unwrap().ast;
        first_unbound(ast, &context)
    }

    fn ctx() -> Value {
        let vars = BTreeMap::from([("kind", "tabs")]);
        let mut context = Context::new();
        context.insert("withStyles", &true);
        context.insert("vars", &vars);
        context.into_json()
    }

    #[test]
    fn misspelled_condition_is_reported() {
        assert_eq!(
            unbound("{% if withStyls %}s{% endif %}", ctx()).as_deref(),
            Some("withStyls")
        );
    }

    #[test]
    fn operands_of_and_or_not_are_checked() {
        assert_eq!(
            unbound("{% if withStyles and not dark %}{% endif %}", ctx()).as_deref(),
            Some("dark")
        );
        assert_eq!(
            unbound("{{ withStyles or vars.theme }}", ctx()).as_deref(),
            Some("vars.theme")
        );
    }

    #[test]
    fn guarded_and_local_names_are_accepted() {
        let body = "{% set flag = true %}\
                    {% if flag and vars.kind %}{% endif %}\
                    {% if missing is defined %}{% endif %}\
                    {% if missing | default(value=false) %}{% endif %}\
                    {% for key, value in vars %}{% if key and value and loop.first %}{% endif %}{% endfor %}";
        assert_eq!(unbound(body, ctx()), None);
    }

    #[test]
    fn nested_branches_are_walked() {
        let body = "{% if withStyles %}{% if vars.kid %}x{% endif %}{% endif %}";
        assert_eq!(unbound(body, ctx()).as_deref(), Some("vars.kid"));
    }
}
