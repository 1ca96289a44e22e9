//! Item template materialisation.
//!
//! A list region carries a template (plain JSON with `$ref`, `$each`, `$if`
//! and a few operators) and a collection of data items. Materialising the
//! template with one item bound produces the text blocks for that item's
//! flow unit.
//!
//! ```json
//! [
//!   { "content": { "$ref": "$item.name" }, "style": { "bold": true } },
//!   { "content": { "$concat": ["Trait: ", { "$ref": "$item.trait" }] } }
//! ]
//! ```

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::model::TextBlock;

/// Evaluation context: the document data plus scoped item bindings.
pub struct EvalContext<'a> {
    data: &'a Value,
    scope: HashMap<String, Value>,
}

impl<'a> EvalContext<'a> {
    pub fn new(data: &'a Value) -> Self {
        EvalContext {
            data,
            scope: HashMap::new(),
        }
    }

    /// Resolve a dot-separated path against scope first, then root data.
    fn resolve_ref(&self, path: &str) -> Option<&Value> {
        let parts: Vec<&str> = path.split('.').collect();
        if let Some(scoped) = self.scope.get(parts[0]) {
            return traverse(scoped, &parts[1..]);
        }
        traverse(self.data, &parts)
    }

    /// Create a child context with an additional binding.
    pub fn with_binding(&self, key: &str, value: Value) -> EvalContext<'a> {
        let mut scope = self.scope.clone();
        scope.insert(key.to_string(), value);
        EvalContext {
            data: self.data,
            scope,
        }
    }
}

/// Traverse a JSON value by dot-path segments.
fn traverse<'v>(value: &'v Value, parts: &[&str]) -> Option<&'v Value> {
    let mut current = value;
    for part in parts {
        match current {
            Value::Object(map) => {
                current = map.get(*part)?;
            }
            Value::Array(arr) => {
                let idx: usize = part.parse().ok()?;
                current = arr.get(idx)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Resolve a list region's items source to the bound items.
///
/// Returns `None` when the source does not resolve to an array.
pub fn resolve_items(items: &Value, data: &Value) -> Option<Vec<Value>> {
    let ctx = EvalContext::new(data);
    match evaluate_node(items, &ctx)? {
        Value::Array(arr) => Some(arr),
        _ => None,
    }
}

/// Materialise `template` with `item` bound under `binding`.
pub fn materialize(
    template: &Value,
    binding: &str,
    item: &Value,
    data: &Value,
) -> Result<Vec<TextBlock>, String> {
    let ctx = EvalContext::new(data).with_binding(binding, item.clone());
    let evaluated = evaluate_node(template, &ctx)
        .ok_or_else(|| "template evaluation produced no output".to_string())?;
    // A root-level $each yields the flatten marker, not an array
    let evaluated = match flatten_marker(evaluated) {
        Ok(parts) => Value::Array(parts),
        Err(other) => other,
    };
    let parts = match evaluated {
        Value::Array(_) => evaluated,
        // A single block is accepted as shorthand for a one-part panel
        Value::Object(_) => Value::Array(vec![evaluated]),
        other => return Err(format!("template produced {other}, expected text blocks")),
    };
    serde_json::from_value(parts).map_err(|e| e.to_string())
}

/// Evaluate a single node in the template tree.
fn evaluate_node(node: &Value, ctx: &EvalContext) -> Option<Value> {
    match node {
        Value::Object(map) => {
            if let Some(result) = evaluate_expr_object(map, ctx) {
                return result;
            }

            let mut result = Map::new();
            for (key, val) in map {
                if let Some(evaluated) = evaluate_node(val, ctx) {
                    result.insert(key.clone(), evaluated);
                }
            }
            Some(Value::Object(result))
        }
        Value::Array(arr) => {
            let mut result = Vec::new();
            for item in arr {
                if let Some(evaluated) = evaluate_node(item, ctx) {
                    // $each results get flattened
                    match flatten_marker(evaluated) {
                        Ok(inner) => result.extend(inner),
                        Err(value) => result.push(value),
                    }
                }
            }
            Some(Value::Array(result))
        }
        _ => Some(node.clone()),
    }
}

fn flatten_marker(v: Value) -> Result<Vec<Value>, Value> {
    match v {
        Value::Object(mut map) if map.contains_key("__flatten") => match map.remove("__flatten") {
            Some(Value::Array(inner)) => Ok(inner),
            _ => Ok(vec![]),
        },
        other => Err(other),
    }
}

/// Try to evaluate an object as an expression node.
/// Returns `Some(Some(value))` if it was an expression that produced a value,
/// `Some(None)` if it was an expression that produced nothing (e.g. false $if),
/// `None` if this is not an expression object.
fn evaluate_expr_object(map: &Map<String, Value>, ctx: &EvalContext) -> Option<Option<Value>> {
    if let Some(path) = map.get("$ref") {
        return Some(path.as_str().and_then(|p| ctx.resolve_ref(p)).cloned());
    }
    if let Some(source) = map.get("$each") {
        return Some(evaluate_each(source, map, ctx));
    }
    if let Some(condition) = map.get("$if") {
        return Some(evaluate_if(condition, map, ctx));
    }
    if let Some(args) = map.get("$cond") {
        return Some(evaluate_cond(args, ctx));
    }
    if let Some(args) = map.get("$eq") {
        return Some(evaluate_equality(args, ctx, true));
    }
    if let Some(args) = map.get("$ne") {
        return Some(evaluate_equality(args, ctx, false));
    }
    if let Some(arg) = map.get("$upper") {
        return Some(evaluate_string_transform(arg, ctx, |s| s.to_uppercase()));
    }
    if let Some(arg) = map.get("$lower") {
        return Some(evaluate_string_transform(arg, ctx, |s| s.to_lowercase()));
    }
    if let Some(args) = map.get("$concat") {
        return Some(evaluate_concat(args, ctx));
    }
    if let Some(args) = map.get("$format") {
        return Some(evaluate_format(args, ctx));
    }
    if let Some(arg) = map.get("$count") {
        return Some(evaluate_count(arg, ctx));
    }
    None
}

// ─── Expression evaluators ──────────────────────────────────────────

fn evaluate_each(source: &Value, map: &Map<String, Value>, ctx: &EvalContext) -> Option<Value> {
    let arr = match evaluate_node(source, ctx)? {
        Value::Array(a) => a,
        _ => vec![],
    };

    let binding_name = map.get("as").and_then(|v| v.as_str()).unwrap_or("$each");
    let template = map.get("template")?;

    let results: Vec<Value> = arr
        .into_iter()
        .filter_map(|item| evaluate_node(template, &ctx.with_binding(binding_name, item)))
        .collect();

    let mut marker = Map::new();
    marker.insert("__flatten".to_string(), Value::Array(results));
    Some(Value::Object(marker))
}

fn evaluate_if(condition: &Value, map: &Map<String, Value>, ctx: &EvalContext) -> Option<Value> {
    let resolved = evaluate_node(condition, ctx).unwrap_or(Value::Null);
    if is_truthy(&resolved) {
        map.get("then").and_then(|t| evaluate_node(t, ctx))
    } else {
        map.get("else").and_then(|e| evaluate_node(e, ctx))
    }
}

fn evaluate_cond(args: &Value, ctx: &EvalContext) -> Option<Value> {
    let arr = args.as_array()?;
    if arr.len() != 3 {
        return None;
    }
    let condition = evaluate_node(&arr[0], ctx).unwrap_or(Value::Null);
    if is_truthy(&condition) {
        evaluate_node(&arr[1], ctx)
    } else {
        evaluate_node(&arr[2], ctx)
    }
}

fn evaluate_equality(args: &Value, ctx: &EvalContext, equal: bool) -> Option<Value> {
    let arr = args.as_array()?;
    if arr.len() != 2 {
        return None;
    }
    let a = evaluate_node(&arr[0], ctx).unwrap_or(Value::Null);
    let b = evaluate_node(&arr[1], ctx).unwrap_or(Value::Null);
    let same = match (a.as_f64(), b.as_f64()) {
        (Some(na), Some(nb)) => na == nb,
        _ => a == b,
    };
    Some(Value::Bool(same == equal))
}

fn evaluate_string_transform(
    arg: &Value,
    ctx: &EvalContext,
    transform: fn(&str) -> String,
) -> Option<Value> {
    let resolved = evaluate_node(arg, ctx)?;
    let s = value_to_string(&resolved)?;
    Some(Value::String(transform(&s)))
}

fn evaluate_concat(args: &Value, ctx: &EvalContext) -> Option<Value> {
    let arr = args.as_array()?;
    let mut result = String::new();
    for item in arr {
        // Missing refs concatenate as empty rather than dropping the string
        let resolved = evaluate_node(item, ctx).unwrap_or(Value::Null);
        result.push_str(&value_to_string(&resolved)?);
    }
    Some(Value::String(result))
}

fn evaluate_format(args: &Value, ctx: &EvalContext) -> Option<Value> {
    let arr = args.as_array()?;
    if arr.len() != 2 {
        return None;
    }
    let value = evaluate_node(&arr[0], ctx).and_then(|v| v.as_f64())?;
    let format_str = evaluate_node(&arr[1], ctx)?;
    let fmt = format_str.as_str()?;

    // "0.00" means two decimal places
    let decimal_places = fmt.find('.').map_or(0, |dot| fmt.len() - dot - 1);

    Some(Value::String(format!("{:.prec$}", value, prec = decimal_places)))
}

fn evaluate_count(arg: &Value, ctx: &EvalContext) -> Option<Value> {
    let count = match evaluate_node(arg, ctx) {
        Some(Value::Array(arr)) => arr.len(),
        _ => 0,
    };
    Some(Value::Number(serde_json::Number::from(count)))
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Determine if a JSON value is truthy.
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}

/// Convert a JSON value to a string for string operations.
fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
