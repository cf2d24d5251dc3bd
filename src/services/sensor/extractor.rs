use serde_json::Value;

/// Parsed `a.b[0].c` style address into a JSON document.
///
/// `[` acts as a separator and `]` is dropped, so `foo.bar[1]`, `foo[bar][1]`
/// and `foo.bar.1` all resolve the same way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(expr: &str) -> Self {
        let segments = expr
            .replace('[', ".")
            .replace(']', "")
            .split('.')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Self { segments }
    }

    /// True when the path addresses the whole document
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

/// Resolve `path` inside `document`, or `None` as soon as a step is missing.
pub fn lookup<'a>(document: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    descend(document, path.segments())
}

fn descend<'a>(node: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(node);
    };

    let child = match node {
        Value::Object(map) => map.get(head.as_str()),
        Value::Array(items) => head.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }?;

    descend(child, rest)
}

/// Resolve `path_expr` inside `document`, falling back to `default` when any
/// step is missing. An empty expression yields the document itself.
pub fn extract<'a>(document: &'a Value, path_expr: &str, default: &'a Value) -> &'a Value {
    let path = FieldPath::parse(path_expr);
    if path.is_root() {
        return document;
    }
    lookup(document, &path).unwrap_or(default)
}
