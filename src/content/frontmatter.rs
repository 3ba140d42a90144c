//! Front-matter parsing

use indexmap::IndexMap;
use serde_yaml::Value;

use super::ContentError;

/// Front-matter key/value pairs, in the order they were written
pub type Attributes = IndexMap<String, Value>;

/// Split a leading `---` YAML block from the body.
///
/// The block opens with a `---` line (an optional BOM may precede it) and
/// closes with `---` or `...`. Text without a complete block, or whose block
/// isn't a mapping, is returned untouched with no attributes.
pub fn split(raw: &str) -> Result<(Attributes, &str), ContentError> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let Some(rest) = strip_delimiter_line(text, "---") else {
        return Ok((Attributes::new(), raw));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let marker = line.trim_end();
        if marker == "---" || marker == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok(match parse_attributes(yaml)? {
                Some(attributes) => (attributes, body),
                None => (Attributes::new(), raw),
            });
        }
        offset += line.len();
    }

    // No closing delimiter, treat as no front-matter
    Ok((Attributes::new(), raw))
}

/// Strip an opening delimiter line, returning what follows it
fn strip_delimiter_line<'a>(text: &'a str, delimiter: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(delimiter)?;
    let rest = rest.trim_start_matches([' ', '\t']);
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

/// `None` when the block is YAML but not key/value pairs
fn parse_attributes(yaml: &str) -> Result<Option<Attributes>, ContentError> {
    if yaml.trim().is_empty() {
        return Ok(Some(Attributes::new()));
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Null => Ok(Some(Attributes::new())),
        Value::Mapping(mapping) => Ok(Some(
            mapping
                .into_iter()
                .map(|(key, value)| (key_to_string(key), value))
                .collect(),
        )),
        _ => Ok(None),
    }
}

fn key_to_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
