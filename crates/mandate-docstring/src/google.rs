//! Google style sections.
//!
//! ```text
//! Args:
//!     arg1 (int): Description of `arg1`,
//!         continued on a deeper line.
//!     arg2: Untyped.
//!
//! Returns:
//!     str: Description of return value.
//! ```
//!
//! A section runs until the first non-blank line indented no deeper than its
//! title.

use crate::fields::{clean_name, clean_type, finish, indent_of, render, Entry, Section};

fn section_of(title: &str) -> Option<Section> {
    let title = title.strip_suffix(':')?.trim().to_ascii_lowercase();
    match title.as_str() {
        "args" | "arguments" | "params" | "parameters" | "keyword args"
        | "keyword arguments" | "other parameters" | "kwargs" => Some(Section::Params),
        "returns" | "return" | "yields" | "yield" => Some(Section::Returns),
        "raises" | "raise" | "except" | "exceptions" => Some(Section::Raises),
        _ => None,
    }
}

/// Splits `name (type): text` into its parts.
fn parse_param_head(line: &str) -> Entry {
    let (head, text) = match line.split_once(':') {
        Some((head, text)) => (head.trim(), text.trim()),
        None => (line.trim(), ""),
    };
    let (name, ty) = match head.split_once('(') {
        Some((name, rest)) if rest.ends_with(')') => {
            (name.trim(), clean_type(rest.trim_end_matches(')')))
        }
        _ => (head, None),
    };
    Entry {
        names: name
            .split(',')
            .map(clean_name)
            .filter(|n| !n.is_empty())
            .collect(),
        ty,
        text: vec![text.to_string()],
    }
}

/// Splits `type: text` of a returns/raises entry. A head with spaces is
/// plain text, not a type.
fn parse_typed_head(line: &str) -> Entry {
    let line = line.trim();
    match line.split_once(':') {
        Some((ty, text)) if !ty.trim().is_empty() && !ty.trim().contains(' ') => Entry {
            names: vec![],
            ty: clean_type(ty),
            text: vec![text.trim().to_string()],
        },
        _ => Entry {
            names: vec![],
            ty: None,
            text: vec![line.to_string()],
        },
    }
}

fn parse_entries(section: Section, body: &[&str]) -> Vec<Entry> {
    let Some(entry_indent) = body
        .iter()
        .find(|l| !l.trim().is_empty())
        .map(|l| indent_of(l))
    else {
        return Vec::new();
    };

    let mut entries: Vec<Entry> = Vec::new();
    for line in body.iter().filter(|l| !l.trim().is_empty()) {
        let starts_entry = indent_of(line) <= entry_indent;
        match entries.last_mut() {
            Some(entry) if !starts_entry => entry.text.push(line.trim().to_string()),
            _ => entries.push(match section {
                Section::Params => parse_param_head(line),
                Section::Returns | Section::Raises => parse_typed_head(line),
            }),
        }
    }
    entries
}

pub(crate) fn convert(doc: &str) -> String {
    let lines: Vec<&str> = doc.lines().collect();
    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let Some(section) = section_of(line.trim()) else {
            out.push(line.to_string());
            i += 1;
            continue;
        };

        let indent = indent_of(line);
        let start = i + 1;
        let mut end = start;
        while end < lines.len() && (lines[end].trim().is_empty() || indent_of(lines[end]) > indent) {
            end += 1;
        }
        // trailing blank lines stay outside the section
        while end > start && lines[end - 1].trim().is_empty() {
            end -= 1;
        }

        render(section, &parse_entries(section, &lines[start..end]), indent, &mut out);
        i = end;
    }

    finish(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_docstring() {
        let doc = "One line summary.

Extended description.

Args:
  arg1(int): Description of `arg1`
  arg2(str): Description of `arg2`
Returns:
  str: Description of return value.
";
        assert_eq!(
            convert(doc),
            "One line summary.

Extended description.

:param arg1: Description of `arg1`
:type arg1: int
:param arg2: Description of `arg2`
:type arg2: str
:returns: Description of return value.
:rtype: str"
        );
    }

    #[test]
    fn test_continuation_and_untyped() {
        let doc = "Args:\n    path: Where to look,\n        recursively.\n    depth (int, optional): How deep.\n";
        assert_eq!(
            convert(doc),
            ":param path: Where to look, recursively.\n:param depth: How deep.\n:type depth: int"
        );
    }

    #[test]
    fn test_section_ends_at_dedent() {
        let doc = "Args:\n    a: The a.\nNot part of it.\n";
        assert_eq!(convert(doc), ":param a: The a.\nNot part of it.");
    }

    #[test]
    fn test_blank_lines_inside_section() {
        let doc = "Args:\n    a: The a.\n\n    b: The b.\n\nAfter.";
        assert_eq!(convert(doc), ":param a: The a.\n:param b: The b.\n\nAfter.");
    }

    #[test]
    fn test_indented_doc_keeps_indent() {
        let doc = "    Summary.\n\n    Args:\n        x (float): The x.";
        assert_eq!(
            convert(doc),
            "    Summary.\n\n    :param x: The x.\n    :type x: float"
        );
    }

    #[test]
    fn test_star_names_and_raises() {
        let doc = "Args:\n    *vars: The rest.\nRaises:\n    ValueError: If bad.";
        assert_eq!(
            convert(doc),
            ":param vars: The rest.\n:raises ValueError: If bad."
        );
    }

    #[test]
    fn test_unknown_sections_pass_through() {
        let doc = "Example:\n    do_it()\n";
        assert_eq!(convert(doc), "Example:\n    do_it()");
    }

    #[test]
    fn test_plain_returns_text() {
        let doc = "Returns:\n    The answer to everything.";
        assert_eq!(convert(doc), ":returns: The answer to everything.");
    }
}
