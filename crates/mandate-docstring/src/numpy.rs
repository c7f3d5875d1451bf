//! NumPy style sections.
//!
//! ```text
//! Parameters
//! ----------
//! arg1 : int
//!     Description of `arg1`
//! x1, x2 : float, optional
//!     Shared description.
//!
//! Returns
//! -------
//! str
//!     Description of return value.
//! ```
//!
//! A section runs until the next underlined title or the end of the text.

use crate::fields::{clean_name, clean_type, finish, indent_of, render, Entry, Section};

fn section_of(title: &str) -> Option<Section> {
    match title.trim().to_ascii_lowercase().as_str() {
        "parameters" | "params" | "arguments" | "args" | "other parameters"
        | "keyword arguments" => Some(Section::Params),
        "returns" | "return" | "yields" | "yield" => Some(Section::Returns),
        "raises" | "warns" => Some(Section::Raises),
        _ => None,
    }
}

fn is_underline(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 2 && line.chars().all(|c| c == '-')
}

/// True when `lines[i]` is a section title (any title, known or not).
fn is_title(lines: &[&str], i: usize) -> bool {
    !lines[i].trim().is_empty() && lines.get(i + 1).is_some_and(|next| is_underline(next))
}

fn parse_param_head(line: &str) -> Entry {
    let (names, ty) = match line.split_once(':') {
        Some((names, ty)) => (names, clean_type(ty)),
        None => (line, None),
    };
    Entry {
        names: names
            .split(',')
            .map(clean_name)
            .filter(|n| !n.is_empty())
            .collect(),
        ty,
        text: vec![],
    }
}

/// A returns/raises head is either `type` or `name : type`.
fn parse_typed_head(line: &str) -> Entry {
    let ty = match line.split_once(':') {
        Some((_, ty)) => clean_type(ty),
        None => clean_type(line),
    };
    Entry {
        names: vec![],
        ty,
        text: vec![],
    }
}

fn parse_entries(section: Section, body: &[&str], indent: usize) -> Vec<Entry> {
    let mut entries: Vec<Entry> = Vec::new();
    for line in body.iter().filter(|l| !l.trim().is_empty()) {
        match entries.last_mut() {
            Some(entry) if indent_of(line) > indent => entry.text.push(line.trim().to_string()),
            _ => entries.push(match section {
                Section::Params => parse_param_head(line.trim()),
                Section::Returns | Section::Raises => parse_typed_head(line.trim()),
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
        let section = if is_title(&lines, i) {
            section_of(line)
        } else {
            None
        };
        let Some(section) = section else {
            out.push(line.to_string());
            i += 1;
            continue;
        };

        let indent = indent_of(line);
        let start = i + 2;
        let mut end = start;
        while end < lines.len() && !is_title(&lines, end) {
            end += 1;
        }
        while end > start && lines[end - 1].trim().is_empty() {
            end -= 1;
        }

        let mut entries = parse_entries(section, &lines[start..end], indent);
        if section == Section::Params {
            entries.retain(|e| !e.names.is_empty());
        }
        render(section, &entries, indent, &mut out);
        if end < lines.len() && !lines[end].trim().is_empty() {
            // keep sections visually apart when the next title follows directly
            out.push(String::new());
        }
        i = end;
    }

    finish(out)
}
