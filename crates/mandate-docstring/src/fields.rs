//! REST field rendering shared by the dialect converters.

/// What a recognised section documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    Params,
    Returns,
    Raises,
}

/// One entry of a section: names, an optional type and free text.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Entry {
    pub names: Vec<String>,
    pub ty: Option<String>,
    pub text: Vec<String>,
}

impl Entry {
    fn joined_text(&self) -> String {
        self.text
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub(crate) fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

/// Strips the star prefixes of variadic names (`*args`, `**kwargs`).
pub(crate) fn clean_name(name: &str) -> String {
    name.trim().trim_start_matches('*').to_string()
}

/// Drops the `optional` marker and markup from a type spec.
pub(crate) fn clean_type(ty: &str) -> Option<String> {
    let ty = ty.trim().trim_matches('`').trim_matches('*');
    let ty = ty
        .strip_suffix("optional")
        .map(|t| t.trim_end().trim_end_matches(',').trim_end())
        .unwrap_or(ty);
    if ty.is_empty() {
        None
    } else {
        Some(ty.to_string())
    }
}

/// Appends the REST fields of a section, indented by `indent` spaces.
pub(crate) fn render(section: Section, entries: &[Entry], indent: usize, out: &mut Vec<String>) {
    let pad = " ".repeat(indent);
    for entry in entries {
        let text = entry.joined_text();
        match section {
            Section::Params => {
                for name in &entry.names {
                    out.push(field(&pad, &format!("param {}", name), &text));
                    if let Some(ty) = &entry.ty {
                        out.push(field(&pad, &format!("type {}", name), ty));
                    }
                }
            }
            Section::Returns => {
                if !text.is_empty() {
                    out.push(field(&pad, "returns", &text));
                }
                if let Some(ty) = &entry.ty {
                    out.push(field(&pad, "rtype", ty));
                }
            }
            Section::Raises => match &entry.ty {
                Some(ty) => out.push(field(&pad, &format!("raises {}", ty), &text)),
                None => out.push(field(&pad, "raises", &text)),
            },
        }
    }
}

fn field(pad: &str, head: &str, text: &str) -> String {
    if text.is_empty() {
        format!("{}:{}:", pad, head)
    } else {
        format!("{}:{}: {}", pad, head, text)
    }
}

/// Removes trailing blank lines and joins.
pub(crate) fn finish(mut out: Vec<String>) -> String {
    while out.last().is_some_and(|l| l.trim().is_empty()) {
        out.pop();
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_type() {
        assert_eq!(clean_type("int, optional").as_deref(), Some("int"));
        assert_eq!(clean_type("`str`").as_deref(), Some("str"));
        assert_eq!(clean_type("optional"), None);
        assert_eq!(clean_type(" "), None);
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("*args"), "args");
        assert_eq!(clean_name("**kwargs"), "kwargs");
        assert_eq!(clean_name(" x "), "x");
    }

    #[test]
    fn test_render_params() {
        let entries = vec![Entry {
            names: vec!["x1".into(), "x2".into()],
            ty: Some("int".into()),
            text: vec!["Coordinates,".into(), "  both of them.".into()],
        }];
        let mut out = Vec::new();
        render(Section::Params, &entries, 2, &mut out);
        assert_eq!(
            out,
            vec![
                "  :param x1: Coordinates, both of them.",
                "  :type x1: int",
                "  :param x2: Coordinates, both of them.",
                "  :type x2: int",
            ]
        );
    }

    #[test]
    fn test_render_returns_and_raises() {
        let mut out = Vec::new();
        render(
            Section::Returns,
            &[Entry {
                names: vec![],
                ty: Some("str".into()),
                text: vec!["The value.".into()],
            }],
            0,
            &mut out,
        );
        render(
            Section::Raises,
            &[Entry {
                names: vec![],
                ty: Some("ValueError".into()),
                text: vec![],
            }],
            0,
            &mut out,
        );
        assert_eq!(out, vec![":returns: The value.", ":rtype: str", ":raises ValueError:"]);
    }
}
