//! Parameter documentation extraction.
//!
//! Doc text reaches this module in REST field-list form (other dialects are
//! normalised first by `mandate-docstring`). Each parameter is documented by
//! a directive such as:
//!
//! ```text
//! :param -s, --spam: Spam spam spam spam.
//! :param x <int>: Well, the base.
//! :param int maxdepth: Descend at most <levels>.
//! :param long-story: A long story believe me: when all started, Adam and
//!     Bob were just two little farmers.
//! :type a: int
//! ```
//!
//! The scan is line-anchored and greedy: a directive's text continues on the
//! following lines as long as they are indented deeper than the directive
//! itself, and stops at a blank line, another directive, or the end of input.
//! It is not a markup parser.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::alias::{canonical_key, key_of};
use crate::value::ValueType;

/// Directive markers that document a parameter.
const PARAM_MARKERS: &[&str] = &["param", "parameter", "arg", "argument", "key", "keyword"];

static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*):(?P<marker>[A-Za-z]+)(?:[ \t]+(?P<head>[^:]*?))?[ \t]*:(?:[ \t]+(?P<text>.*))?$")
        .expect("directive pattern is valid")
});

/// What a doc comment says about one parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocParam {
    /// Alias tokens as written (dashed or bare).
    pub aliases: Vec<String>,
    /// Type from an inline annotation, a leading type word or a `:type:` line.
    pub value_type: Option<ValueType>,
    /// Inline annotation that is not a known type name.
    pub metavar: Option<String>,
    /// Help text with whitespace collapsed to single spaces.
    pub help: String,
}

struct Directive<'a> {
    marker: &'a str,
    head: &'a str,
    text: String,
}

fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

/// Splits doc text into field directives with their continuation text.
fn directives(doc: &str) -> Vec<Directive<'_>> {
    let lines: Vec<&str> = doc.lines().collect();
    let mut found = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(caps) = DIRECTIVE_RE.captures(lines[i]) else {
            i += 1;
            continue;
        };
        let indent = caps.name("indent").map_or(0, |m| m.as_str().len());
        let mut text = caps
            .name("text")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        i += 1;
        while i < lines.len() {
            let line = lines[i];
            if line.trim().is_empty()
                || indent_of(line) <= indent
                || DIRECTIVE_RE.is_match(line)
            {
                break;
            }
            text.push(' ');
            text.push_str(line.trim());
            i += 1;
        }

        found.push(Directive {
            marker: caps.name("marker").map_or("", |m| m.as_str()),
            head: caps.name("head").map_or("", |m| m.as_str()),
            text,
        });
    }

    found
}

/// Parses a directive head into aliases, a type and a metavar.
///
/// Returns `None` when the head names no parameter at all.
fn parse_head(head: &str) -> Option<DocParam> {
    let mut param = DocParam::default();

    for part in head.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let mut words = Vec::new();
        let mut dashed = false;

        for token in part.split_whitespace() {
            if let Some(meta) = token.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
                annotate(&mut param, meta);
            } else if token.starts_with('-') {
                dashed = true;
                match token.split_once('=') {
                    Some((flag, meta)) => {
                        param.aliases.push(flag.to_string());
                        annotate(&mut param, meta.trim_matches(|c| c == '<' || c == '>'));
                    }
                    None => param.aliases.push(token.to_string()),
                }
            } else {
                words.push(token);
            }
        }

        if dashed {
            // `-d levels`: a bare word after a flag is its metavar
            for word in words {
                annotate(&mut param, word);
            }
        } else if let Some((name, type_words)) = words.split_last() {
            // `int base`: leading words are a type, the last one is the name
            if param.value_type.is_none() {
                param.value_type = ValueType::from_name(&type_words.join(" "));
            }
            param.aliases.push(name.to_string());
        }
    }

    if param.aliases.is_empty() {
        None
    } else {
        Some(param)
    }
}

fn annotate(param: &mut DocParam, meta: &str) {
    if meta.is_empty() {
        return;
    }
    match ValueType::from_name(meta) {
        Some(ty) if param.value_type.is_none() => param.value_type = Some(ty),
        Some(_) => {}
        None if param.metavar.is_none() => param.metavar = Some(meta.to_string()),
        None => {}
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts per-parameter documentation, keyed by parameter name.
///
/// The key is the longest alias with dashes stripped and inner dashes turned
/// into underscores, so `:param -n, --noun:` documents `noun` and
/// `:param a-param:` documents `a_param`. A parameter documented twice keeps
/// the later entry.
///
/// ```rust
/// use mandate::{find_param_docs, ValueType};
///
/// let docs = find_param_docs(":param -y <int>: You got it, the exponent.");
/// let y = &docs["y"];
/// assert_eq!(y.aliases, vec!["-y"]);
/// assert_eq!(y.value_type, Some(ValueType::Integer));
/// assert_eq!(y.help, "You got it, the exponent.");
/// ```
pub fn find_param_docs(doc: &str) -> HashMap<String, DocParam> {
    let mut params: HashMap<String, DocParam> = HashMap::new();
    let mut types: Vec<(String, Option<ValueType>)> = Vec::new();

    for directive in directives(doc) {
        if directive.marker == "type" {
            let key = key_of(directive.head.trim());
            let name = directive.text.trim().trim_matches('`').trim();
            types.push((key, ValueType::from_name(name)));
            continue;
        }
        if !PARAM_MARKERS.contains(&directive.marker) {
            continue;
        }
        let Some(mut param) = parse_head(directive.head) else {
            continue;
        };
        let Some(key) = canonical_key(&param.aliases) else {
            continue;
        };
        param.help = collapse(&directive.text);
        params.insert(key, param);
    }

    for (key, ty) in types {
        let Some(ty) = ty else { continue };
        if key.is_empty() {
            continue;
        }
        params
            .entry(key.clone())
            .or_insert_with(|| DocParam {
                aliases: vec![key],
                ..DocParam::default()
            })
            .value_type = Some(ty);
    }

    params
}

/// Removes field directives (`:param:`, `:type:`, `:returns:`, ...) and
/// their continuation lines, leaving the prose.
pub fn purify_doc(doc: &str) -> String {
    let mut kept = Vec::new();
    let mut skipping: Option<usize> = None;

    for line in doc.lines() {
        if let Some(indent) = skipping {
            if !line.trim().is_empty() && indent_of(line) > indent && !DIRECTIVE_RE.is_match(line) {
                continue;
            }
            skipping = None;
        }
        if DIRECTIVE_RE.is_match(line) {
            skipping = Some(indent_of(line));
            continue;
        }
        kept.push(line);
    }

    kept.join("\n").trim_end().to_string()
}

/// Splits doc prose into a one-paragraph help line and a description.
///
/// The first paragraph is the help; the rest is the description. A single
/// paragraph serves as both.
///
/// ```rust
/// use mandate::docs::split_doc;
///
/// assert_eq!(split_doc("help\n\n\ndesc\n"), ("help".to_string(), "desc".to_string()));
/// assert_eq!(split_doc("only help."), ("only help.".to_string(), "only help.".to_string()));
/// ```
pub fn split_doc(doc: &str) -> (String, String) {
    let doc = doc.trim();
    let lines: Vec<&str> = doc.lines().collect();

    match lines.iter().position(|l| l.trim().is_empty()) {
        Some(blank) => {
            let help = lines[..blank].join("\n").trim().to_string();
            let description = lines[blank + 1..].join("\n").trim().to_string();
            (help, description)
        }
        None => (doc.to_string(), doc.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(aliases: &[&str], help: &str) -> DocParam {
        DocParam {
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            help: help.to_string(),
            ..DocParam::default()
        }
    }

    #[test]
    fn test_no_params() {
        assert!(find_param_docs("").is_empty());
        assert!(find_param_docs("Brevity is the soul of wit.").is_empty());
    }

    #[test]
    fn test_single_directives() {
        let docs = find_param_docs(":param a-param: Short story.");
        assert_eq!(docs["a_param"], entry(&["a-param"], "Short story."));

        let docs = find_param_docs(":param a_param: Short story.");
        assert_eq!(docs["a_param"], entry(&["a_param"], "Short story."));

        let docs = find_param_docs(":param -j: Woow");
        assert_eq!(docs["j"], entry(&["-j"], "Woow"));

        let docs = find_param_docs(":param -n, --noun: cat");
        assert_eq!(docs["noun"], entry(&["-n", "--noun"], "cat"));
    }

    #[test]
    fn test_params_after_prose() {
        let doc = "
            Some short text here and there.

            :param well: water";
        let docs = find_param_docs(doc);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs["well"], entry(&["well"], "water"));
    }

    #[test]
    fn test_many_params() {
        let doc = "
            :param a-param: Short story.
            :param -j: Woow
            :param -n, --noun: cat";
        let docs = find_param_docs(doc);
        let mut keys: Vec<&str> = docs.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["a_param", "j", "noun"]);
    }

    #[test]
    fn test_continuation_lines_collapse() {
        let doc = "
            Lemme see.

            :param long-story: A long story believe me: when all started, Adam and
                Bob were just two little farmers.
            ";
        let docs = find_param_docs(doc);
        assert_eq!(
            docs["long_story"].help,
            "A long story believe me: when all started, Adam and Bob were just two little farmers."
        );
    }

    #[test]
    fn test_continuation_stops_at_same_indent() {
        let doc = ":param a: first\nnot part of it\n:param b: second";
        let docs = find_param_docs(doc);
        assert_eq!(docs["a"].help, "first");
        assert_eq!(docs["b"].help, "second");
    }

    #[test]
    fn test_inline_type_annotations() {
        let docs = find_param_docs(":param x <int>: Well, the base.");
        assert_eq!(docs["x"].aliases, vec!["x"]);
        assert_eq!(docs["x"].value_type, Some(ValueType::Integer));
        assert_eq!(docs["x"].metavar, None);

        let docs = find_param_docs(":param int base : The base.");
        assert_eq!(docs["base"].aliases, vec!["base"]);
        assert_eq!(docs["base"].value_type, Some(ValueType::Integer));
        assert_eq!(docs["base"].help, "The base.");

        let docs = find_param_docs(":param float a: The base.");
        assert_eq!(docs["a"].value_type, Some(ValueType::Float));
    }

    #[test]
    fn test_unknown_annotation_is_metavar() {
        let docs = find_param_docs(":param -y <metavar>: This too!!");
        assert_eq!(docs["y"].value_type, None);
        assert_eq!(docs["y"].metavar.as_deref(), Some("metavar"));

        let docs = find_param_docs(":param --depth=LEVELS: How deep.");
        assert_eq!(docs["depth"].aliases, vec!["--depth"]);
        assert_eq!(docs["depth"].metavar.as_deref(), Some("LEVELS"));
    }

    #[test]
    fn test_unknown_type_word_is_ignored() {
        let docs = find_param_docs(":param Path root: Where to start.");
        assert_eq!(docs["root"].value_type, None);
        assert_eq!(docs["root"].metavar, None);
    }

    #[test]
    fn test_type_directive() {
        let doc = "
            :param a: The first number
            :type a: int

            :param b: The second number
            :type b: ```int or float```
            ";
        let docs = find_param_docs(doc);
        assert_eq!(docs["a"].value_type, Some(ValueType::Integer));
        assert_eq!(docs["a"].help, "The first number");
        assert_eq!(docs["b"].value_type, None);
    }

    #[test]
    fn test_later_directive_wins() {
        let doc = ":param -a: first\n:param --a: second";
        let docs = find_param_docs(doc);
        assert_eq!(docs["a"], entry(&["--a"], "second"));
    }

    #[test]
    fn test_other_fields_are_skipped() {
        let docs = find_param_docs(":returns: something\n:rtype: int");
        assert!(docs.is_empty());
    }

    #[test]
    fn test_purify_doc() {
        let doc = "Compute base ^ exp.\n\n:param int base : The base.\n    more base\n:param int exp : The exponent.\n:returns: the power";
        assert_eq!(purify_doc(doc), "Compute base ^ exp.");
    }

    #[test]
    fn test_purify_keeps_prose_between_fields() {
        let doc = "Summary.\n\nDetails here.\n\n:param a: A.\n\nTrailing note.";
        assert_eq!(purify_doc(doc), "Summary.\n\nDetails here.\n\n\nTrailing note.");
    }

    #[test]
    fn test_split_doc() {
        assert_eq!(split_doc(""), (String::new(), String::new()));
        assert_eq!(
            split_doc("help.\nstill help."),
            ("help.\nstill help.".to_string(), "help.\nstill help.".to_string())
        );
        assert_eq!(split_doc("help\n\ndesc"), ("help".to_string(), "desc".to_string()));
    }
}
