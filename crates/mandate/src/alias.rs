//! Option alias normalisation.
//!
//! Doc comments and overrides may spell aliases either bare (`m`, `min`) or
//! already dashed (`-m`, `--min`). clap only accepts canonical flags, so
//! every alias of an optional parameter goes through [`ensure_dashes`].

/// Gives each token the right number of leading dashes.
///
/// One-character tokens become short flags, longer tokens become long flags,
/// and already dashed tokens pass through untouched. Order and count are
/// preserved.
///
/// ```rust
/// use mandate::ensure_dashes;
///
/// assert_eq!(ensure_dashes(["m", "min"]), vec!["-m", "--min"]);
/// assert_eq!(ensure_dashes(["-m", "--min", "l"]), vec!["-m", "--min", "-l"]);
/// ```
pub fn ensure_dashes<I, S>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|token| {
            let token = token.as_ref();
            if token.starts_with('-') {
                token.to_string()
            } else if token.chars().count() > 1 {
                format!("--{}", token)
            } else {
                format!("-{}", token)
            }
        })
        .collect()
}

/// Turns an alias into the identifier convention of parameter names.
///
/// Leading dashes are stripped and inner dashes become underscores.
pub fn key_of(alias: &str) -> String {
    alias.trim_start_matches('-').replace('-', "_")
}

/// Picks the lookup key for an alias list: the longest alias, as a key.
///
/// Ties go to the first alias. Returns `None` for an empty list.
///
/// ```rust
/// use mandate::alias::canonical_key;
///
/// assert_eq!(canonical_key(["-s", "--spam"]).as_deref(), Some("spam"));
/// assert_eq!(canonical_key(["long-story"]).as_deref(), Some("long_story"));
/// ```
pub fn canonical_key<I, S>(aliases: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut best: Option<String> = None;
    for alias in aliases {
        let alias = alias.as_ref();
        let longer = best
            .as_ref()
            .map(|b| alias.chars().count() > b.chars().count())
            .unwrap_or(true);
        if longer {
            best = Some(alias.to_string());
        }
    }
    best.map(|b| key_of(&b))
}

/// A flag token split into the form clap takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flag {
    Short(char),
    Long(String),
}

/// Parses a dashed token into a [`Flag`].
///
/// Rejects what clap cannot express: a single dash followed by several
/// characters, bare dashes, more than two dashes, and whitespace or `=`.
pub fn parse_flag(token: &str) -> Result<Flag, String> {
    if token.chars().any(|c| c.is_whitespace() || c == '=') {
        return Err(format!("`{}` contains whitespace or `=`", token));
    }
    if let Some(long) = token.strip_prefix("--") {
        if long.is_empty() || long.starts_with('-') {
            return Err(format!("`{}` is not a valid long flag", token));
        }
        return Ok(Flag::Long(long.to_string()));
    }
    if let Some(short) = token.strip_prefix('-') {
        let mut chars = short.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Flag::Short(c)),
            (None, _) => Err("a bare `-` is not a flag".to_string()),
            (Some(_), Some(_)) => Err(format!(
                "`{}` is not a valid short flag (use `--{}`)",
                token, short
            )),
        };
    }
    Err(format!("`{}` is not a flag", token))
}
