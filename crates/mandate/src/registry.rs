//! Command registry.
//!
//! A [`Registry`] is one node of the command tree: it owns its commands, its
//! child groups and the options that apply at its level. The program owns
//! the root node; `program group command ...` reaches a command inside a
//! group. Children are owned by value, so a node's identity is its path from
//! the root.
//!
//! All configuration mistakes (name collisions, inexpressible flags, broken
//! signatures) are reported by the registration call itself.

use clap::Command;
use mandate_docstring::{normalize, DocStyle};
use std::fmt;
use tracing::debug;

use crate::alias::canonical_key;
use crate::docs::{find_param_docs, purify_doc, split_doc};
use crate::engine::to_arg;
use crate::error::SetupError;
use crate::function::Function;
use crate::handler::SharedHandler;
use crate::overrides::ArgOptions;
use crate::resolve::{check_dest, flagged, resolve, ParameterDescriptor};

/// A registered command.
///
/// Immutable once built; the overrides it was built from are not kept.
#[derive(Clone)]
pub struct CommandSpec {
    /// Name on the command line.
    pub name: String,
    /// Identity of the function behind it.
    pub function: String,
    /// One descriptor per parameter, in signature order.
    pub parameters: Vec<ParameterDescriptor>,
    /// First paragraph of the doc prose.
    pub help: String,
    /// Rest of the doc prose, or the help again for one-paragraph docs.
    pub description: String,
    pub(crate) handler: SharedHandler,
}

impl CommandSpec {
    /// Resolves a function into a command.
    ///
    /// `default_style` is the doc dialect used when the function does not
    /// name its own.
    pub fn build(function: Function, default_style: DocStyle) -> Result<Self, SetupError> {
        let name = function.command_name().to_string();
        if name.is_empty() || name.starts_with('-') {
            return Err(SetupError::InvalidSignature {
                function: function.identity().to_string(),
                reason: format!("`{}` is not a usable command name", name),
            });
        }

        let style = function.style().unwrap_or(default_style);
        let doc = normalize(function.doc_text(), style);
        let (help, description) = split_doc(&purify_doc(&doc));
        let docs = find_param_docs(&doc);
        let parameters = resolve(
            function.identity(),
            function.params(),
            &docs,
            function.overrides(),
        )?;

        let (identity, handler) = function.into_parts();
        Ok(Self {
            name,
            function: identity,
            parameters,
            help,
            description,
            handler,
        })
    }

    /// Renders this command as a clap subcommand.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(self.name.clone());
        if !self.help.is_empty() {
            cmd = cmd.about(self.help.clone());
        }
        if !self.description.is_empty() {
            cmd = cmd.long_about(self.description.clone());
        }
        self.parameters
            .iter()
            .fold(cmd, |cmd, param| cmd.arg(to_arg(param)))
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("function", &self.function)
            .field("parameters", &self.parameters)
            .field("help", &self.help)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Command(CommandSpec),
    Group(String, Registry),
}

impl Entry {
    fn name(&self) -> &str {
        match self {
            Entry::Command(spec) => &spec.name,
            Entry::Group(name, _) => name,
        }
    }
}

/// What a path resolves to.
#[derive(Debug)]
pub enum Node<'a> {
    Command(&'a CommandSpec),
    Group(&'a Registry),
}

/// One node of the command tree.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    help: String,
    doc_style: DocStyle,
    entries: Vec<Entry>,
    options: Vec<ParameterDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the doc dialect used by functions registered from now on
    /// (including inside groups created later).
    pub fn set_doc_style(&mut self, style: DocStyle) {
        self.doc_style = style;
    }

    pub fn doc_style(&self) -> DocStyle {
        self.doc_style
    }

    pub fn set_help(&mut self, help: impl Into<String>) {
        self.help = help.into();
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    fn ensure_free(&self, name: &str) -> Result<(), SetupError> {
        if self.entries.iter().any(|e| e.name() == name) {
            return Err(SetupError::DuplicateCommand(name.to_string()));
        }
        Ok(())
    }

    /// Registers a function as a command of this node.
    ///
    /// # Errors
    ///
    /// [`SetupError::DuplicateCommand`] when the name is taken by a command
    /// or group of this node, or any resolution error.
    pub fn command(&mut self, function: Function) -> Result<&mut Self, SetupError> {
        let spec = CommandSpec::build(function, self.doc_style)?;
        self.ensure_free(&spec.name)?;
        debug!(
            command = %spec.name,
            function = %spec.function,
            params = spec.parameters.len(),
            "registered command"
        );
        self.entries.push(Entry::Command(spec));
        Ok(self)
    }

    /// Creates a child group and returns it.
    ///
    /// An empty `help` becomes `"<name> subcommand"`.
    pub fn group(&mut self, name: &str, help: &str) -> Result<&mut Registry, SetupError> {
        if name.is_empty() || name.starts_with('-') {
            return Err(SetupError::invalid_option(name, "not a usable group name"));
        }
        self.ensure_free(name)?;

        let child = Registry {
            help: if help.is_empty() {
                format!("{} subcommand", name)
            } else {
                help.to_string()
            },
            doc_style: self.doc_style,
            ..Registry::default()
        };
        debug!(group = name, "registered group");
        self.entries.push(Entry::Group(name.to_string(), child));

        self.group_mut(name)
            .ok_or_else(|| SetupError::DuplicateCommand(name.to_string()))
    }

    /// A child group, for registering more commands into it later.
    pub fn group_mut(&mut self, name: &str) -> Option<&mut Registry> {
        self.entries.iter_mut().find_map(|e| match e {
            Entry::Group(n, child) if n == name => Some(child),
            _ => None,
        })
    }

    /// Adds an option that applies at this node, given before the name of
    /// the subcommand.
    ///
    /// Only dashed aliases are accepted. The value is stored under
    /// `options.dest`, or the canonical key of the aliases.
    ///
    /// ```rust
    /// use mandate::{ArgOptions, Registry};
    ///
    /// let mut root = Registry::new();
    /// root.option(["-f", "--foo"], ArgOptions::new().default("bar")).unwrap();
    /// assert!(root.option(["foo"], ArgOptions::new()).is_err());
    /// assert!(root.option(["--foo"], ArgOptions::new()).is_err());
    /// ```
    pub fn option<I, S>(&mut self, aliases: I, options: ArgOptions) -> Result<&mut Self, SetupError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();
        let label = aliases.join(", ");
        if aliases.is_empty() || aliases.iter().any(|a| !a.starts_with('-')) {
            return Err(SetupError::invalid_option(
                &label,
                "positional arguments not supported here",
            ));
        }

        let dest = match options.dest.clone().or_else(|| canonical_key(&aliases)) {
            Some(dest) if !dest.is_empty() => dest,
            _ => return Err(SetupError::invalid_option(&label, "no usable destination")),
        };
        check_dest(&label, &dest)?;
        if self.options.iter().any(|o| o.dest == dest) {
            return Err(SetupError::DuplicateOption(dest));
        }

        let descriptor = flagged(&dest, &aliases, options, None)?;
        if let Some(flag) = descriptor
            .aliases
            .iter()
            .find(|f| self.options.iter().any(|o| o.aliases.contains(f)))
        {
            return Err(SetupError::invalid_option(
                &dest,
                format!("flag `{}` is already taken", flag),
            ));
        }

        debug!(dest = %descriptor.dest, aliases = ?descriptor.aliases, "registered option");
        self.options.push(descriptor);
        Ok(self)
    }

    /// Options of this node, in registration order.
    pub fn options(&self) -> &[ParameterDescriptor] {
        &self.options
    }

    /// Commands of this node, in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Command(spec) => Some(spec),
            Entry::Group(..) => None,
        })
    }

    /// Child groups of this node, in registration order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &Registry)> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Group(name, child) => Some((name.as_str(), child)),
            Entry::Command(_) => None,
        })
    }

    /// Looks up the direct child called `name`.
    pub fn child(&self, name: &str) -> Option<Node<'_>> {
        self.entries.iter().find(|e| e.name() == name).map(|e| match e {
            Entry::Command(spec) => Node::Command(spec),
            Entry::Group(_, child) => Node::Group(child),
        })
    }

    /// Looks up a command by its path of names from this node.
    ///
    /// ```rust
    /// use mandate::{Function, Registry, Value};
    ///
    /// let mut root = Registry::new();
    /// root.group("sub", "")
    ///     .unwrap()
    ///     .command(Function::new("pow_of_sub", |_: Vec<Value>| Ok::<_, anyhow::Error>(())).named("powOfSub"))
    ///     .unwrap();
    ///
    /// assert_eq!(root.find(&["sub", "powOfSub"]).unwrap().function, "pow_of_sub");
    /// assert!(root.find(&["powOfSub"]).is_none());
    /// ```
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&CommandSpec> {
        let (last, groups) = path.split_last()?;
        let mut node = self;
        for name in groups {
            match node.child(name.as_ref())? {
                Node::Group(child) => node = child,
                Node::Command(_) => return None,
            }
        }
        match node.child(last.as_ref())? {
            Node::Command(spec) => Some(spec),
            Node::Group(_) => None,
        }
    }

    /// Renders this node and everything below it as a clap command.
    pub fn to_command(&self, name: &str) -> Command {
        let mut cmd = Command::new(name.to_string())
            .disable_help_subcommand(true)
            .subcommand_required(true);
        if !self.help.is_empty() {
            cmd = cmd.about(self.help.clone());
        }
        for option in &self.options {
            cmd = cmd.arg(to_arg(option));
        }
        for entry in &self.entries {
            cmd = cmd.subcommand(match entry {
                Entry::Command(spec) => spec.to_command(),
                Entry::Group(name, child) => child.to_command(name),
            });
        }
        cmd
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
