//! The program: registration entry point and invocation router.
//!
//! ```rust
//! use mandate::{Function, Program, Signature, Value};
//!
//! let mut program = Program::new("example").version("1.0.10");
//! program
//!     .command(
//!         Function::new("power", |args: Vec<Value>| {
//!             let x: i64 = args[0].as_str().unwrap_or("0").parse()?;
//!             let y = args[1].as_int().unwrap_or(2);
//!             Ok::<_, anyhow::Error>(x.pow(y as u32))
//!         })
//!         .signature(Signature::new().positional("x").optional("y", 2)),
//!     )
//!     .unwrap();
//!
//! let done = program.try_execute(["power", "2", "-y", "4"]).unwrap();
//! assert_eq!(done.output, Value::Int(16));
//! assert_eq!(program.current_command().as_deref(), Some("power"));
//! ```

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use mandate_docstring::DocStyle;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use tracing::debug;

use crate::alias::canonical_key;
use crate::engine::{extract, extract_command_path};
use crate::error::{Error, SetupError};
use crate::function::Function;
use crate::handler::{CommandContext, SharedHandler};
use crate::overrides::ArgOptions;
use crate::registry::{CommandSpec, Node, Registry};
use crate::value::Value;

/// A parsed command line, ready to be called.
#[derive(Clone)]
pub struct Invocation {
    /// Identity of the selected function.
    pub command: String,
    /// Name the command was invoked as.
    pub name: String,
    /// Subcommand names from the root, the command's own name last.
    pub path: Vec<String>,
    /// Call arguments in signature order, variadic values flattened last.
    pub args: Vec<Value>,
    /// Group options collected along the path.
    pub options: BTreeMap<String, Value>,
    handler: SharedHandler,
}

impl Invocation {
    fn new(
        spec: &CommandSpec,
        matches: &ArgMatches,
        path: Vec<String>,
        options: BTreeMap<String, Value>,
    ) -> Self {
        let mut args = Vec::with_capacity(spec.parameters.len());
        for param in &spec.parameters {
            match extract(matches, param) {
                Value::List(items) if param.is_variadic() => args.extend(items),
                value => args.push(value),
            }
        }

        Self {
            command: spec.function.clone(),
            name: spec.name.clone(),
            path,
            args,
            options,
            handler: spec.handler.clone(),
        }
    }

    /// Context handed to the dispatch target.
    pub fn context(&self) -> CommandContext {
        CommandContext {
            command_path: self.path.clone(),
            command: self.command.clone(),
            options: self.options.clone(),
        }
    }

    /// Calls the dispatch target.
    ///
    /// Errors returned by the target come back unchanged.
    pub fn call(self) -> anyhow::Result<Value> {
        let ctx = self.context();
        let mut handler = self
            .handler
            .try_borrow_mut()
            .map_err(|_| anyhow::anyhow!("command `{}` is already running", self.name))?;
        handler.handle(self.args, &ctx)
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("command", &self.command)
            .field("name", &self.name)
            .field("path", &self.path)
            .field("args", &self.args)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Outcome of executing a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// Identity of the executed function.
    pub command: String,
    pub path: Vec<String>,
    /// What the dispatch target returned.
    pub output: Value,
}

/// A command-line program built from registered functions.
#[derive(Debug)]
pub struct Program {
    name: String,
    version: Option<String>,
    root: Registry,
    current: RefCell<Option<String>>,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            root: Registry::new(),
            current: RefCell::new(None),
        }
    }

    /// Adds `-v/--version`, printing `version`.
    ///
    /// Set it before adding program options: `-v`, `--version` and the
    /// `version` destination are refused from then on.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Program description shown in the top-level help.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.root.set_help(about);
        self
    }

    /// Doc dialect for functions that do not name their own.
    pub fn doc_style(mut self, style: DocStyle) -> Self {
        self.root.set_doc_style(style);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The root node of the command tree.
    pub fn registry(&self) -> &Registry {
        &self.root
    }

    /// Registers a top-level command.
    pub fn command(&mut self, function: Function) -> Result<&mut Self, SetupError> {
        self.root.command(function)?;
        Ok(self)
    }

    /// Creates a command group reached as `program <name> <command>`.
    pub fn group(&mut self, name: &str, help: &str) -> Result<&mut Registry, SetupError> {
        self.root.group(name, help)
    }

    /// An existing group.
    pub fn group_mut(&mut self, name: &str) -> Option<&mut Registry> {
        self.root.group_mut(name)
    }

    /// Adds a program-wide option, given before the command name.
    pub fn option<I, S>(&mut self, aliases: I, options: ArgOptions) -> Result<&mut Self, SetupError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();
        if self.version.is_some() {
            if let Some(flag) = aliases.iter().find(|a| *a == "-v" || *a == "--version") {
                return Err(SetupError::invalid_option(
                    flag,
                    "reserved for the version flag",
                ));
            }
            let dest = options.dest.clone().or_else(|| canonical_key(&aliases));
            if dest.as_deref() == Some("version") {
                return Err(SetupError::invalid_option(
                    &aliases.join(", "),
                    "destination `version` is reserved for the version flag",
                ));
            }
        }
        self.root.option(aliases, options)?;
        Ok(self)
    }

    /// Renders the whole command tree.
    pub fn to_command(&self) -> Command {
        let cmd = self.root.to_command(&self.name);
        match &self.version {
            Some(version) => cmd.version(version.clone()).disable_version_flag(true).arg(
                Arg::new("version")
                    .short('v')
                    .long("version")
                    .action(ArgAction::Version)
                    .help("Print version"),
            ),
            None => cmd,
        }
    }

    /// Parses a command line (without the program name).
    ///
    /// # Errors
    ///
    /// [`Error::Usage`] for anything clap rejects, including `--help` and
    /// `--version` requests and a missing command.
    pub fn try_parse<I, T>(&self, args: I) -> Result<Invocation, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut cmd = self.to_command();
        let argv = std::iter::once(OsString::from(&self.name))
            .chain(args.into_iter().map(Into::into));
        let matches = cmd.try_get_matches_from_mut(argv)?;

        let path = extract_command_path(&matches);
        let mut options = BTreeMap::new();
        let mut node = &self.root;
        let mut current = &matches;

        for (depth, name) in path.iter().enumerate() {
            for option in node.options() {
                options.insert(option.dest.clone(), extract(current, option));
            }
            let Some(sub) = current.subcommand_matches(name) else {
                break;
            };
            match node.child(name) {
                Some(Node::Group(child)) => {
                    node = child;
                    current = sub;
                }
                Some(Node::Command(spec)) => {
                    return Ok(Invocation::new(
                        spec,
                        sub,
                        path[..=depth].to_vec(),
                        options,
                    ));
                }
                None => break,
            }
        }

        Err(Error::Usage(
            cmd.error(ErrorKind::MissingSubcommand, "too few arguments"),
        ))
    }

    /// Like [`try_parse`](Self::try_parse), but exits the process on usage
    /// errors, help and version requests.
    pub fn parse<I, T>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.try_parse(args).unwrap_or_else(|err| err.exit())
    }

    /// Parses a command line and calls the selected command.
    ///
    /// Usage errors come back as [`Error::Usage`] inside the `anyhow::Error`;
    /// errors from the command itself are returned unchanged.
    pub fn try_execute<I, T>(&self, args: I) -> anyhow::Result<Execution>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let invocation = self.try_parse(args)?;
        self.dispatch(invocation)
    }

    /// Like [`try_execute`](Self::try_execute), but exits the process on
    /// usage errors, help and version requests.
    pub fn execute<I, T>(&self, args: I) -> anyhow::Result<Execution>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let invocation = self.parse(args);
        self.dispatch(invocation)
    }

    /// Executes the process arguments.
    pub fn run(&self) -> anyhow::Result<Execution> {
        self.execute(std::env::args_os().skip(1))
    }

    fn dispatch(&self, invocation: Invocation) -> anyhow::Result<Execution> {
        debug!(
            command = %invocation.command,
            path = ?invocation.path,
            args = invocation.args.len(),
            "dispatching"
        );
        *self.current.borrow_mut() = Some(invocation.command.clone());

        let command = invocation.command.clone();
        let path = invocation.path.clone();
        let output = invocation.call()?;
        Ok(Execution {
            command,
            path,
            output,
        })
    }

    /// Identity of the last executed function.
    pub fn current_command(&self) -> Option<String> {
        self.current.borrow().clone()
    }
}
