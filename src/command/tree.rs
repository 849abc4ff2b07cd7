//! Arena of command nodes

use super::{Command, Handler};
use crate::error::{CliError, CliResult};
use crate::flag::usage::{option_rows, render_table, Row};
use crate::flag::{ArgvBinder, FlagSet};
use crate::output::Color;
use crate::parser::ParserRegistry;
use std::collections::HashSet;
use tracing::debug;

/// Index of a node in its [`CommandTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(usize);

impl CommandId {
    /// Position in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// One command in the arena
pub struct CommandNode {
    name: String,
    desc: String,
    argv: Option<ArgvBinder>,
    handler: Option<Handler>,
    can_sub_route: bool,
    no_hook: bool,
    before: Option<Handler>,
    after: Option<Handler>,
    parent: Option<CommandId>,
    children: Vec<CommandId>,
}

impl CommandNode {
    /// Command name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description
    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// Binder of the argument record, if any
    pub fn argv(&self) -> Option<&ArgvBinder> {
        self.argv.as_ref()
    }

    /// Whether tokens route into children
    pub fn can_sub_route(&self) -> bool {
        self.can_sub_route
    }

    /// Whether hooks are skipped
    pub fn no_hook(&self) -> bool {
        self.no_hook
    }

    /// Whether a handler is set
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Parent node, `None` for the root
    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    /// Children in declaration order
    pub fn children(&self) -> &[CommandId] {
        &self.children
    }

    pub(crate) fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    pub(crate) fn before(&self) -> Option<&Handler> {
        self.before.as_ref()
    }

    pub(crate) fn after(&self) -> Option<&Handler> {
        self.after.as_ref()
    }
}

/// Command tree flattened into an arena
pub struct CommandTree {
    nodes: Vec<CommandNode>,
}

impl CommandTree {
    /// Flatten `root`, rejecting sibling commands with the same name
    pub fn new(root: Command) -> CliResult<Self> {
        let mut nodes = Vec::new();
        Self::push(&mut nodes, root, None)?;
        Ok(Self { nodes })
    }

    fn push(
        nodes: &mut Vec<CommandNode>,
        command: Command,
        parent: Option<CommandId>,
    ) -> CliResult<CommandId> {
        let Command {
            name,
            desc,
            argv,
            handler,
            can_sub_route,
            no_hook,
            before,
            after,
            children,
        } = command;

        let id = CommandId(nodes.len());
        nodes.push(CommandNode {
            name,
            desc,
            argv,
            handler,
            can_sub_route,
            no_hook,
            before,
            after,
            parent,
            children: Vec::new(),
        });

        let mut seen = HashSet::new();
        for child in children {
            if !seen.insert(child.name.clone()) {
                return Err(CliError::DuplicateCommand(child.name));
            }
            let child_id = Self::push(nodes, child, Some(id))?;
            nodes[id.0].children.push(child_id);
        }
        Ok(id)
    }

    /// The root node
    pub fn root(&self) -> CommandId {
        CommandId(0)
    }

    /// Node by id
    ///
    /// Ids are only handed out by this tree, so the lookup cannot miss.
    pub fn node(&self, id: CommandId) -> &CommandNode {
        &self.nodes[id.0]
    }

    /// Number of commands
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent of `id`
    pub fn parent(&self, id: CommandId) -> Option<CommandId> {
        self.node(id).parent
    }

    /// Children of `id`
    pub fn children(&self, id: CommandId) -> &[CommandId] {
        &self.node(id).children
    }

    /// Direct child of `id` named `name`
    pub fn find_child(&self, id: CommandId, name: &str) -> Option<CommandId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.node(*child).name == name)
    }

    /// Descend from `from` while the next token names a child of a node that
    /// allows sub-routing. Returns the deepest node reached and how many
    /// tokens were consumed.
    pub fn sub_route(&self, from: CommandId, tokens: &[String]) -> (CommandId, usize) {
        let mut current = from;
        let mut consumed = 0;
        for token in tokens {
            if !self.node(current).can_sub_route {
                break;
            }
            match self.find_child(current, token) {
                Some(child) => {
                    current = child;
                    consumed += 1;
                }
                None => break,
            }
        }
        debug!(target: "argbind::router", from = from.0, to = current.0, consumed, "sub-routed");
        (current, consumed)
    }

    /// Like [`sub_route`](Self::sub_route), but every token must resolve
    pub fn route(&self, from: CommandId, tokens: &[String]) -> Option<CommandId> {
        let (id, consumed) = self.sub_route(from, tokens);
        (consumed == tokens.len()).then_some(id)
    }

    /// `id` and its ancestors, root first
    pub fn ancestry(&self, id: CommandId) -> Vec<CommandId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Names from the root down to `id`; an empty root name is left out
    pub fn path(&self, id: CommandId) -> Vec<&str> {
        self.ancestry(id)
            .into_iter()
            .map(|node| self.node(node).name.as_str())
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Borrow `id` together with the tree and parser registry
    pub fn get<'a>(&'a self, registry: &'a ParserRegistry, id: CommandId) -> CommandRef<'a> {
        CommandRef {
            tree: self,
            registry,
            id,
        }
    }
}

impl std::fmt::Debug for CommandTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.nodes.iter().map(|node| &node.name))
            .finish()
    }
}

/// A node seen through its tree
#[derive(Clone, Copy)]
pub struct CommandRef<'a> {
    tree: &'a CommandTree,
    registry: &'a ParserRegistry,
    id: CommandId,
}

impl<'a> CommandRef<'a> {
    /// Arena id
    pub fn id(&self) -> CommandId {
        self.id
    }

    /// The node itself
    pub fn node(&self) -> &'a CommandNode {
        self.tree.node(self.id)
    }

    /// The tree the node lives in
    pub fn tree(&self) -> &'a CommandTree {
        self.tree
    }

    /// Command name
    pub fn name(&self) -> &'a str {
        self.node().name()
    }

    /// One-line description
    pub fn desc(&self) -> &'a str {
        self.node().desc()
    }

    fn at(&self, id: CommandId) -> CommandRef<'a> {
        self.tree.get(self.registry, id)
    }

    /// Parent command
    pub fn parent(&self) -> Option<CommandRef<'a>> {
        self.tree.parent(self.id).map(|id| self.at(id))
    }

    /// Child commands in declaration order
    pub fn children(&self) -> Vec<CommandRef<'a>> {
        self.tree
            .children(self.id)
            .iter()
            .map(|id| self.at(*id))
            .collect()
    }

    /// Root first, this command last
    pub fn ancestry(&self) -> Vec<CommandRef<'a>> {
        self.tree
            .ancestry(self.id)
            .into_iter()
            .map(|id| self.at(id))
            .collect()
    }

    /// Prefix routing from this command
    pub fn sub_route(&self, tokens: &[String]) -> (CommandRef<'a>, usize) {
        let (id, consumed) = self.tree.sub_route(self.id, tokens);
        (self.at(id), consumed)
    }

    /// Exact routing from this command
    pub fn route(&self, tokens: &[String]) -> Option<CommandRef<'a>> {
        self.tree.route(self.id, tokens).map(|id| self.at(id))
    }

    /// Names from the root down to this command
    pub fn path(&self) -> Vec<&'a str> {
        self.tree.path(self.id)
    }

    /// Compiled flags of the argument record, if the command has one
    pub fn flag_set(&self) -> CliResult<Option<FlagSet>> {
        self.node()
            .argv()
            .map(|binder| FlagSet::compile(&binder.fields(), self.registry))
            .transpose()
    }

    /// Help text: description, usage line, options and child commands
    pub fn usage(&self, color: &Color) -> CliResult<String> {
        let node = self.node();
        let flags = self.flag_set()?;
        let mut out = String::new();

        if !node.desc().is_empty() {
            out.push_str(node.desc());
            out.push_str("\n\n");
        }

        let mut line = color.bold("Usage:");
        let path = self.path().join(" ");
        if !path.is_empty() {
            line.push(' ');
            line.push_str(&path);
        }
        if flags.is_some() {
            line.push_str(" [options]");
        }
        if node.can_sub_route() && !node.children().is_empty() {
            line.push_str(" <command>");
        }
        out.push_str(&line);
        out.push('\n');

        if let Some(set) = flags {
            let rows = option_rows(&set, color);
            if !rows.is_empty() {
                out.push('\n');
                out.push_str(&color.bold("Options:"));
                out.push_str("\n\n");
                out.push_str(&render_table(&rows));
            }
        }

        let children = self.children();
        if !children.is_empty() {
            let rows: Vec<Row> = children
                .iter()
                .map(|child| Row::styled(child.name(), color.cyan(child.name()), child.desc()))
                .collect();
            out.push('\n');
            out.push_str(&color.bold("Commands:"));
            out.push_str("\n\n");
            out.push_str(&render_table(&rows));
        }

        Ok(out)
    }
}

impl std::fmt::Debug for CommandRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}
