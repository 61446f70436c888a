//! Execution context: a tree of scope frames over one shared session.
//!
//! Each frame owns `local` and `function` variable maps and may point at a
//! parent frame. The frame with no parent is the root; it additionally owns
//! the `component` map, the function table, import aliases and slot content.
//! Parents never reference children, so the chain is a plain tree and the
//! root is found by walking upward.
//!
//! The session map is created once per root (or supplied by the caller) and
//! shared by handle with every frame below it.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use weft_ir::{FunctionNode, Node, VarScope};

use crate::errors::{undefined_variable, EvalResult};
use crate::shared::SharedState;
use crate::Value;

/// A variable map.
pub type Vars = FxHashMap<String, Value>;

/// Session variables, shared by every frame of a root and across component
/// calls made from it.
pub type Session = SharedState<Vars>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("unknown variable scope `{0}`")]
    UnknownScope(String),
}

impl From<weft_ir::UnknownScope> for ContextError {
    fn from(err: weft_ir::UnknownScope) -> Self {
        ContextError::UnknownScope(err.0)
    }
}

/// What an import alias refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportBinding {
    pub component: String,
    pub from: Option<String>,
}

/// Content a caller passed to a component, with the caller's frame so the
/// content evaluates against the caller's variables.
#[derive(Clone)]
pub struct SlotFill {
    pub nodes: Rc<Vec<Node>>,
    pub scope: ExecutionContext,
}

impl fmt::Debug for SlotFill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotFill")
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

/// Single-threaded shared frame handle.
///
/// Wraps `Rc<RefCell<T>>` so frame allocation goes through one constructor.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Default)]
struct Frame {
    local: Vars,
    function: Vars,
    /// Only consulted on the root frame.
    component: Vars,
    parent: Option<ExecutionContext>,
    // Root-only tables.
    functions: FxHashMap<String, Rc<FunctionNode>>,
    imports: FxHashMap<String, ImportBinding>,
    slots: FxHashMap<String, SlotFill>,
}

impl Frame {
    /// The frame-owned map: `function` when asked for, else `local`.
    fn vars(&self, function: bool) -> &Vars {
        if function {
            &self.function
        } else {
            &self.local
        }
    }

    fn vars_mut(&mut self, function: bool) -> &mut Vars {
        if function {
            &mut self.function
        } else {
            &mut self.local
        }
    }
}

/// One scope frame plus the session it belongs to.
///
/// Cloning is cheap and yields another handle to the same frame.
#[derive(Clone)]
pub struct ExecutionContext {
    frame: LocalScope<Frame>,
    session: Session,
}

impl ExecutionContext {
    /// A root frame with a fresh session.
    pub fn root() -> Self {
        Self::with_session(Session::default())
    }

    /// A root frame attached to an existing session.
    pub fn with_session(session: Session) -> Self {
        ExecutionContext {
            frame: LocalScope::new(Frame::default()),
            session,
        }
    }

    /// A child frame of this one.
    pub fn child(&self) -> Self {
        ExecutionContext {
            frame: LocalScope::new(Frame {
                parent: Some(self.clone()),
                ..Frame::default()
            }),
            session: self.session.clone(),
        }
    }

    /// A new, unrelated root sharing this context's session.
    pub fn new_root(&self) -> Self {
        Self::with_session(self.session.clone())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn parent(&self) -> Option<ExecutionContext> {
        self.frame.borrow().parent.clone()
    }

    pub fn is_root(&self) -> bool {
        self.frame.borrow().parent.is_none()
    }

    /// Number of frames from here to the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.parent();
        while let Some(ctx) = current {
            depth += 1;
            current = ctx.parent();
        }
        depth
    }

    /// The root frame of this chain.
    pub fn root_frame(&self) -> ExecutionContext {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    pub fn same_frame(&self, other: &ExecutionContext) -> bool {
        self.frame.ptr_eq(&other.frame)
    }

    /// Look a name up. Per frame, innermost first: `local`, `function`, the
    /// root's `component`, the session, then the parent frame.
    pub fn get(&self, name: &str) -> Option<Value> {
        {
            let frame = self.frame.borrow();
            if let Some(v) = frame.local.get(name).or_else(|| frame.function.get(name)) {
                return Some(v.clone());
            }
        }
        // Component and session maps are the same for every frame in the
        // chain, so checking them once here gives the same order.
        if let Some(v) = self.root_frame().frame.borrow().component.get(name) {
            return Some(v.clone());
        }
        if let Some(v) = self.session.read().get(name) {
            return Some(v.clone());
        }
        let mut current = self.parent();
        while let Some(ctx) = current {
            let frame = ctx.frame.borrow();
            if let Some(v) = frame.local.get(name).or_else(|| frame.function.get(name)) {
                return Some(v.clone());
            }
            current = frame.parent.clone();
        }
        None
    }

    /// `get`, failing with an undefined-variable error naming `name`.
    pub fn lookup(&self, name: &str) -> EvalResult<Value> {
        self.get(name).ok_or_else(|| undefined_variable(name))
    }

    /// Read one scope only.
    pub fn get_in(&self, scope: VarScope, name: &str) -> Option<Value> {
        match scope {
            VarScope::Local | VarScope::Function => {
                self.frame.borrow().vars(scope == VarScope::Function).get(name).cloned()
            }
            VarScope::Component => self.root_frame().frame.borrow().component.get(name).cloned(),
            VarScope::Session => self.session.read().get(name).cloned(),
        }
    }

    /// The binding `assign` would update: for `local` and `function` the
    /// nearest frame holding `name`, otherwise the shared map.
    pub fn get_nearest(&self, scope: VarScope, name: &str) -> Option<Value> {
        if !matches!(scope, VarScope::Local | VarScope::Function) {
            return self.get_in(scope, name);
        }
        let mut current = Some(self.clone());
        while let Some(ctx) = current {
            let frame = ctx.frame.borrow();
            if let Some(v) = frame.vars(scope == VarScope::Function).get(name) {
                return Some(v.clone());
            }
            current = frame.parent.clone();
        }
        None
    }

    /// Write into `scope`. `local` and `function` target this frame.
    pub fn set(&self, scope: VarScope, name: impl Into<String>, value: Value) {
        let name = name.into();
        match scope {
            VarScope::Local | VarScope::Function => {
                self.frame
                    .borrow_mut()
                    .vars_mut(scope == VarScope::Function)
                    .insert(name, value);
            }
            VarScope::Component => {
                self.root_frame()
                    .frame
                    .borrow_mut()
                    .component
                    .insert(name, value);
            }
            VarScope::Session => {
                self.session.write().insert(name, value);
            }
        }
    }

    /// `set` with the scope given by name.
    pub fn set_named(
        &self,
        scope: &str,
        name: impl Into<String>,
        value: Value,
    ) -> Result<(), ContextError> {
        let scope: VarScope = scope.parse()?;
        self.set(scope, name, value);
        Ok(())
    }

    /// Update an existing binding, or create one in this frame.
    ///
    /// For `local` and `function`, the nearest frame already holding `name`
    /// in that scope is updated, so a loop body can accumulate into a
    /// variable declared outside it. Other scopes behave like `set`.
    pub fn assign(&self, scope: VarScope, name: impl Into<String>, value: Value) {
        let name = name.into();
        if matches!(scope, VarScope::Local | VarScope::Function) {
            let mut current = Some(self.clone());
            while let Some(ctx) = current {
                let mut frame = ctx.frame.borrow_mut();
                if let Some(slot) = frame.vars_mut(scope == VarScope::Function).get_mut(&name) {
                    *slot = value;
                    return;
                }
                current = frame.parent.clone();
            }
        }
        self.set(scope, name, value);
    }

    /// Remove `name` from `scope`, returning the old value if it was there.
    pub fn delete(&self, scope: VarScope, name: &str) -> Option<Value> {
        match scope {
            VarScope::Local | VarScope::Function => {
                self.frame
                    .borrow_mut()
                    .vars_mut(scope == VarScope::Function)
                    .remove(name)
            }
            VarScope::Component => self
                .root_frame()
                .frame
                .borrow_mut()
                .component
                .remove(name),
            VarScope::Session => self.session.write().remove(name),
        }
    }

    /// Every visible variable, later layers overriding earlier ones:
    /// ancestors (most distant first), session, component, function, local.
    pub fn flatten(&self) -> Vars {
        let mut ancestors = Vec::new();
        let mut current = self.parent();
        while let Some(ctx) = current {
            current = ctx.parent();
            ancestors.push(ctx);
        }

        let mut vars = Vars::default();
        for ctx in ancestors.iter().rev() {
            let frame = ctx.frame.borrow();
            extend(&mut vars, &frame.function);
            extend(&mut vars, &frame.local);
        }
        extend(&mut vars, &self.session.read());
        extend(&mut vars, &self.root_frame().frame.borrow().component);
        let frame = self.frame.borrow();
        extend(&mut vars, &frame.function);
        extend(&mut vars, &frame.local);
        vars
    }

    // Root-frame tables

    pub fn define_function(&self, function: FunctionNode) {
        let root = self.root_frame();
        let mut frame = root.frame.borrow_mut();
        frame
            .functions
            .insert(function.name.clone(), Rc::new(function));
    }

    pub fn function(&self, name: &str) -> Option<Rc<FunctionNode>> {
        self.root_frame().frame.borrow().functions.get(name).cloned()
    }

    pub fn define_import(&self, alias: impl Into<String>, binding: ImportBinding) {
        let root = self.root_frame();
        root.frame.borrow_mut().imports.insert(alias.into(), binding);
    }

    pub fn import(&self, alias: &str) -> Option<ImportBinding> {
        self.root_frame().frame.borrow().imports.get(alias).cloned()
    }

    /// Attach slot content to this chain's root. The default slot is `""`.
    pub fn set_slot(&self, name: impl Into<String>, fill: SlotFill) {
        let root = self.root_frame();
        root.frame.borrow_mut().slots.insert(name.into(), fill);
    }

    pub fn slot(&self, name: &str) -> Option<SlotFill> {
        self.root_frame().frame.borrow().slots.get(name).cloned()
    }
}

fn extend(into: &mut Vars, from: &Vars) {
    into.extend(from.iter().map(|(k, v)| (k.clone(), v.clone())));
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.frame.borrow();
        f.debug_struct("ExecutionContext")
            .field("depth", &self.depth())
            .field("local", &frame.local)
            .field("function", &frame.function)
            .finish_non_exhaustive()
    }
}
