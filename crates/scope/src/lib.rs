//! Scope resolution engine.
//!
//! A [`Scope`] is a named configuration [`Namespace`] plus a catalog of
//! [`View`]s and a queue of assignments fed from the command line. Calling
//! [`Scope::apply`] resolves the final namespace:
//!
//! 1. start from the scope's defaults;
//! 2. run activated and default views in priority order, each chained view
//!    right after its predecessors;
//! 3. merge direct `key=value` overrides, except on paths a chained view wrote;
//! 4. flush deferred [`LazyBlock`]s against the result.
//!
//! [`Scope::entry`] wraps a function so it receives the resolved namespace as
//! the parameter named after the scope. [`MultiScope`] splits one command
//! stream across several scopes by `<scope>.` prefix. [`Scope::trace`] and
//! [`Scope::runtime_trace`] fingerprint an entry point's source.
//!
//! ```ignore
//! let registry = Registry::new();
//! let scope = registry.create_scope("config", defaults)?;
//! scope.observe(View::new("fast", |cfg| cfg.set("lr", 0.5)).with_priority(10))?;
//! registry.parse_args(std::env::args())?;
//!
//! let main = scope.entry(Signature::new().param("config"), |args| {
//!     args.namespace("config").and_then(|cfg| cfg.get("lr")).cloned()
//! });
//! let lr = main.invoke()?;
//! ```

mod assign;
mod entry;
pub mod error;
pub mod lazy;
mod multi;
mod registry;
mod resolve;
mod route;
mod scope;
mod traced;
mod view;

pub use assign::Assignment;
pub use entry::{Args, Call, Entry, EntryPoint, Signature};
pub use error::{EvalError, Result, ScopeError};
pub use lazy::{Expr, LazyBlock, LazyCache, field, lit};
pub use multi::{MultiEntry, MultiScope};
pub use registry::Registry;
pub use resolve::AssignedViews;
pub use scope::{PauseGuard, Scope};
pub use traced::{RuntimeTraced, Traced};
pub use view::{View, ViewBody, ViewContext};
pub use vista_trace::{Fingerprint, TraceLog};
pub use vista_value::{Namespace, Value};
