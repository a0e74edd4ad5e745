//! Routing of command tokens to one of several scopes.
//!
//! 1. A `<scope>.` prefix on the key selects that scope; the prefix is stripped.
//! 2. A bare view name registered in exactly one scope goes to that scope.
//! 3. With a single scope, everything goes to it.
//!
//! Anything else is [`ScopeError::AmbiguousToken`].

use indexmap::IndexMap;

use crate::assign::Assignment;
use crate::scope::Scope;
use crate::{Result, ScopeError};

/// Picks the scope for `token` and returns it with the token to queue there.
pub(crate) fn route<'a>(scopes: &'a IndexMap<String, Scope>, token: &str) -> Result<(&'a Scope, String)> {
	let key = token.split_once('=').map_or(token, |(key, _)| key);

	if let Some((prefix, _)) = key.split_once('.')
		&& let Some(scope) = scopes.get(prefix)
	{
		let rest = &token[prefix.len() + 1..];
		tracing::debug!(domain = "multiscope", scope = prefix, token = rest, "routed by prefix");
		return Ok((scope, rest.to_string()));
	}

	if !token.contains('=') {
		let mut owners = scopes.values().filter(|scope| scope.has_view(key));
		if let (Some(owner), None) = (owners.next(), owners.next()) {
			tracing::debug!(domain = "multiscope", scope = owner.name(), token, "routed by view name");
			return Ok((owner, token.to_string()));
		}
	}

	match scopes.values().next() {
		Some(only) if scopes.len() == 1 => Ok((only, token.to_string())),
		_ => Err(ScopeError::AmbiguousToken(token.to_string())),
	}
}

/// Tokenizes `text` and queues each token in the scope it routes to.
///
/// Every token is routed and parsed before anything is queued, so a failing
/// command leaves all queues untouched.
pub(crate) fn ingest(scopes: &IndexMap<String, Scope>, text: &str) -> Result<()> {
	let mut routed = Vec::new();
	for token in vista_lexer::split_command(text)? {
		let (scope, rest) = route(scopes, &token)?;
		routed.push((scope, Assignment::parse(&rest)?));
	}
	for (scope, assignment) in routed {
		scope.push(assignment);
	}
	Ok(())
}

/// Joins `argv` minus the program name with single spaces and ingests the result.
pub(crate) fn ingest_args<I, S>(scopes: &IndexMap<String, Scope>, argv: I) -> Result<()>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let args: Vec<S> = argv.into_iter().skip(1).collect();
	let text = args.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(" ");
	ingest(scopes, &text)
}
