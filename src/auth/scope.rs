//! Granted scope modeling for token responses.

// std
use std::{collections::BTreeSet, slice::Iter};
// crates.io
use serde::{Deserializer, Serializer};
// self
use crate::_prelude::*;

/// Scope that exempts an account from BCE request signing.
pub const BRAIN_ALL_SCOPE: &str = "brain_all_scope";

/// Normalized set of scopes granted by the token endpoint.
///
/// The endpoint returns a single space-delimited string; entries are deduplicated and sorted so
/// equality and lookups do not depend on the order the provider used. Serialization round-trips
/// through the same space-delimited form.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct GrantedScopes {
	scopes: Arc<[String]>,
}
impl GrantedScopes {
	/// Creates a normalized scope set from any iterator, skipping blank entries.
	pub fn new<I, S>(scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { scopes: normalize(scopes) }
	}

	/// Parses the space-delimited representation returned by the token endpoint.
	pub fn parse(raw: &str) -> Self {
		Self::new(raw.split_whitespace())
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.scopes.len()
	}

	/// Returns true if no scopes were granted.
	pub fn is_empty(&self) -> bool {
		self.scopes.is_empty()
	}

	/// Returns true if the set contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.scopes.binary_search_by(|candidate| candidate.as_str().cmp(scope)).is_ok()
	}

	/// Returns true if the account may call the API with a plain access token.
	pub fn grants_brain_all(&self) -> bool {
		self.contains(BRAIN_ALL_SCOPE)
	}

	/// Iterator over normalized scopes.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.scopes.iter().map(|s| s.as_str())
	}

	/// Returns the normalized string representation (space-delimited).
	pub fn normalized(&self) -> String {
		self.scopes.join(" ")
	}
}
impl Debug for GrantedScopes {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("GrantedScopes").field(&self.scopes).finish()
	}
}
impl Display for GrantedScopes {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.normalized())
	}
}
impl FromStr for GrantedScopes {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::parse(s))
	}
}

/// Iterator over scope strings.
pub struct GrantedScopesIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for GrantedScopesIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
impl<'a> IntoIterator for &'a GrantedScopes {
	type IntoIter = GrantedScopesIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		GrantedScopesIter { inner: self.scopes.iter() }
	}
}
impl Serialize for GrantedScopes {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.normalized())
	}
}
impl<'de> Deserialize<'de> for GrantedScopes {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = <String>::deserialize(deserializer)?;

		Ok(Self::parse(&raw))
	}
}

fn normalize<I, S>(scopes: I) -> Arc<[String]>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let set = scopes
		.into_iter()
		.map(Into::into)
		.filter(|scope: &String| !scope.trim().is_empty())
		.collect::<BTreeSet<_>>();

	Arc::from(set.into_iter().collect::<Vec<_>>())
}
