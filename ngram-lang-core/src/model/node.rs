use std::collections::BTreeMap;

use rand::Rng;

/// A single node of the n-gram trie.
///
/// A node is reached by following a path of characters from the root;
/// that path is the n-gram the node stands for. `count` records how many
/// times the path was traversed during insertion.
///
/// ## Invariants
/// - The structure is a strict tree: every node is owned by exactly one parent
/// - The children of a node together count no more than the node itself
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Node {
	/// Number of insertions whose path went through this node.
	count: u64,
	/// Continuations of this n-gram, keyed by the next character.
	/// Ordered so that traversal (and seeded sampling) is reproducible.
	children: BTreeMap<char, Node>,
}

impl Node {
	pub(crate) fn with_count(count: u64) -> Self {
		Self { count, children: BTreeMap::new() }
	}

	pub(crate) fn count(&self) -> u64 {
		self.count
	}

	pub(crate) fn set_count(&mut self, count: u64) {
		self.count = count;
	}

	pub(crate) fn has_children(&self) -> bool {
		!self.children.is_empty()
	}

	/// Increments this node and every node along `path` by `count`,
	/// creating missing nodes on the way.
	pub(crate) fn add_path(&mut self, path: &[char], count: u64) {
		self.count += count;
		if let Some((first, rest)) = path.split_first() {
			self.children.entry(*first).or_default().add_path(rest, count);
		}
	}

	/// Follows `path` from this node.
	///
	/// Returns `None` as soon as a character has no matching child.
	pub(crate) fn walk(&self, path: &[char]) -> Option<&Node> {
		path.iter().try_fold(self, |node, c| node.children.get(c))
	}

	pub(crate) fn walk_mut(&mut self, path: &[char]) -> Option<&mut Node> {
		path.iter().try_fold(self, |node, c| node.children.get_mut(c))
	}

	/// Inserts a fresh child. Returns `false` if `c` was already present.
	pub(crate) fn insert_child(&mut self, c: char, count: u64) -> bool {
		if self.children.contains_key(&c) {
			return false;
		}
		self.children.insert(c, Node::with_count(count));
		true
	}

	/// Returns `true` if, at every level below this node, the children
	/// together count no more than their parent.
	pub(crate) fn counts_nest(&self) -> bool {
		let children: u64 = self.children.values().map(Node::count).sum();
		children <= self.count && self.children.values().all(Node::counts_nest)
	}

	/// Collects every n-gram exactly `depth` characters below this node,
	/// together with its count.
	///
	/// `prefix` is the n-gram of this node; it is restored before returning.
	pub(crate) fn collect_at(&self, depth: usize, prefix: &mut String, out: &mut Vec<(String, u64)>) {
		if depth == 0 {
			out.push((prefix.clone(), self.count));
			return;
		}
		for (c, child) in &self.children {
			prefix.push(*c);
			child.collect_at(depth - 1, prefix, out);
			prefix.pop();
		}
	}

	/// Writes one `"gram" : count` line per descendant, depth first.
	pub(crate) fn dump(&self, prefix: &mut String, out: &mut String) {
		for (c, child) in &self.children {
			prefix.push(*c);
			out.push_str(&format!("\"{}\" : {}\n", prefix, child.count));
			child.dump(prefix, out);
			prefix.pop();
		}
	}

	/// Picks one child character, weighted by the child counts.
	///
	/// Returns `None` if this node has no children.
	pub(crate) fn pick_child<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<char> {
		weighted_choice(self.children.iter().map(|(c, child)| (*c, child.count)), rng)
	}

	/// Sums the counts of `other` into this node, recursively.
	pub(crate) fn merge(&mut self, other: &Self) {
		self.count += other.count;
		for (c, child) in &other.children {
			match self.children.get_mut(c) {
				Some(existing) => existing.merge(child),
				None => {
					self.children.insert(*c, child.clone());
				}
			}
		}
	}
}

/// Weighted random sampling over `(candidate, weight)` pairs.
///
/// Draws uniformly from `0..total` and walks the candidates, subtracting
/// each weight until the draw falls inside a candidate's span. When every
/// weight is zero the candidates are treated as equally likely.
///
/// Returns `None` only when there are no candidates.
pub(crate) fn weighted_choice<T, I, R>(candidates: I, rng: &mut R) -> Option<T>
where
	I: IntoIterator<Item = (T, u64)>,
	R: Rng + ?Sized,
{
	let mut candidates: Vec<(T, u64)> = candidates.into_iter().collect();
	if candidates.is_empty() {
		return None;
	}

	let total: u64 = candidates.iter().map(|(_, weight)| weight).sum();
	if total == 0 {
		let index = rng.random_range(0..candidates.len());
		return Some(candidates.swap_remove(index).0);
	}

	let mut r = rng.random_range(0..total);
	let mut chosen = candidates.len() - 1;
	for (index, (_, weight)) in candidates.iter().enumerate() {
		if r < *weight {
			chosen = index;
			break;
		}
		r -= weight;
	}
	Some(candidates.swap_remove(chosen).0)
}
