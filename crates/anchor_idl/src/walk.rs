//! Pre-order traversal of an instruction's account tree.
//!
//! Only leaf accounts are visited. Each leaf gets a zero-based index that is
//! global to the whole traversal (not per group), and the slash-joined path
//! of the groups enclosing it.
//!
//! Returning [`ControlFlow::Break`] from the visitor stops the entire
//! traversal at once; no further leaves are visited anywhere in the tree.

use std::ops::ControlFlow;

use crate::model::Account;
use crate::model::AccountGroup;
use crate::model::AccountItem;
use crate::model::Instruction;

/// One leaf account as seen by a visitor.
///
/// `'p` is the lifetime of the traversal's path buffer; `'a` is the lifetime
/// of the account tree itself.
#[derive(Debug, Clone, Copy)]
pub struct AccountVisit<'p, 'a> {
	/// Names of the enclosing groups joined with `/`; empty at top level.
	pub group_path: &'p str,
	pub index: usize,
	/// The innermost enclosing group.
	pub parent: Option<&'a AccountGroup>,
	pub account: &'a Account,
}

impl AccountVisit<'_, '_> {
	/// `group_path/name`, or just the account name at top level.
	pub fn qualified_name(&self) -> String {
		if self.group_path.is_empty() {
			self.account.name.clone()
		} else {
			format!("{}/{}", self.group_path, self.account.name)
		}
	}
}

/// An owned [`AccountVisit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafAccount<'a> {
	pub group_path: String,
	pub index: usize,
	pub parent: Option<&'a AccountGroup>,
	pub account: &'a Account,
}

/// Traversal state, owned by one top-level call.
struct Walker<F> {
	path: String,
	next_index: usize,
	visit: F,
}

impl<F> Walker<F> {
	fn items<'a, B>(
		&mut self,
		items: &'a [AccountItem],
		parent: Option<&'a AccountGroup>,
	) -> ControlFlow<B>
	where
		F: FnMut(AccountVisit<'_, 'a>) -> ControlFlow<B>,
	{
		for item in items {
			match item {
				AccountItem::Account(account) => {
					let index = self.next_index;
					self.next_index += 1;
					(self.visit)(AccountVisit {
						group_path: &self.path,
						index,
						parent,
						account,
					})?;
				}
				AccountItem::Group(group) => {
					let restore = self.path.len();
					if !self.path.is_empty() {
						self.path.push('/');
					}
					self.path.push_str(&group.name);
					let flow = self.items(&group.accounts, Some(group));
					self.path.truncate(restore);
					flow?;
				}
			}
		}
		ControlFlow::Continue(())
	}
}

/// Visit every leaf account of `items` in document order.
///
/// The returned flow is the visitor's `Break` value if it stopped the walk.
pub fn walk_accounts<'a, B, F>(items: &'a [AccountItem], visit: F) -> ControlFlow<B>
where
	F: FnMut(AccountVisit<'_, 'a>) -> ControlFlow<B>,
{
	let mut walker = Walker {
		path: String::new(),
		next_index: 0,
		visit,
	};
	walker.items(items, None)
}

/// Visit every leaf account without the option of stopping early.
pub fn for_each_account<'a, F>(items: &'a [AccountItem], mut visit: F)
where
	F: FnMut(AccountVisit<'_, 'a>),
{
	let _ = walk_accounts(items, |leaf| {
		visit(leaf);
		ControlFlow::<()>::Continue(())
	});
}

/// All leaf accounts in visiting order.
pub fn flatten_accounts(items: &[AccountItem]) -> Vec<LeafAccount<'_>> {
	let mut leaves = Vec::new();
	for_each_account(items, |leaf| {
		leaves.push(LeafAccount {
			group_path: leaf.group_path.to_owned(),
			index: leaf.index,
			parent: leaf.parent,
			account: leaf.account,
		});
	});
	leaves
}

impl Instruction {
	/// See [`walk_accounts`].
	pub fn walk_accounts<'a, B, F>(&'a self, visit: F) -> ControlFlow<B>
	where
		F: FnMut(AccountVisit<'_, 'a>) -> ControlFlow<B>,
	{
		walk_accounts(&self.accounts, visit)
	}

	/// See [`flatten_accounts`].
	pub fn flatten_accounts(&self) -> Vec<LeafAccount<'_>> {
		flatten_accounts(&self.accounts)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::AccountItems;

	fn leaf(name: &str) -> AccountItem {
		AccountItem::Account(Account {
			name: name.to_owned(),
			..Account::default()
		})
	}

	fn group(name: &str, accounts: Vec<AccountItem>) -> AccountItem {
		AccountItem::Group(AccountGroup {
			name: name.to_owned(),
			docs: Vec::new(),
			accounts,
		})
	}

	fn summary(items: &[AccountItem]) -> Vec<(String, usize, String)> {
		flatten_accounts(items)
			.into_iter()
			.map(|leaf| (leaf.account.name.clone(), leaf.index, leaf.group_path))
			.collect()
	}

	#[test]
	fn indexes_globally_in_document_order() {
		let items = vec![leaf("A"), group("g", vec![leaf("B"), leaf("C")]), leaf("D")];
		assert_eq!(
			summary(&items),
			vec![
				("A".to_owned(), 0, String::new()),
				("B".to_owned(), 1, "g".to_owned()),
				("C".to_owned(), 2, "g".to_owned()),
				("D".to_owned(), 3, String::new()),
			]
		);
		assert_eq!(items.num_accounts(), 4);
	}

	#[test]
	fn nested_groups_join_paths() {
		let items = vec![group(
			"outer",
			vec![group("inner", vec![leaf("x")]), leaf("y")],
		)];
		let leaves = flatten_accounts(&items);
		assert_eq!(leaves[0].group_path, "outer/inner");
		assert_eq!(leaves[0].index, 0);
		assert_eq!(leaves[0].parent.map(|g| g.name.as_str()), Some("inner"));
		assert_eq!(leaves[1].group_path, "outer");
		assert_eq!(leaves[1].parent.map(|g| g.name.as_str()), Some("outer"));
	}

	#[test]
	fn top_level_leaves_have_no_parent() {
		let items = vec![leaf("a")];
		let leaves = flatten_accounts(&items);
		assert!(leaves[0].parent.is_none());
	}

	#[test]
	fn break_stops_the_whole_walk() {
		let items = vec![
			group("g", vec![leaf("a"), leaf("b"), leaf("c")]),
			group("h", vec![leaf("d")]),
			leaf("e"),
		];
		let mut seen = Vec::new();
		let flow = walk_accounts(&items, |leaf| {
			seen.push(leaf.account.name.clone());
			if leaf.account.name == "b" {
				ControlFlow::Break(leaf.index)
			} else {
				ControlFlow::Continue(())
			}
		});
		assert_eq!(flow, ControlFlow::Break(1));
		assert_eq!(seen, vec!["a", "b"]);
	}

	#[test]
	fn empty_groups_consume_no_index() {
		let items = vec![group("empty", Vec::new()), leaf("a")];
		assert_eq!(summary(&items), vec![("a".to_owned(), 0, String::new())]);
	}

	#[test]
	fn qualified_names() {
		let items = vec![leaf("top"), group("g", vec![group("h", vec![leaf("deep")])])];
		let mut names = Vec::new();
		for_each_account(&items, |leaf| names.push(leaf.qualified_name()));
		assert_eq!(names, vec!["top", "g/h/deep"]);
	}
}
