use serde::Deserialize;
use serde::Serialize;

/// One entry of an instruction's account list: a single account, or a named
/// group of further entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AccountItem {
	Account(Account),
	Group(AccountGroup),
}

impl AccountItem {
	pub fn name(&self) -> &str {
		match self {
			Self::Account(account) => &account.name,
			Self::Group(group) => &group.name,
		}
	}

	pub fn as_account(&self) -> Option<&Account> {
		match self {
			Self::Account(account) => Some(account),
			Self::Group(_) => None,
		}
	}

	pub fn as_group(&self) -> Option<&AccountGroup> {
		match self {
			Self::Group(group) => Some(group),
			Self::Account(_) => None,
		}
	}

	/// Number of leaf accounts in this item: `1` for an account, the
	/// recursive leaf count for a group.
	pub fn num_accounts(&self) -> usize {
		match self {
			Self::Account(_) => 1,
			Self::Group(group) => group.accounts.num_accounts(),
		}
	}
}

/// Leaf-count over a sequence of account items.
pub trait AccountItems {
	/// Counts leaf accounts only. Groups add the count of their contents.
	fn num_accounts(&self) -> usize;
}

impl AccountItems for [AccountItem] {
	fn num_accounts(&self) -> usize {
		self.iter().map(AccountItem::num_accounts).sum()
	}
}

/// A single account slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Account {
	pub name: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub docs: Vec<String>,
	pub signer: bool,
	pub writable: bool,
	pub optional: bool,
	/// Constant address the account must have.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pda: Option<Pda>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub relations: Vec<String>,
}

impl Account {
	pub fn is_pda(&self) -> bool {
		self.pda.is_some()
	}
}

/// A named, nested group of account items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountGroup {
	pub name: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub docs: Vec<String>,
	pub accounts: Vec<AccountItem>,
}

/// Seeds (and optionally the owning program) of a derived-address account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pda {
	#[serde(default)]
	pub seeds: Vec<PdaSeed>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub program: Option<PdaSeed>,
}

/// A single seed of a derived address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PdaSeed {
	/// Raw bytes known at build time.
	Const { value: Vec<u8> },
	/// Taken from an instruction argument.
	Arg { path: String },
	/// Taken from another account of the instruction (or a field of its
	/// data when `account` names the account type).
	Account {
		path: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		account: Option<String>,
	},
}
