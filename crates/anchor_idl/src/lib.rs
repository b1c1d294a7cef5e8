//! Strongly-typed model of Anchor-style program IDLs.
//!
//! The IDL wire format encodes several unions by the shape of a JSON object
//! rather than an explicit tag, and nests instruction accounts into groups.
//! This crate decodes such documents into [`Idl`], resolving every union to
//! exactly one variant, and flattens account trees into a stable, indexed
//! order for code generators.
//!
//! ```
//! use anchor_idl::AccountItems;
//!
//! let idl = anchor_idl::decode_str(
//! 	r#"{
//! 		"version": "0.1.0",
//! 		"instructions": [{
//! 			"name": "deposit",
//! 			"accounts": [
//! 				{ "name": "user", "signer": true },
//! 				{ "name": "vault", "accounts": [{ "name": "state", "writable": true }] }
//! 			],
//! 			"args": [{ "name": "amount", "type": "u64" }]
//! 		}]
//! 	}"#,
//! )?;
//!
//! let deposit = &idl.instructions[0];
//! assert_eq!(deposit.accounts.num_accounts(), 2);
//! let leaves = deposit.flatten_accounts();
//! assert_eq!(leaves[1].group_path, "vault");
//! assert_eq!(leaves[1].index, 1);
//! # Ok::<(), anchor_idl::DecodeError>(())
//! ```

pub mod decode;
pub mod error;
pub mod model;
pub mod validate;
pub mod walk;

pub use crate::decode::DecodeOptions;
pub use crate::decode::Decoder;
pub use crate::decode::decode;
pub use crate::decode::decode_str;
pub use crate::decode::decode_value;
pub use crate::error::DecodeError;
pub use crate::error::Shape;
pub use crate::error::ValidationError;
pub use crate::error::ValidationErrors;
pub use crate::model::*;
pub use crate::walk::AccountVisit;
pub use crate::walk::LeafAccount;
pub use crate::walk::flatten_accounts;
pub use crate::walk::for_each_account;
pub use crate::walk::walk_accounts;
