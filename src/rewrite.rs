//! Tag rewriting for copied contract transactions.
//!
//! The copy must point at the local copy of its source transaction and carry
//! at most one state tag. The original tag order is preserved.

use arlocal_types::tag_names::{CONTRACT_SRC, INIT_STATE, INIT_STATE_TX};
use arlocal_types::{Tag, Tags};
use serde_json::Value;

/// Build the tag set of a copied contract transaction.
///
/// Walks `original` once:
/// - `Init-State` is rewritten with `resolved_state` only when `use_latest` is
///   set and a state was resolved; otherwise the original value is kept
///   byte-for-byte. Later duplicates are dropped.
/// - `Init-State-Tx` is dropped. When the original has no `Init-State`, a
///   literal `Init-State` carrying `resolved_state` takes its place (nothing
///   if the state is absent).
/// - The first `Contract-Src` gets `new_source_id`; later duplicates are
///   dropped.
/// - Everything else is copied verbatim.
///
/// A `Contract-Src` pointing at `new_source_id` is appended if the original
/// had none.
pub fn rewrite_contract_tags(
    original: &Tags,
    new_source_id: &str,
    resolved_state: Option<&Value>,
    use_latest: bool,
) -> Tags {
    let has_literal_state = original.contains(INIT_STATE);
    let serialized = resolved_state.map(Value::to_string);

    let mut rewritten = Tags::new();
    let mut source_replaced = false;
    let mut state_written = false;

    for tag in original {
        match tag.name.as_str() {
            INIT_STATE => {
                if state_written {
                    continue;
                }
                state_written = true;
                match (&serialized, use_latest) {
                    (Some(state), true) => rewritten.push(Tag::new(INIT_STATE, state.as_str())),
                    _ => rewritten.push(tag.clone()),
                }
            }
            INIT_STATE_TX => {
                if has_literal_state || state_written {
                    continue;
                }
                if let Some(state) = &serialized {
                    rewritten.push(Tag::new(INIT_STATE, state.as_str()));
                    state_written = true;
                }
            }
            CONTRACT_SRC => {
                if source_replaced {
                    continue;
                }
                rewritten.push(Tag::new(CONTRACT_SRC, new_source_id));
                source_replaced = true;
            }
            _ => rewritten.push(tag.clone()),
        }
    }

    if !source_replaced {
        rewritten.push(Tag::new(CONTRACT_SRC, new_source_id));
    }
    rewritten
}
