//! Well-known example PST contracts.

use tracing::info;

use crate::engine::ArLocalUtils;
use crate::error::{ReplicateError, Result};

/// Mainnet ids of four profit-sharing-token contracts used as fixtures.
pub const EXAMPLE_PST_CONTRACTS: [&str; 4] = [
    "usjm4PCxUd5mtaon7zc97-dt-3qf67yPyqgzLnLqk5A",
    "-8A6RexFkpfWwuyVO98wzSFZh0d6VJuI-buTJvlwOJQ",
    "mzvUgNc8YFk0w5K5H7c8pyT-FC5Y_ba0r7_8766Kx74",
    "t9T7DIOGxx4VWXoCEeYYarFYeERTpWIC1V3y-BPZgKE",
];

impl ArLocalUtils {
    /// Local copies of [`EXAMPLE_PST_CONTRACTS`], in the same order.
    ///
    /// The first successful call copies the four contracts one after another
    /// and caches the new ids for the lifetime of this instance. If any copy
    /// fails, nothing is cached and the error is returned.
    pub async fn example_psts(&self) -> Result<[String; 4]> {
        let ids = self
            .example_psts
            .get_or_try_init(|| async {
                let [a, b, c, d] = EXAMPLE_PST_CONTRACTS;
                let ids = [
                    self.copy_contract(a, false, None).await?,
                    self.copy_contract(b, false, None).await?,
                    self.copy_contract(c, false, None).await?,
                    self.copy_contract(d, false, None).await?,
                ];
                info!(ids = ?ids, "copied example PST contracts");
                Ok::<_, ReplicateError>(ids)
            })
            .await?;
        Ok(ids.clone())
    }
}
