use super::repo_tx_sqlite::SqliteTx;
use crate::application_port::UserError;
use crate::domain_port::*;

/// Recovers the SQLite transaction behind a `dyn StorageTx`.
pub fn downcast<'a, 't>(
    tx: &'a mut dyn StorageTx<'t>,
) -> Result<&'a mut SqliteTx<'t>, UserError> {
    if tx.store() != SqliteTx::STORE {
        return Err(UserError::Store(format!(
            "{} transaction handed to a {} repository",
            tx.store(),
            SqliteTx::STORE
        )));
    }

    // SAFETY: `SqliteTx` is the only `StorageTx` reporting `SqliteTx::STORE`,
    // so the data pointer behind this trait object is a `SqliteTx<'t>`.
    Ok(unsafe { &mut *(tx as *mut dyn StorageTx<'t> as *mut SqliteTx<'t>) })
}

pub fn store_error(context: &str) -> impl FnOnce(sqlx::Error) -> UserError + '_ {
    move |e| UserError::Store(format!("{context}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OtherTx;

    #[async_trait::async_trait]
    impl<'t> StorageTx<'t> for OtherTx {
        fn store(&self) -> &'static str {
            "memory"
        }

        async fn commit(self: Box<Self>) -> anyhow::Result<()> {
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn foreign_transaction_is_refused() {
        let mut tx = OtherTx;

        let err = downcast(&mut tx).err().unwrap();

        assert_eq!(
            err.to_string(),
            "store error: memory transaction handed to a sqlite repository"
        );
    }
}
