use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, Transaction};

use super::PostgresStorage;
use crate::domain::models::DropdownList;
use crate::storage::traits::check_permutation;
use crate::storage::{DropdownStorage, StorageResult};

async fn ordered_values(conn: &mut PgConnection, list: DropdownList) -> StorageResult<Vec<String>> {
    let values: Vec<String> = sqlx::query_scalar(&format!(
        "SELECT value FROM {} ORDER BY order_index ASC, value ASC",
        list.table_name()
    ))
    .fetch_all(conn)
    .await?;
    Ok(values)
}

async fn apply_order(
    tx: &mut Transaction<'_, Postgres>,
    list: DropdownList,
    values: &[String],
) -> StorageResult<()> {
    // Row locks keep concurrent reorders of the same list from interleaving
    let current: Vec<String> = sqlx::query_scalar(&format!(
        "SELECT value FROM {} ORDER BY order_index ASC, value ASC FOR UPDATE",
        list.table_name()
    ))
    .fetch_all(&mut **tx)
    .await?;
    check_permutation(&current, values)?;

    let update = format!(
        "UPDATE {} SET order_index = $1 WHERE value = $2",
        list.table_name()
    );
    for (index, value) in values.iter().enumerate() {
        sqlx::query(&update)
            .bind(index as i32)
            .bind(value)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn append_value(
    tx: &mut Transaction<'_, Postgres>,
    list: DropdownList,
    value: &str,
) -> StorageResult<()> {
    let table = list.table_name();
    // Serializes appenders so two of them never read the same MAX(order_index)
    sqlx::query(&format!("LOCK TABLE {table} IN SHARE ROW EXCLUSIVE MODE"))
        .execute(&mut **tx)
        .await?;
    sqlx::query(&format!(
        r#"
        INSERT INTO {table} (value, order_index)
        SELECT $1, COALESCE(MAX(order_index), -1) + 1 FROM {table}
        ON CONFLICT (value) DO NOTHING
        "#
    ))
    .bind(value)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl DropdownStorage for PostgresStorage {
    async fn list_dropdown(&self, list: DropdownList) -> StorageResult<Vec<String>> {
        let mut conn = self.pool().acquire().await?;
        ordered_values(&mut conn, list).await
    }

    async fn add_dropdown_value(
        &self,
        list: DropdownList,
        value: &str,
    ) -> StorageResult<Vec<String>> {
        let mut tx = self.pool().begin().await?;
        match append_value(&mut tx, list, value).await {
            Ok(()) => tx.commit().await?,
            Err(e) => {
                tx.rollback().await?;
                return Err(e);
            }
        }
        self.list_dropdown(list).await
    }

    async fn delete_dropdown_value(
        &self,
        list: DropdownList,
        value: &str,
    ) -> StorageResult<Option<Vec<String>>> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE value = $1", list.table_name()))
            .bind(value)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.list_dropdown(list).await.map(Some)
    }

    async fn reorder_dropdown(&self, list: DropdownList, values: &[String]) -> StorageResult<()> {
        let mut tx = self.pool().begin().await?;
        match apply_order(&mut tx, list, values).await {
            Ok(()) => {
                tx.commit().await?;
                Ok(())
            }
            Err(e) => {
                tx.rollback().await?;
                Err(e)
            }
        }
    }
}
