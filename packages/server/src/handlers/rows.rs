//! Row helpers shared by the content managers. Every managed table has an
//! `i32` primary key and, when ordered, an `order_index` column.

use std::collections::HashSet;

use sea_orm::prelude::Expr;
use sea_orm::sea_query::LockType;
use sea_orm::*;

use crate::error::AppError;

pub async fn find_row<E, C>(db: &C, id: i32, what: &str) -> Result<E::Model, AppError>
where
    E: EntityTrait,
    C: ConnectionTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    E::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{what} not found")))
}

pub async fn find_row_for_update<E>(
    txn: &DatabaseTransaction,
    id: i32,
    what: &str,
) -> Result<E::Model, AppError>
where
    E: EntityTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    E::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{what} not found")))
}

/// Delete a row by ID, failing with `NOT_FOUND` when it does not exist.
pub async fn delete_row<E>(db: &DatabaseConnection, id: i32, what: &str) -> Result<(), AppError>
where
    E: EntityTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    let txn = db.begin().await?;
    find_row_for_update::<E>(&txn, id, what).await?;
    E::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// `max(order_index) + 1`, or 0 for an empty table.
pub async fn next_order_index<E, C>(db: &C, order_col: E::Column) -> Result<i32, AppError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let max_idx: Option<i32> = E::find()
        .select_only()
        .column_as(order_col.max(), "max_idx")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();
    max_idx
        .unwrap_or(-1)
        .checked_add(1)
        .ok_or_else(|| AppError::Validation("order_index overflow".into()))
}

/// Assign `order_index` 0, 1, 2… following `ids`.
///
/// `ids` must name exactly the rows currently in the table.
pub async fn reorder_rows<E>(
    db: &DatabaseConnection,
    ids: &[i32],
    id_col: E::Column,
    order_col: E::Column,
) -> Result<(), AppError>
where
    E: EntityTrait,
{
    let txn = db.begin().await?;

    let existing: HashSet<i32> = E::find()
        .select_only()
        .column(id_col)
        .into_tuple::<i32>()
        .all(&txn)
        .await?
        .into_iter()
        .collect();
    let requested: HashSet<i32> = ids.iter().copied().collect();
    if existing != requested {
        return Err(AppError::Validation(
            "ids must contain exactly the existing rows".into(),
        ));
    }

    for (i, &id) in ids.iter().enumerate() {
        let idx = i32::try_from(i)
            .map_err(|_| AppError::Validation("Too many rows to reorder".into()))?;
        E::update_many()
            .col_expr(order_col, Expr::value(idx))
            .filter(id_col.eq(id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;
    Ok(())
}

/// Primary key of the single row held by a singleton table.
pub const SINGLETON_ID: i32 = 1;
