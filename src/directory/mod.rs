//! Directory store: the data-access layer behind every venue, artist and
//! show route.
//!
//! The store is an explicit handle (database pool plus clock) that callers
//! clone and pass around. Reads compute "now" once per call; writes run in a
//! single transaction each and translate every database failure into a
//! [`StoreError`].

pub mod artists;
pub mod clock;
pub mod error;
pub mod shows;
pub mod venues;
pub mod views;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{BinOper, Expr, Func, IntoCondition, SimpleExpr},
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QuerySelect, RelationDef, Select,
};

use crate::db::entities::show;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{EntityKind, StoreError, StoreResult};
pub use views::*;

#[derive(Clone, Debug)]
pub struct DirectoryStore {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl DirectoryStore {
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub fn with_system_clock(db: DatabaseConnection) -> Self {
        Self::new(db, Arc::new(SystemClock))
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// Left join `shows` through `to_shows`, keeping only shows strictly after
/// `now`, and select their count as `num_upcoming_shows`.
///
/// Callers must `group_by` every other selected column.
fn with_upcoming_count<E>(
    select: Select<E>,
    to_shows: RelationDef,
    now: DateTime<Utc>,
) -> Select<E>
where
    E: EntityTrait,
{
    select
        .column_as(show::Column::Id.count(), "num_upcoming_shows")
        .join(
            JoinType::LeftJoin,
            to_shows.on_condition(move |_owner, shows| {
                Expr::col((shows, show::Column::StartTime))
                    .gt(now)
                    .into_condition()
            }),
        )
}

/// Case-insensitive substring match on a text column.
///
/// Column and term both go through the database's `LOWER`, so folding of
/// non-ASCII letters follows the backend (SQLite only folds ASCII). LIKE
/// wildcards in the term match literally.
fn name_contains<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let pattern = SimpleExpr::from(Func::lower(Expr::val(contains_pattern(term))))
        .binary(BinOper::Escape, SimpleExpr::Constant('\\'.into()));
    Expr::expr(Func::lower(Expr::col(column.as_column_ref()))).binary(BinOper::Like, pattern)
}

fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
