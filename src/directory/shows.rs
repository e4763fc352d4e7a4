use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::{
    ActiveModelTrait, DbErr, EntityTrait, FromQueryResult, JoinType, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};

use super::{
    display_start_time, DirectoryStore, EntityKind, NewShow, ShowListing, StoreError, StoreResult,
};
use crate::db::entities::{artist, show, venue};

fn show_err(err: DbErr) -> StoreError {
    StoreError::from_db(err, EntityKind::Show)
}

#[derive(FromQueryResult)]
struct ShowRow {
    id: i32,
    venue_id: i32,
    venue_name: String,
    artist_id: i32,
    artist_name: String,
    artist_image_link: Option<String>,
    start_time: DateTime<Utc>,
}

impl From<ShowRow> for ShowListing {
    fn from(row: ShowRow) -> Self {
        Self {
            id: row.id,
            venue_id: row.venue_id,
            venue_name: row.venue_name,
            artist_id: row.artist_id,
            artist_name: row.artist_name,
            artist_image_link: row.artist_image_link,
            start_time_display: display_start_time(&row.start_time),
            start_time: row.start_time,
        }
    }
}

impl DirectoryStore {
    /// Every show with its venue and artist, fetched with one joined query.
    pub async fn list_shows(&self) -> StoreResult<Vec<ShowListing>> {
        let rows = show::Entity::find()
            .select_only()
            .column_as(show::Column::Id, "id")
            .column_as(show::Column::VenueId, "venue_id")
            .column_as(venue::Column::Name, "venue_name")
            .column_as(show::Column::ArtistId, "artist_id")
            .column_as(artist::Column::Name, "artist_name")
            .column_as(artist::Column::ImageLink, "artist_image_link")
            .column_as(show::Column::StartTime, "start_time")
            .join(JoinType::InnerJoin, show::Relation::Venue.def())
            .join(JoinType::InnerJoin, show::Relation::Artist.def())
            .order_by_asc(show::Column::StartTime)
            .order_by_asc(show::Column::Id)
            .into_model::<ShowRow>()
            .all(&self.db)
            .await
            .map_err(show_err)?;

        Ok(rows.into_iter().map(ShowListing::from).collect())
    }

    /// Book an artist at a venue.
    ///
    /// Both references are checked inside the transaction; a missing one
    /// yields `ReferenceError` and nothing is written.
    pub async fn create_show(&self, new_show: NewShow) -> StoreResult<show::Model> {
        let NewShow {
            artist_id,
            venue_id,
            start_time,
        } = new_show;
        let start_time = start_time
            .map(|t| t.trunc_subsecs(6))
            .unwrap_or_else(|| self.now());

        let created = self
            .db
            .transaction::<_, show::Model, StoreError>(|txn| {
                Box::pin(async move {
                    let artist = artist::Entity::find_by_id(artist_id)
                        .one(txn)
                        .await
                        .map_err(show_err)?;
                    if artist.is_none() {
                        return Err(StoreError::ReferenceError {
                            entity: EntityKind::Artist,
                            id: artist_id,
                        });
                    }

                    let venue = venue::Entity::find_by_id(venue_id)
                        .one(txn)
                        .await
                        .map_err(show_err)?;
                    if venue.is_none() {
                        return Err(StoreError::ReferenceError {
                            entity: EntityKind::Venue,
                            id: venue_id,
                        });
                    }

                    show::ActiveModel {
                        artist_id: Set(artist_id),
                        venue_id: Set(venue_id),
                        start_time: Set(start_time),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(show_err)
                })
            })
            .await
            .map_err(|e| StoreError::from_txn(e, EntityKind::Show))
            .inspect_err(|e| tracing::warn!(artist_id, venue_id, "Show could not be listed: {}", e))?;

        tracing::info!(
            show_id = created.id,
            artist_id,
            venue_id,
            start_time = %created.start_time,
            "Show was successfully listed"
        );
        Ok(created)
    }
}
